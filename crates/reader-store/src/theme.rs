//! Light / dark theme preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Database, keys};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("invalid theme: {other}")),
        }
    }
}

impl Database {
    pub fn theme(&self) -> Theme {
        self.get_json(keys::THEME).unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> bool {
        self.set_json(keys::THEME, &theme)
    }

    /// Set the theme from its string form. Anything other than
    /// `"light"` or `"dark"` is rejected without writing.
    pub fn set_theme_str(&self, value: &str) -> bool {
        match value.parse::<Theme>() {
            Ok(theme) => self.set_theme(theme),
            Err(e) => {
                tracing::warn!(value, "Rejected theme: {e}");
                false
            }
        }
    }

    /// Flip the stored theme and return the new value.
    pub fn toggle_theme(&self) -> Theme {
        let next = self.theme().toggled();
        if !self.set_theme(next) {
            tracing::warn!(theme = %next, "Theme toggle was not persisted");
        }
        next
    }
}
