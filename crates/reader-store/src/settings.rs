//! Reader settings: a fixed-shape record that is always fully populated.
//!
//! Stored JSON is merged field by field over the defaults, so a missing
//! or malformed field falls back to its default without discarding the
//! rest of the record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Database, keys};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    #[serde(rename = "xlarge")]
    ExtraLarge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    pub autoplay_audio: bool,
    pub show_transliteration: bool,
    pub show_translation: bool,
    pub font_size: FontSize,
    /// Reciter key, `"01"`..`"05"`.
    pub preferred_reciter: String,
    pub notifications_enabled: bool,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            autoplay_audio: false,
            show_transliteration: true,
            show_translation: true,
            font_size: FontSize::Medium,
            preferred_reciter: "05".into(),
            notifications_enabled: true,
        }
    }
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub autoplay_audio: Option<bool>,
    pub show_transliteration: Option<bool>,
    pub show_translation: Option<bool>,
    pub font_size: Option<FontSize>,
    pub preferred_reciter: Option<String>,
    pub notifications_enabled: Option<bool>,
}

impl ReaderSettings {
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.autoplay_audio {
            self.autoplay_audio = v;
        }
        if let Some(v) = patch.show_transliteration {
            self.show_transliteration = v;
        }
        if let Some(v) = patch.show_translation {
            self.show_translation = v;
        }
        if let Some(v) = patch.font_size {
            self.font_size = v;
        }
        if let Some(v) = patch.preferred_reciter {
            self.preferred_reciter = v;
        }
        if let Some(v) = patch.notifications_enabled {
            self.notifications_enabled = v;
        }
    }

    /// Merge an arbitrary JSON object over the defaults. Unknown keys and
    /// fields whose values do not fit are dropped individually.
    pub fn merged_from_value(stored: Value) -> Self {
        let defaults = Self::default();
        let Ok(mut merged) = serde_json::to_value(&defaults) else {
            return defaults;
        };

        if let Value::Object(fields) = stored {
            for (key, value) in fields {
                let Some(slot) = merged.get(&key) else {
                    continue;
                };
                if slot == &value {
                    continue;
                }
                let mut candidate = merged.clone();
                candidate[key.as_str()] = value;
                if serde_json::from_value::<Self>(candidate.clone()).is_ok() {
                    merged = candidate;
                } else {
                    tracing::warn!(key = %key, "Ignoring invalid stored setting");
                }
            }
        }

        serde_json::from_value(merged).unwrap_or(defaults)
    }
}

impl Database {
    /// Current settings with every missing field filled from defaults.
    pub fn settings(&self) -> ReaderSettings {
        self.get_json::<Value>(keys::SETTINGS)
            .map(ReaderSettings::merged_from_value)
            .unwrap_or_default()
    }

    /// Merge `patch` into the stored settings.
    pub fn update_settings(&self, patch: SettingsPatch) -> bool {
        let mut settings = self.settings();
        settings.apply(patch);
        self.set_json(keys::SETTINGS, &settings)
    }

    pub fn reset_settings(&self) -> bool {
        self.set_json(keys::SETTINGS, &ReaderSettings::default())
    }
}
