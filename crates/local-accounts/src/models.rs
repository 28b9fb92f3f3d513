//! Stored account and session records.

use chrono::{DateTime, Duration, Utc};
use reader_store::{FontSize, Theme};
use serde::{Deserialize, Serialize};

/// Session lifetime from creation or last extension.
pub const SESSION_LIFETIME_HOURS: i64 = 24;

pub fn session_lifetime() -> Duration {
    Duration::hours(SESSION_LIFETIME_HOURS)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub display_name: String,
    pub preferred_reciter: String,
    pub font_size: FontSize,
    pub theme: Theme,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            preferred_reciter: "05".into(),
            font_size: FontSize::default(),
            theme: Theme::default(),
        }
    }
}

impl Profile {
    pub fn for_username(username: &str) -> Self {
        Self {
            display_name: username.to_string(),
            ..Default::default()
        }
    }

    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(v) = patch.display_name {
            self.display_name = v;
        }
        if let Some(v) = patch.preferred_reciter {
            self.preferred_reciter = v;
        }
        if let Some(v) = patch.font_size {
            self.font_size = v;
        }
        if let Some(v) = patch.theme {
            self.theme = v;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub preferred_reciter: Option<String>,
    pub font_size: Option<FontSize>,
    pub theme: Option<Theme>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub must_change_password: bool,
    #[serde(default)]
    pub profile: Profile,
}

fn default_active() -> bool {
    true
}

impl Account {
    pub fn matches_username(&self, username: &str) -> bool {
        self.username.to_lowercase() == username.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_valid: bool,
}

impl Session {
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.is_valid && now < self.expires_at
    }
}

/// Projection of the logged-in account handed to callers. Never carries
/// the password checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub profile: Profile,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub must_change_password: bool,
}

impl From<&Account> for SessionUser {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            username: account.username.clone(),
            profile: account.profile.clone(),
            last_login: account.last_login,
            must_change_password: account.must_change_password,
        }
    }
}
