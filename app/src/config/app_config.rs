//! Runtime application configuration: defaults with environment overrides.

use std::path::PathBuf;
use std::time::Duration;

use quran_client::ClientOptions;
use quran_client::audio::DEFAULT_AUDIO_CDN;
use quran_client::cache::{DEFAULT_CAPACITY, DEFAULT_TTL_SECS};
use quran_client::transport::DEFAULT_API_BASE;

use super::validation::validate_setting;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base: String,
    pub audio_cdn: String,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: i64,
    pub cache_capacity: usize,
    pub default_reciter: String,
    /// Overrides the `~/.quran-reader` data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            audio_cdn: DEFAULT_AUDIO_CDN.into(),
            request_timeout_secs: 15,
            cache_ttl_secs: DEFAULT_TTL_SECS,
            cache_capacity: DEFAULT_CAPACITY,
            default_reciter: "05".into(),
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// Load from process environment variables.
    pub fn load() -> Result<Self, anyhow::Error> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Build a config from an arbitrary key lookup. Values that fail
    /// validation are logged and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> Option<String> {
            let value = lookup(key)?;
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            match validate_setting(key, value) {
                Ok(()) => Some(value.to_string()),
                Err(e) => {
                    tracing::warn!(key, value, "Ignoring invalid setting: {e}");
                    None
                }
            }
        };

        let defaults = Self::default();
        Self {
            api_base: g(super::API_BASE).unwrap_or(defaults.api_base),
            audio_cdn: g(super::AUDIO_CDN).unwrap_or(defaults.audio_cdn),
            request_timeout_secs: parse_or(
                g(super::REQUEST_TIMEOUT_SECS),
                defaults.request_timeout_secs,
            ),
            cache_ttl_secs: parse_or(g(super::CACHE_TTL_SECS), defaults.cache_ttl_secs),
            cache_capacity: parse_or(g(super::CACHE_CAPACITY), defaults.cache_capacity),
            default_reciter: g(super::DEFAULT_RECITER).unwrap_or(defaults.default_reciter),
            data_dir: g(super::DATA_DIR).map(PathBuf::from),
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.api_base.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
            cache_ttl: chrono::Duration::seconds(self.cache_ttl_secs),
            cache_capacity: self.cache_capacity,
        }
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
