//! Configuration: defaults, validation, loading from the environment.

pub mod app_config;
pub mod validation;

pub use app_config::AppConfig;

/// Environment keys read by [`AppConfig::load`].
pub const API_BASE: &str = "QURAN_API_BASE";
pub const AUDIO_CDN: &str = "QURAN_AUDIO_CDN";
pub const REQUEST_TIMEOUT_SECS: &str = "QURAN_REQUEST_TIMEOUT_SECS";
pub const CACHE_TTL_SECS: &str = "QURAN_CACHE_TTL_SECS";
pub const CACHE_CAPACITY: &str = "QURAN_CACHE_CAPACITY";
pub const DEFAULT_RECITER: &str = "QURAN_DEFAULT_RECITER";
pub const DATA_DIR: &str = "QURAN_READER_DATA_DIR";
