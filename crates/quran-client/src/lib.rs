//! Qur'an content client library.
//!
//! Provides typed access to the chapter / verse / commentary REST API,
//! a time-bounded response cache, chapter and verse search, and
//! recitation audio URL resolution.

pub mod api;
pub mod audio;
pub mod cache;
pub mod search;
pub mod transport;

pub use api::{ClientOptions, QuranApiClient};
pub use audio::Reciter;
pub use cache::ResponseCache;
pub use transport::{HttpTransport, StaticTransport, Transport};

/// Lowest valid chapter number.
pub const FIRST_CHAPTER: u16 = 1;
/// Highest valid chapter number.
pub const LAST_CHAPTER: u16 = 114;

/// Unified error type for the quran-client crate.
#[derive(Debug, thiserror::Error)]
pub enum QuranError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Remote API error (status {status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl QuranError {
    /// Whether the error came from the upstream service rather than the caller.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Remote { .. } | Self::Timeout | Self::Http(_) | Self::Json(_)
        )
    }
}

/// Reject chapter numbers outside `1..=114` before any request is made.
pub fn validate_chapter_id(id: u16) -> Result<(), QuranError> {
    if (FIRST_CHAPTER..=LAST_CHAPTER).contains(&id) {
        Ok(())
    } else {
        Err(QuranError::Validation(format!(
            "chapter id must be between {FIRST_CHAPTER} and {LAST_CHAPTER}, got {id}"
        )))
    }
}
