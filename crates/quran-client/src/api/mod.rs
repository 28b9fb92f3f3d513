//! Chapter / verse / commentary REST API client.
//!
//! Every response is unwrapped from the `{code, message, data}` envelope,
//! normalized into the types in [`models`], and memoized per request path.

mod chapters;
mod commentary;
mod request;
mod verses;


pub mod models;

pub use models::{
    AdjacentChapter, ApiEnvelope, BatchOutcome, Chapter, ChapterDetail, ChapterView,
    CommentaryEntry, Verse,
};

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TTL_SECS, ResponseCache};
use crate::transport::{DEFAULT_API_BASE, HttpTransport, Transport};
use crate::QuranError;

/// Construction options for [`QuranApiClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
    pub cache_ttl: chrono::Duration,
    pub cache_capacity: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.into(),
            timeout: Duration::from_secs(15),
            cache_ttl: chrono::Duration::seconds(DEFAULT_TTL_SECS),
            cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Qur'an content API client with per-path response caching.
pub struct QuranApiClient {
    pub(super) transport: Arc<dyn Transport>,
    pub(super) chapter_list: ResponseCache<Vec<Chapter>>,
    pub(super) details: ResponseCache<ChapterDetail>,
    pub(super) commentary: ResponseCache<Vec<CommentaryEntry>>,
}

impl QuranApiClient {
    /// Create a client talking to the HTTP API described by `options`.
    pub fn new(options: &ClientOptions) -> Result<Self, QuranError> {
        let transport = HttpTransport::new(&options.base_url, options.timeout)?;
        Ok(Self::with_transport(Arc::new(transport), options))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(transport: Arc<dyn Transport>, options: &ClientOptions) -> Self {
        Self {
            transport,
            chapter_list: new_cache(options),
            details: new_cache(options),
            commentary: new_cache(options),
        }
    }

    /// Forget every cached response.
    pub fn clear_cache(&self) {
        self.chapter_list.clear();
        self.details.clear();
        self.commentary.clear();
        tracing::info!("Response cache cleared");
    }
}

fn new_cache<V>(options: &ClientOptions) -> ResponseCache<V> {
    ResponseCache::new(options.cache_ttl, options.cache_capacity)
}
