//! Request transports used by [`crate::QuranApiClient`].
//!
//! [`HttpTransport`] talks to the real API; [`StaticTransport`] serves
//! canned bodies keyed by path for offline fixtures.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::QuranError;

/// Public API base of the upstream chapter/verse service.
pub const DEFAULT_API_BASE: &str = "https://equran.id/api/v2";

/// Fetches a response body for an API path such as `/surat/1`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<String, QuranError>;
}

/// reqwest-backed transport with a bounded per-request timeout.
pub struct HttpTransport {
    http: reqwest::Client,
    base: String,
}

impl HttpTransport {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, QuranError> {
        // Validate early so a bad base URL fails at startup, not per request.
        Url::parse(base)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<String, QuranError> {
        let url = format!("{}{path}", self.base);
        let resp = self.http.get(&url).send().await.map_err(map_send_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(map_send_error)?;

        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "Upstream request failed");
            return Err(QuranError::Remote {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }
}

fn map_send_error(e: reqwest::Error) -> QuranError {
    if e.is_timeout() {
        QuranError::Timeout
    } else {
        QuranError::Http(e)
    }
}

/// Serves fixed response bodies by path and counts requests per path.
///
/// Unknown paths answer with a 404 [`QuranError::Remote`].
#[derive(Default)]
pub struct StaticTransport {
    routes: HashMap<String, String>,
    hits: Mutex<HashMap<String, usize>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body for a path, builder style.
    pub fn with_route(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.routes.insert(path.into(), body.into());
        self
    }

    /// How many times `path` has been requested.
    pub fn hits(&self, path: &str) -> usize {
        self.hits
            .lock()
            .map(|hits| hits.get(path).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Total number of requests across all paths.
    pub fn total_hits(&self) -> usize {
        self.hits
            .lock()
            .map(|hits| hits.values().sum())
            .unwrap_or(0)
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get(&self, path: &str) -> Result<String, QuranError> {
        if let Ok(mut hits) = self.hits.lock() {
            *hits.entry(path.to_string()).or_default() += 1;
        }
        self.routes
            .get(path)
            .cloned()
            .ok_or_else(|| QuranError::Remote {
                status: 404,
                message: format!("no route for {path}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    async fn local_base(listener: &TcpListener) -> String {
        format!("http://{}", listener.local_addr().unwrap())
    }

    #[test]
    fn http_transport_rejects_bad_base() {
        let err = HttpTransport::new("not a url", Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, QuranError::UrlParse(_)));
    }

    #[test]
    fn http_transport_trims_trailing_slash() {
        let t = HttpTransport::new("https://example.com/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(t.base(), "https://example.com/api");
    }

    #[tokio::test]
    async fn static_transport_counts_hits() {
        let t = StaticTransport::new().with_route("/surat", "{}");
        assert_eq!(t.get("/surat").await.unwrap(), "{}");
        assert_eq!(t.get("/surat").await.unwrap(), "{}");
        assert!(matches!(
            t.get("/missing").await,
            Err(QuranError::Remote { status: 404, .. })
        ));
        assert_eq!(t.hits("/surat"), 2);
        assert_eq!(t.hits("/missing"), 1);
        assert_eq!(t.total_hits(), 3);
    }

    #[tokio::test]
    async fn http_transport_maps_silent_server_to_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = local_base(&listener).await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let t = HttpTransport::new(&base, Duration::from_millis(300)).unwrap();
        assert!(matches!(t.get("/surat").await, Err(QuranError::Timeout)));
        server.abort();
    }

    #[tokio::test]
    async fn http_transport_maps_error_status_to_remote() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = local_base(&listener).await;
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let body = "upstream down";
            let status_line = "HTTP/1.1 500 Internal Server Error\r\n";
            let headers = format!("content-length: {}\r\nconnection: close\r\n", body.len());
            let response = format!("{status_line}{headers}\r\n{body}");
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let t = HttpTransport::new(&base, Duration::from_secs(5)).unwrap();
        match t.get("/surat/1").await {
            Err(QuranError::Remote { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
        server.await.unwrap();
    }
}
