//! Proxy state shared by every request

use std::sync::Arc;
use std::time::Duration;

use super::translation::TranslationPipeline;

/// Shared state for the proxy server
#[derive(Clone)]
pub struct ProxyState {
    /// HTTP client for forwarding requests (connection pool shared across requests)
    pub(super) client: reqwest::Client,
    /// Backend base URL, without trailing slash
    pub(super) backend_url: String,
    /// Budget for connecting and receiving response headers
    pub(super) timeout: Duration,
    /// Maximum size of a relayed chunk on streamed responses
    pub(super) stream_chunk_size: usize,
    /// Request/response translation
    pub(super) translation: Arc<TranslationPipeline>,
}

impl ProxyState {
    pub fn new(
        client: reqwest::Client,
        backend_url: impl Into<String>,
        timeout: Duration,
        stream_chunk_size: usize,
        translation: TranslationPipeline,
    ) -> Self {
        Self {
            client,
            backend_url: backend_url.into(),
            timeout,
            stream_chunk_size: stream_chunk_size.max(1),
            translation: Arc::new(translation),
        }
    }

    /// Backend URL for a path relative to `/v1/`, with the client's query string
    pub(super) fn forward_url(&self, path: &str, query: Option<&str>) -> String {
        let path = path.trim_start_matches('/');
        match query {
            Some(q) if !q.is_empty() => format!("{}/{}?{}", self.backend_url, path, q),
            _ => format!("{}/{}", self.backend_url, path),
        }
    }
}
