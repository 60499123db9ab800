//! Transport seam for the login call. Implementations only move bytes; status
//! checks and body parsing happen in the submitter so every host behaves the same.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("unable to reach the server: {0}")]
    Unreachable(String),
    #[error("failed to build request: {0}")]
    Request(String),
    /// A 2xx status arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// What came back from the server, before any interpretation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpReply {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends one JSON `POST`. This is the only suspension point of a submission.
#[allow(async_fn_in_trait)]
pub trait LoginTransport {
    /// Must send `Content-Type: application/json`. A non-2xx body is read
    /// best-effort; failing to read it still yields the reply.
    ///
    /// # Errors
    /// Returns `TransportError` when no response was received, or `Body` when
    /// a 2xx body could not be read.
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, TransportError>;
}

impl<T: LoginTransport + ?Sized> LoginTransport for &T {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, TransportError> {
        (**self).post_json(url, body).await
    }
}

/// Joins a base URL and a path with exactly one slash between them.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}
