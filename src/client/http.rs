use crate::{
    APP_USER_AGENT,
    session::transport::{HttpReply, LoginTransport, TransportError},
};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// `reqwest` transport with a fixed request timeout.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// # Errors
    /// Returns `TransportError::Request` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::Request(err.to_string()))?;

        Ok(Self { client })
    }
}

impl LoginTransport for HttpTransport {
    #[instrument(skip_all, fields(url = %url))]
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        debug!(status = status.as_u16(), "login response received");

        let status_text = status.canonical_reason().unwrap_or_default().to_string();

        let body = if status.is_success() {
            response.text().await.map_err(map_body_error)?
        } else {
            response.text().await.unwrap_or_default()
        };

        Ok(HttpReply {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

fn map_body_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Body(err.to_string())
    }
}

fn map_request_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_builder() {
        TransportError::Request(err.to_string())
    } else {
        TransportError::Unreachable(err.to_string())
    }
}
