//! `fetch` transport for the browser host. Requests are aborted after the
//! configured timeout.

use crate::session::transport::{HttpReply, LoginTransport, TransportError};
use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use serde_json::Value;
use std::time::Duration;
use web_sys::AbortController;

#[derive(Clone, Debug)]
pub struct FetchTransport {
    timeout_ms: u32,
}

impl FetchTransport {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout_ms: u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX),
        }
    }
}

impl LoginTransport for FetchTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, TransportError> {
        let payload =
            serde_json::to_string(body).map_err(|err| TransportError::Request(err.to_string()))?;

        let controller = AbortController::new().map_err(|_| {
            TransportError::Request("failed to initialize request timeout".to_string())
        })?;
        let signal = controller.signal();
        let timeout_controller = controller.clone();
        let _timeout = Timeout::new(self.timeout_ms, move || timeout_controller.abort());

        let response = Request::post(url)
            .header("Content-Type", "application/json")
            .abort_signal(Some(&signal))
            .body(payload)
            .map_err(|err| TransportError::Request(err.to_string()))?
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let status_text = response.status_text();
        let body = if response.ok() {
            response.text().await.map_err(map_body_error)?
        } else {
            response.text().await.unwrap_or_default()
        };

        Ok(HttpReply {
            status,
            status_text,
            body,
        })
    }
}

fn map_body_error(err: gloo_net::Error) -> TransportError {
    match map_request_error(err) {
        TransportError::Unreachable(message) => TransportError::Body(message),
        other => other,
    }
}

fn map_request_error(err: gloo_net::Error) -> TransportError {
    let message = err.to_string();
    let lowered = message.to_lowercase();

    if lowered.contains("timeout") || lowered.contains("abort") {
        TransportError::Timeout
    } else {
        TransportError::Unreachable(message)
    }
}
