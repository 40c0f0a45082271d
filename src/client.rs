use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

use crate::error::ChatError;
use crate::request::ChatRequest;

/// Path of the chat endpoint, relative to the configured base URL.
pub const ENDPOINT_PATH: &str = "/api/chat";

/// Hard deadline for one request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(120_000);

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), ENDPOINT_PATH),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Replace the deadline. The application always runs with `REQUEST_TIMEOUT`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the request and parse the body as JSON.
    ///
    /// Exactly one network call per invocation. When the deadline passes the
    /// in-flight call is dropped and `ChatError::Timeout` is returned.
    pub async fn send(&self, request: &ChatRequest) -> Result<Value, ChatError> {
        let started = Instant::now();
        debug!(endpoint = %self.endpoint, model = %request.model, "sending chat request");

        let response = timeout(self.timeout, async {
            self.client
                .post(&self.endpoint)
                .header("Content-Type", "application/json")
                .json(request)
                .send()
                .await
        })
        .await
        .map_err(|_| {
            warn!(endpoint = %self.endpoint, secs = self.timeout.as_secs(), "chat request timed out");
            ChatError::Timeout {
                secs: self.timeout.as_secs(),
            }
        })??;

        let status = response.status();
        let remaining = self.timeout.saturating_sub(started.elapsed());
        let text = timeout(remaining, response.text())
            .await
            .map_err(|_| ChatError::Timeout {
                secs: self.timeout.as_secs(),
            })??;

        info!(
            endpoint = %self.endpoint,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chat request finished"
        );

        if !status.is_success() {
            return Err(ChatError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|err| ChatError::invalid_json(err, &text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url_and_path() {
        assert_eq!(
            ChatClient::new("http://localhost:8080").endpoint(),
            "http://localhost:8080/api/chat"
        );
        assert_eq!(
            ChatClient::new("http://localhost:8080/").endpoint(),
            "http://localhost:8080/api/chat"
        );
    }

    #[test]
    fn default_timeout_is_two_minutes() {
        assert_eq!(REQUEST_TIMEOUT.as_secs(), 120);
        assert_eq!(ChatClient::new("http://x").timeout, REQUEST_TIMEOUT);
    }
}
