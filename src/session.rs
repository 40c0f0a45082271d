//! Prompt session controller.
//!
//! Owns the prompt, the derived request, and the outcome of the most recent
//! send. At most one request is in flight; its task handle lives here and is
//! the only place a result can come from.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::client::ChatClient;
use crate::error::ChatError;
use crate::extract::extract_assistant_text;
use crate::request::{build_request, ChatRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Sending,
    Succeeded,
    Failed(String),
}

/// Which rendering of the response is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResponseView {
    #[default]
    Json,
    Content,
}

impl ResponseView {
    pub fn toggled(self) -> Self {
        match self {
            ResponseView::Json => ResponseView::Content,
            ResponseView::Content => ResponseView::Json,
        }
    }
}

type PendingRequest = JoinHandle<Result<Value, ChatError>>;

pub struct Session {
    prompt: String,
    request: ChatRequest,
    response: Option<Value>,
    assistant_text: String,
    status: SessionStatus,
    view: ResponseView,
    pending: Option<(PendingRequest, Instant)>,
    last_elapsed: Option<Duration>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            prompt: String::new(),
            request: build_request(""),
            response: None,
            assistant_text: String::new(),
            status: SessionStatus::Idle,
            view: ResponseView::default(),
            pending: None,
            last_elapsed: None,
        }
    }

    pub fn with_view(mut self, view: ResponseView) -> Self {
        self.view = view;
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Replace the prompt and rebuild the request from it.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
        self.request = build_request(&self.prompt);
    }

    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }

    pub fn assistant_text(&self) -> &str {
        &self.assistant_text
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_sending(&self) -> bool {
        self.status == SessionStatus::Sending
    }

    pub fn view(&self) -> ResponseView {
        self.view
    }

    pub fn toggle_view(&mut self) {
        self.view = self.view.toggled();
    }

    /// Duration of the last completed request.
    pub fn last_elapsed(&self) -> Option<Duration> {
        self.last_elapsed
    }

    pub fn can_send(&self) -> bool {
        !self.prompt.trim().is_empty() && !self.is_sending()
    }

    /// Start a request for the current prompt. Returns `false` without
    /// touching any state when the prompt is blank or a request is pending.
    pub fn send(&mut self, client: &ChatClient) -> bool {
        if !self.can_send() {
            debug!(sending = self.is_sending(), "send ignored");
            return false;
        }

        self.response = None;
        self.assistant_text.clear();
        self.status = SessionStatus::Sending;

        let client = client.clone();
        let request = self.request.clone();
        info!(endpoint = %client.endpoint(), prompt_chars = self.prompt.chars().count(), "sending prompt");
        let handle = tokio::spawn(async move { client.send(&request).await });
        self.pending = Some((handle, Instant::now()));
        true
    }

    /// Commit the pending result if the task has finished. Never blocks.
    pub async fn poll(&mut self) {
        let finished = self
            .pending
            .as_ref()
            .map(|(handle, _)| handle.is_finished())
            .unwrap_or(false);
        if finished {
            self.wait().await;
        }
    }

    /// Wait for the pending request, if any, and commit its result.
    pub async fn wait(&mut self) {
        let Some((handle, started)) = self.pending.take() else {
            return;
        };

        let result = match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(ChatError::Generic(format!("request task failed: {}", join_err))),
        };
        self.last_elapsed = Some(started.elapsed());
        self.complete(result);
    }

    pub(crate) fn complete(&mut self, result: Result<Value, ChatError>) {
        match result {
            Ok(value) => {
                self.assistant_text = extract_assistant_text(&value);
                if self.assistant_text.is_empty() {
                    debug!("no known response shape matched");
                }
                self.response = Some(value);
                self.status = SessionStatus::Succeeded;
            }
            Err(err) => {
                warn!(error = %err, "chat request failed");
                self.response = None;
                self.assistant_text.clear();
                self.status = SessionStatus::Failed(err.to_string());
            }
        }
    }
}
