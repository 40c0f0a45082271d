use thiserror::Error;

/// Failure of a single chat request. Every variant is terminal for that
/// request only; the user recovers by sending again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Network failures, unparseable bodies, a crashed request task.
    #[error("{0}")]
    Generic(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Generic(err.to_string())
    }
}

/// Characters of an unparseable body kept in the error message.
const BODY_SNIPPET_CHARS: usize = 200;

impl ChatError {
    /// A 2xx body that is not JSON. Keeps the start of the body so it can
    /// still be inspected.
    pub fn invalid_json(err: serde_json::Error, body: &str) -> Self {
        let mut snippet: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
        if body.chars().nth(BODY_SNIPPET_CHARS).is_some() {
            snippet.push('…');
        }
        ChatError::Generic(format!("invalid JSON in response: {}; body: {}", err, snippet))
    }
}
