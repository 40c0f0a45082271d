//! Send a prompt to a chat-completion endpoint and inspect exactly what goes
//! over the wire: the request, the raw JSON reply, and the assistant text
//! pulled out of it.

pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod logging;
pub mod markdown;
pub mod request;
pub mod session;
pub mod tui;
pub mod ui;

pub use client::{ChatClient, ENDPOINT_PATH, REQUEST_TIMEOUT};
pub use error::ChatError;
pub use extract::extract_assistant_text;
pub use markdown::unescape_whitespace;
pub use request::{build_request, ChatMessage, ChatRequest, ChatRole, RequestPreview};
pub use session::{ResponseView, Session, SessionStatus};
