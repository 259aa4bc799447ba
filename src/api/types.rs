//! API request and response types

use crate::analytics::DownloadKind;
use crate::chat::Message;
use crate::runtime::{Delivery, SessionSnapshot};
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    /// Deliver the reply word by word over the event stream
    #[serde(default)]
    pub stream: bool,
}

impl ChatRequest {
    pub fn delivery(&self) -> Delivery {
        if self.stream {
            Delivery::Streamed
        } else {
            Delivery::Complete
        }
    }
}

/// Response for chat action
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// False when the input was dropped (blank, or a reply was pending)
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<Message>,
    pub messages: Vec<Message>,
    pub pending: bool,
}

/// Response with a session and its history
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Download beacon from the page
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(rename = "type")]
    pub kind: DownloadKind,
    #[serde(default = "default_page")]
    pub page: String,
}

fn default_page() -> String {
    "/".to_string()
}

/// Response for the download beacon
#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub notice: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
