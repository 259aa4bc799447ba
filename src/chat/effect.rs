//! Effects produced by store transitions

use super::Role;

/// Work to perform after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a new message to the history
    AppendMessage { role: Role, content: String },

    /// Ask the response backend for a reply to `text`
    RequestReply { text: String },

    /// Forward a streamed fragment to viewers
    EmitFragment { text: String },

    /// The pending flag flipped
    PendingChanged { pending: bool },
}

impl Effect {
    pub fn append_user(content: impl Into<String>) -> Self {
        Effect::AppendMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn append_assistant(content: impl Into<String>) -> Self {
        Effect::AppendMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
