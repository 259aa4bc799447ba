//! Chat message types

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Per-store message identifier, assigned in append order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub const FIRST: MessageId = MessageId(1);

    #[allow(dead_code)] // Inspection API
    pub fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        MessageId(self.0 + 1)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation.
///
/// Messages are immutable: the store hands out shared references and
/// clones, never a way to edit one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
}

impl Message {
    pub(crate) fn new(id: MessageId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    #[allow(dead_code)] // Inspection API; serialized with the message
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_advance_by_one() {
        let id = MessageId::FIRST;
        assert_eq!(id.get(), 1);
        assert_eq!(id.next().get(), 2);
        assert!(id.next() > id);
    }

    #[test]
    fn test_message_serializes_with_lowercase_role() {
        let msg = Message::new(MessageId::FIRST, Role::Assistant, "hi");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"], "hi");
        assert!(value["created_at"].is_string());
    }
}
