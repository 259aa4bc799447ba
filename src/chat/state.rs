//! Conversation state

/// Whether the conversation is waiting on the response backend
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChatState {
    /// Ready for a new submission
    #[default]
    Idle,

    /// A reply is in flight. `draft` holds the streamed fragments received so far.
    AwaitingReply { draft: String },
}

impl ChatState {
    /// The pending flag
    pub fn is_pending(&self) -> bool {
        matches!(self, ChatState::AwaitingReply { .. })
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            ChatState::Idle => None,
            ChatState::AwaitingReply { draft } => Some(draft),
        }
    }
}
