//! Events that drive the conversation store

/// Inputs to the store's transition function
#[derive(Debug, Clone)]
pub enum Event {
    /// User asked to send `text`
    Submit { text: String },

    // Response backend events
    ReplyFragment { text: String },
    ReplyReceived { text: String },
    ReplyFailed { reason: String },
}
