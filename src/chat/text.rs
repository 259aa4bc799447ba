//! User-visible strings

pub const DEFAULT_GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";
pub const DEFAULT_EMPTY_REPLY: &str = "Sorry, I couldn't generate a response.";
pub const DEFAULT_SERVICE_FAILURE: &str =
    "Sorry, there was an error processing your request. Please try again.";

/// Fixed strings the store writes into the conversation on its own behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatText {
    /// Seeded assistant message of every new conversation
    pub greeting: String,
    /// Used when the backend answers with an empty string
    pub empty_reply: String,
    /// Used when the backend fails
    pub service_failure: String,
}

impl Default for ChatText {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            empty_reply: DEFAULT_EMPTY_REPLY.to_string(),
            service_failure: DEFAULT_SERVICE_FAILURE.to_string(),
        }
    }
}
