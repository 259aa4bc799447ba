//! Common types for reply requests

use std::time::Duration;

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_FRAGMENT_DELAY: Duration = Duration::from_millis(50);

/// Tuning values passed through to the backend untouched
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }
}

/// Split a reply into stream fragments: each whitespace-delimited word
/// followed by a single space.
pub fn fragments(reply: &str) -> impl Iterator<Item = String> + '_ {
    reply.split_whitespace().map(|word| format!("{word} "))
}
