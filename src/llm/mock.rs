//! Stand-in backend used until a real model is wired up

use super::{CompletionOptions, ResponseClient, ServiceError, DEFAULT_FRAGMENT_DELAY};
use async_trait::async_trait;
use std::time::Duration;

pub const MOCK_LATENCY: Duration = Duration::from_millis(1000);

/// Waits a fixed delay, then echoes the message back in a canned sentence
#[derive(Debug, Clone)]
pub struct MockClient {
    latency: Duration,
    fragment_delay: Duration,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            latency: MOCK_LATENCY,
            fragment_delay: DEFAULT_FRAGMENT_DELAY,
        }
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    #[must_use]
    pub fn with_fragment_delay(mut self, delay: Duration) -> Self {
        self.fragment_delay = delay;
        self
    }

    pub fn reply_for(message: &str) -> String {
        format!(
            "This is a mock response to: \"{message}\". Connect your actual AI backend to get real answers."
        )
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseClient for MockClient {
    async fn complete(
        &self,
        message: &str,
        _options: &CompletionOptions,
    ) -> Result<String, ServiceError> {
        tokio::time::sleep(self.latency).await;
        Ok(Self::reply_for(message))
    }

    fn fragment_delay(&self) -> Duration {
        self.fragment_delay
    }

    fn backend_id(&self) -> &str {
        "mock"
    }
}
