//! Response backend abstraction
//!
//! Provides a common interface for whatever produces assistant replies.

mod error;
mod mock;
mod openai;
mod types;

#[allow(unused_imports)] // Public API re-exports
pub use error::{ServiceError, ServiceErrorKind};
pub use mock::{MockClient, MOCK_LATENCY};
pub use openai::{OpenAiClient, OpenAiConfig};
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Common interface for response backends
#[async_trait]
pub trait ResponseClient: Send + Sync {
    /// Produce the full reply for `message`
    async fn complete(
        &self,
        message: &str,
        options: &CompletionOptions,
    ) -> Result<String, ServiceError>;

    /// Deliver the reply word by word.
    ///
    /// Waits for [`complete`](Self::complete), then hands each fragment to
    /// `on_fragment` in order, pausing [`fragment_delay`](Self::fragment_delay)
    /// after each one. Nothing is delivered when `complete` fails. Returns
    /// the full reply.
    async fn stream(
        &self,
        message: &str,
        options: &CompletionOptions,
        on_fragment: &mut (dyn for<'f> FnMut(&'f str) + Send),
    ) -> Result<String, ServiceError> {
        let reply = self.complete(message, options).await?;
        let delay = self.fragment_delay();
        for fragment in fragments(&reply) {
            on_fragment(&fragment);
            tokio::time::sleep(delay).await;
        }
        Ok(reply)
    }

    /// Pause between streamed fragments
    fn fragment_delay(&self) -> Duration {
        DEFAULT_FRAGMENT_DELAY
    }

    /// Short name of the backend, for logs
    fn backend_id(&self) -> &str;
}

/// Logging wrapper for response backends
pub struct LoggingClient {
    inner: Arc<dyn ResponseClient>,
    backend_id: String,
}

impl LoggingClient {
    pub fn new(inner: Arc<dyn ResponseClient>) -> Self {
        let backend_id = inner.backend_id().to_string();
        Self { inner, backend_id }
    }
}

#[async_trait]
impl ResponseClient for LoggingClient {
    async fn complete(
        &self,
        message: &str,
        options: &CompletionOptions,
    ) -> Result<String, ServiceError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(message, options).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    backend = %self.backend_id,
                    duration_ms = %duration.as_millis(),
                    request_chars = message.chars().count(),
                    reply_chars = reply.chars().count(),
                    "Reply completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    backend = %self.backend_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    "Reply failed"
                );
            }
        }

        result
    }

    fn fragment_delay(&self) -> Duration {
        self.inner.fragment_delay()
    }

    fn backend_id(&self) -> &str {
        &self.backend_id
    }
}
