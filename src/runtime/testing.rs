//! Mock backends for testing
//!
//! These mocks enable session and API tests without timers or network I/O.

use crate::llm::{CompletionOptions, ResponseClient, ServiceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Scripted Client
// ============================================================================

/// Returns queued results in order and records every request
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, ServiceError>>>,
    requests: Mutex<Vec<(String, CompletionOptions)>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn queue_error(&self, error: ServiceError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<(String, CompletionOptions)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseClient for ScriptedClient {
    async fn complete(
        &self,
        message: &str,
        options: &CompletionOptions,
    ) -> Result<String, ServiceError> {
        self.requests
            .lock()
            .unwrap()
            .push((message.to_string(), *options));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::network("No scripted reply queued")))
    }

    fn fragment_delay(&self) -> Duration {
        Duration::ZERO
    }

    fn backend_id(&self) -> &str {
        "scripted"
    }
}

// ============================================================================
// Gated Client
// ============================================================================

/// Holds every reply until [`release`](GatedClient::release) is called
pub struct GatedClient {
    reply: String,
    gate: Notify,
    calls: AtomicUsize,
}

impl GatedClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Let one waiting (or the next) request through
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResponseClient for GatedClient {
    async fn complete(
        &self,
        _message: &str,
        _options: &CompletionOptions,
    ) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(self.reply.clone())
    }

    fn fragment_delay(&self) -> Duration {
        Duration::ZERO
    }

    fn backend_id(&self) -> &str {
        "gated"
    }
}

// ============================================================================
// Panicking Client
// ============================================================================

/// Panics instead of answering
pub struct PanickingClient;

#[async_trait]
impl ResponseClient for PanickingClient {
    async fn complete(
        &self,
        _message: &str,
        _options: &CompletionOptions,
    ) -> Result<String, ServiceError> {
        panic!("backend exploded");
    }

    fn backend_id(&self) -> &str {
        "panicking"
    }
}
