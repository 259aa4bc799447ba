//! One chat session: a conversation store bound to a response backend

use crate::chat::{ChatText, ConversationStore, Event, InputRejected, Message, StoreUpdate};
use crate::llm::{CompletionOptions, ResponseClient, ServiceError};
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;

/// How the reply should reach viewers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
    /// One message once the backend answers
    #[default]
    Complete,
    /// Word-by-word fragments first, then the message
    Streamed,
}

/// Result of [`ChatSession::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing happened
    Ignored(InputRejected),
    /// The backend answered; carries the appended assistant message
    Replied(Message),
    /// The backend failed; carries the appended fallback message
    Failed(Message),
}

/// Changes pushed to live viewers
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Message { message: Message },
    Fragment { text: String },
    StateChange { pending: bool },
}

/// Point-in-time view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<String>,
}

pub struct ChatSession {
    id: String,
    store: Mutex<ConversationStore>,
    client: Arc<dyn ResponseClient>,
    options: CompletionOptions,
    broadcast_tx: broadcast::Sender<SessionEvent>,
    /// Last time a viewer touched the session (for idle timeout)
    last_activity: Mutex<Instant>,
}

impl ChatSession {
    pub fn new(
        id: impl Into<String>,
        client: Arc<dyn ResponseClient>,
        options: CompletionOptions,
        strings: Arc<ChatText>,
    ) -> Self {
        let (broadcast_tx, _) = broadcast::channel(128);
        Self {
            id: id.into(),
            store: Mutex::new(ConversationStore::new(strings)),
            client,
            options,
            broadcast_tx,
            last_activity: Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.touch();
        self.broadcast_tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.touch();
        let store = self.lock_store();
        SessionSnapshot {
            messages: store.messages().to_vec(),
            pending: store.is_pending(),
            draft: store.draft().map(str::to_string),
        }
    }

    #[allow(dead_code)] // Inspection API
    pub fn is_pending(&self) -> bool {
        self.lock_store().is_pending()
    }

    /// Whether the session has gone unused for longer than `timeout`.
    ///
    /// A session with a reply in flight or an open event stream is never idle.
    pub fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        if self.broadcast_tx.receiver_count() > 0 || self.lock_store().is_pending() {
            return false;
        }
        let last_activity = *self
            .last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        now.saturating_duration_since(last_activity) > timeout
    }

    fn touch(&self) {
        *self
            .last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Submit user text and wait for the conversation to settle.
    ///
    /// Blank text, or text sent while a reply is pending, is dropped. The
    /// reply is fetched on its own task, which settles the store even if
    /// this future is dropped.
    pub async fn submit(self: &Arc<Self>, text: &str, delivery: Delivery) -> SubmitOutcome {
        self.touch();
        let submission = {
            let mut store = self.lock_store();
            match store.submit(text) {
                Ok(submission) => submission,
                Err(reason) => {
                    tracing::debug!(session = %self.id, reason = %reason, "Submission ignored");
                    return SubmitOutcome::Ignored(reason);
                }
            }
        };

        for update in submission.updates {
            self.publish(update);
        }

        let task = tokio::spawn(Arc::clone(self).run_reply(submission.request, delivery));
        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(session = %self.id, error = %e, "Reply task did not finish");
                self.settle(Event::ReplyFailed {
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn run_reply(self: Arc<Self>, request: String, delivery: Delivery) -> SubmitOutcome {
        let fetch = self.fetch_reply(&request, delivery);
        let event = match AssertUnwindSafe(fetch).catch_unwind().await {
            Ok(Ok(reply)) => Event::ReplyReceived { text: reply },
            Ok(Err(e)) => {
                tracing::warn!(
                    session = %self.id,
                    kind = e.kind.as_str(),
                    error = %e,
                    "Backend could not produce a reply"
                );
                Event::ReplyFailed { reason: e.message }
            }
            Err(_) => {
                tracing::error!(session = %self.id, "Backend panicked while producing a reply");
                Event::ReplyFailed {
                    reason: "backend panicked".to_string(),
                }
            }
        };
        self.settle(event)
    }

    async fn fetch_reply(&self, request: &str, delivery: Delivery) -> Result<String, ServiceError> {
        match delivery {
            Delivery::Complete => self.client.complete(request, &self.options).await,
            Delivery::Streamed => {
                let mut on_fragment = |fragment: &str| {
                    self.apply(Event::ReplyFragment {
                        text: fragment.to_string(),
                    });
                };
                self.client
                    .stream(request, &self.options, &mut on_fragment)
                    .await
            }
        }
    }

    /// Apply the final reply event and report the message it appended
    fn settle(&self, event: Event) -> SubmitOutcome {
        let failed = matches!(event, Event::ReplyFailed { .. });
        self.touch();
        let mut store = self.lock_store();
        match store.apply(event) {
            Ok(updates) => updates.into_iter().for_each(|u| self.publish(u)),
            Err(e) => tracing::warn!(session = %self.id, error = %e, "Reply arrived in unexpected state"),
        }
        let reply = store.latest().clone();
        if failed {
            SubmitOutcome::Failed(reply)
        } else {
            SubmitOutcome::Replied(reply)
        }
    }

    fn apply(&self, event: Event) {
        let mut store = self.lock_store();
        match store.apply(event) {
            Ok(updates) => updates.into_iter().for_each(|u| self.publish(u)),
            Err(e) => tracing::warn!(session = %self.id, error = %e, "Dropped store event"),
        }
    }

    fn publish(&self, update: StoreUpdate) {
        let event = match update {
            StoreUpdate::MessageAppended(message) => SessionEvent::Message { message },
            StoreUpdate::Fragment(text) => SessionEvent::Fragment { text },
            StoreUpdate::PendingChanged(pending) => SessionEvent::StateChange { pending },
            StoreUpdate::ReplyRequested(_) => return,
        };
        // No subscribers is fine
        let _ = self.broadcast_tx.send(event);
    }

    fn lock_store(&self) -> MutexGuard<'_, ConversationStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
