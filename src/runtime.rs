//! Runtime for live chat sessions
//!
//! Each browser page gets its own session. Sessions live in memory only and
//! are dropped when the page deletes them or stops using them.

mod session;

#[cfg(test)]
pub mod testing;

#[allow(unused_imports)] // Public API re-exports
pub use session::{ChatSession, Delivery, SessionEvent, SessionSnapshot, SubmitOutcome};

use crate::chat::ChatText;
use crate::llm::{CompletionOptions, ResponseClient};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Idle timeout before session cleanup (30 minutes)
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Cleanup check interval (60 seconds)
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Manager for all live sessions
pub struct SessionManager {
    client: Arc<dyn ResponseClient>,
    options: CompletionOptions,
    strings: Arc<ChatText>,
    idle_timeout: Duration,
    sessions: RwLock<HashMap<String, Arc<ChatSession>>>,
}

impl SessionManager {
    pub fn new(
        client: Arc<dyn ResponseClient>,
        options: CompletionOptions,
        strings: ChatText,
    ) -> Self {
        Self {
            client,
            options,
            strings: Arc::new(strings),
            idle_timeout: IDLE_TIMEOUT,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Start the background task that drops abandoned sessions.
    ///
    /// Holds only a weak reference; the task exits once the manager is gone.
    pub fn start_cleanup(manager: &Arc<Self>, interval: Duration) {
        let manager_weak = Arc::downgrade(manager);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Some(manager) = manager_weak.upgrade() {
                    manager.cleanup_idle_sessions().await;
                } else {
                    tracing::debug!("SessionManager dropped, cleanup task exiting");
                    break;
                }
            }
        });
    }

    /// Remove sessions that have been idle too long, returning how many went
    pub async fn cleanup_idle_sessions(&self) -> usize {
        let now = Instant::now();
        let to_remove: Vec<String> = self
            .sessions
            .read()
            .await
            .iter()
            .filter(|(_, session)| session.is_idle(now, self.idle_timeout))
            .map(|(id, _)| id.clone())
            .collect();

        if to_remove.is_empty() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        for id in &to_remove {
            tracing::info!(session = %id, "Cleaning up idle session");
            sessions.remove(id);
        }
        to_remove.len()
    }

    /// Start a new session seeded with the greeting
    pub async fn create(&self) -> Arc<ChatSession> {
        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(ChatSession::new(
            id.clone(),
            Arc::clone(&self.client),
            self.options,
            Arc::clone(&self.strings),
        ));
        self.sessions.write().await.insert(id.clone(), Arc::clone(&session));
        tracing::info!(session = %id, backend = self.client.backend_id(), "Session created");
        session
    }

    pub async fn get(&self, id: &str) -> Option<Arc<ChatSession>> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Discard a session. A reply still in flight finishes on its own task.
    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!(session = %id, "Session discarded");
        }
        removed
    }

    #[allow(dead_code)] // Inspection API
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::ScriptedClient;

    fn manager() -> SessionManager {
        SessionManager::new(
            Arc::new(ScriptedClient::new()),
            CompletionOptions::default(),
            ChatText {
                greeting: "Welcome".into(),
                ..ChatText::default()
            },
        )
    }

    #[tokio::test]
    async fn test_create_get_remove() {
        let manager = manager();
        let session = manager.create().await;
        assert_eq!(manager.len().await, 1);

        let found = manager.get(session.id()).await.unwrap();
        assert!(Arc::ptr_eq(&found, &session));
        assert_eq!(found.snapshot().messages[0].content(), "Welcome");

        assert!(manager.remove(session.id()).await);
        assert!(!manager.remove(session.id()).await);
        assert!(manager.get(session.id()).await.is_none());
        assert_eq!(manager.len().await, 0);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let manager = manager();
        let a = manager.create().await;
        let b = manager.create().await;
        assert_ne!(a.id(), b.id());

        a.submit("only in a", Delivery::Complete).await;

        assert_eq!(a.snapshot().messages.len(), 3);
        assert_eq!(b.snapshot().messages.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_drops_only_idle_sessions() {
        let manager = manager().with_idle_timeout(Duration::from_secs(60));
        let abandoned = manager.create().await;
        let watched = manager.create().await;
        let _events = watched.subscribe();

        tokio::time::advance(Duration::from_secs(45)).await;
        let active = manager.create().await;
        assert_eq!(manager.cleanup_idle_sessions().await, 0);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(manager.cleanup_idle_sessions().await, 1);

        assert!(manager.get(abandoned.id()).await.is_none());
        assert!(manager.get(watched.id()).await.is_some());
        assert!(manager.get(active.id()).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_page_loads_are_reclaimed() {
        let manager = Arc::new(manager().with_idle_timeout(IDLE_TIMEOUT));
        SessionManager::start_cleanup(&manager, CLEANUP_INTERVAL);

        for _ in 0..1000 {
            manager.create().await;
        }
        assert_eq!(manager.len().await, 1000);

        tokio::time::sleep(IDLE_TIMEOUT + CLEANUP_INTERVAL * 2).await;
        assert_eq!(manager.len().await, 0);
    }
}
