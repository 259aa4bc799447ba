//! HTTP API for chat sessions and the download beacon

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::analytics::AnalyticsSink;
use crate::runtime::SessionManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub analytics: Arc<dyn AnalyticsSink>,
}

impl AppState {
    pub fn new(sessions: SessionManager, analytics: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            sessions: Arc::new(sessions),
            analytics,
        }
    }
}
