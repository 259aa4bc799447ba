//! Conversation store
//!
//! Append-only chat history guarded by a single pending flag. Every change
//! goes through the pure `transition` function; the store only executes the
//! effects it returns.

mod effect;
mod event;
mod message;
mod state;
mod store;
mod text;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use message::{Message, MessageId, Role};
pub use state::ChatState;
pub use store::{ConversationStore, StoreUpdate};
pub use text::ChatText;
#[allow(unused_imports)] // Public API re-exports
pub use transition::{accept_submission, transition, InputRejected, TransitionError, TransitionResult};
