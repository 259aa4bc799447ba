//! Pure state transition function
//!
//! Given the same state, strings and event this always produces the same
//! result. Id and timestamp assignment happen later, in the store.

use super::{ChatState, ChatText, Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Why a submission was dropped. Callers treat this as a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputRejected {
    #[error("Message is empty")]
    Blank,
    #[error("A reply is already pending")]
    Pending,
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Rejected(#[from] InputRejected),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Validate a submission against the current state.
///
/// Split out of [`transition`] so callers that only submit get a
/// rejection they can match on directly.
pub fn accept_submission(state: &ChatState, text: String) -> Result<TransitionResult, InputRejected> {
    match state {
        ChatState::AwaitingReply { .. } => Err(InputRejected::Pending),
        ChatState::Idle if text.trim().is_empty() => Err(InputRejected::Blank),
        ChatState::Idle => Ok(TransitionResult::new(ChatState::AwaitingReply {
            draft: String::new(),
        })
        .with_effect(Effect::append_user(text.clone()))
        .with_effect(Effect::PendingChanged { pending: true })
        .with_effect(Effect::RequestReply { text })),
    }
}

/// Pure transition function
pub fn transition(
    state: &ChatState,
    strings: &ChatText,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        (_, Event::Submit { text }) => Ok(accept_submission(state, text)?),

        (ChatState::AwaitingReply { draft }, Event::ReplyFragment { text }) => {
            let mut draft = draft.clone();
            draft.push_str(&text);
            Ok(TransitionResult::new(ChatState::AwaitingReply { draft })
                .with_effect(Effect::EmitFragment { text }))
        }

        (ChatState::AwaitingReply { .. }, Event::ReplyReceived { text }) => {
            let content = if text.is_empty() {
                strings.empty_reply.clone()
            } else {
                text
            };
            Ok(TransitionResult::new(ChatState::Idle)
                .with_effect(Effect::append_assistant(content))
                .with_effect(Effect::PendingChanged { pending: false }))
        }

        // The reason is for logs only; the conversation shows the fixed text.
        (ChatState::AwaitingReply { .. }, Event::ReplyFailed { .. }) => {
            Ok(TransitionResult::new(ChatState::Idle)
                .with_effect(Effect::append_assistant(strings.service_failure.clone()))
                .with_effect(Effect::PendingChanged { pending: false }))
        }

        (ChatState::Idle, event) => Err(TransitionError::InvalidTransition(format!(
            "{event:?} while idle"
        ))),
    }
}
