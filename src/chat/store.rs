//! In-memory conversation store

use super::transition::{accept_submission, transition};
use super::{
    ChatState, ChatText, Effect, Event, InputRejected, Message, MessageId, Role, TransitionError,
    TransitionResult,
};
use std::sync::Arc;

/// Observable outcome of executing one effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUpdate {
    /// A message was appended; it is now the newest one
    MessageAppended(Message),
    Fragment(String),
    PendingChanged(bool),
    /// The caller must fetch a reply for this text and feed the result back
    ReplyRequested(String),
}

/// An accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub updates: Vec<StoreUpdate>,
    /// Text to send to the response backend
    pub request: String,
}

/// Ordered chat history plus the pending flag.
///
/// Starts with one assistant greeting and only ever grows. Lives for one UI
/// session; nothing is persisted.
#[derive(Debug)]
pub struct ConversationStore {
    messages: Vec<Message>,
    state: ChatState,
    next_id: MessageId,
    strings: Arc<ChatText>,
}

impl ConversationStore {
    pub fn new(strings: Arc<ChatText>) -> Self {
        let greeting = Message::new(MessageId::FIRST, Role::Assistant, strings.greeting.clone());
        Self {
            messages: vec![greeting],
            state: ChatState::Idle,
            next_id: MessageId::FIRST.next(),
            strings,
        }
    }

    /// Submit user text. Blank text or a pending reply leaves the store untouched.
    pub fn submit(&mut self, text: impl Into<String>) -> Result<Submission, InputRejected> {
        let request = text.into();
        let result = accept_submission(&self.state, request.clone())?;
        let updates = self.commit(result);
        Ok(Submission { updates, request })
    }

    /// Feed any event through the transition function
    pub fn apply(&mut self, event: Event) -> Result<Vec<StoreUpdate>, TransitionError> {
        let result = transition(&self.state, &self.strings, event)?;
        Ok(self.commit(result))
    }

    fn commit(&mut self, result: TransitionResult) -> Vec<StoreUpdate> {
        self.state = result.new_state;
        result
            .effects
            .into_iter()
            .map(|effect| self.execute(effect))
            .collect()
    }

    fn execute(&mut self, effect: Effect) -> StoreUpdate {
        match effect {
            Effect::AppendMessage { role, content } => {
                let message = Message::new(self.next_id, role, content);
                self.next_id = self.next_id.next();
                self.messages.push(message.clone());
                StoreUpdate::MessageAppended(message)
            }
            Effect::RequestReply { text } => StoreUpdate::ReplyRequested(text),
            Effect::EmitFragment { text } => StoreUpdate::Fragment(text),
            Effect::PendingChanged { pending } => StoreUpdate::PendingChanged(pending),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Newest message. The seeded greeting keeps the history non-empty.
    pub fn latest(&self) -> &Message {
        &self.messages[self.messages.len() - 1]
    }

    #[allow(dead_code)] // Inspection API
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn draft(&self) -> Option<&str> {
        self.state.draft()
    }

    #[allow(dead_code)] // Inspection API
    pub fn strings(&self) -> &ChatText {
        &self.strings
    }
}
