//! Property-based tests for the conversation store
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::*;
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_blank_text() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,10}"
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{0,30}"
}

fn arb_submit_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(|text| Event::Submit { text }),
        arb_blank_text().prop_map(|text| Event::Submit { text }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_submit_event(),
        "[a-z]{1,8} ".prop_map(|text| Event::ReplyFragment { text }),
        arb_text().prop_map(|text| Event::ReplyReceived { text }),
        "[a-z ]{1,20}".prop_map(|reason| Event::ReplyFailed { reason }),
    ]
}

fn arb_state() -> impl Strategy<Value = ChatState> {
    prop_oneof![
        Just(ChatState::Idle),
        "[a-z ]{0,20}".prop_map(|draft| ChatState::AwaitingReply { draft }),
    ]
}

fn new_store() -> ConversationStore {
    ConversationStore::new(Arc::new(ChatText::default()))
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // History only grows, ids strictly increase, pending tracks the state
    #[test]
    fn prop_history_is_append_only(events in proptest::collection::vec(arb_event(), 0..30)) {
        let mut store = new_store();

        for event in events {
            let before = store.messages().to_vec();
            let _ = store.apply(event);
            let after = store.messages();

            prop_assert!(after.len() >= before.len());
            prop_assert_eq!(&after[..before.len()], &before[..]);
            prop_assert!(after.windows(2).all(|pair| pair[0].id() < pair[1].id()));
            prop_assert_eq!(store.is_pending(), store.draft().is_some());
        }
    }

    // Blank input never changes anything
    #[test]
    fn prop_blank_submit_is_noop(text in arb_blank_text(), state in arb_state()) {
        let result = accept_submission(&state, text);
        prop_assert!(result.is_err());
    }

    // Nothing is accepted while a reply is pending
    #[test]
    fn prop_pending_rejects_submit(text in arb_text(), draft in "[a-z ]{0,20}") {
        let state = ChatState::AwaitingReply { draft };
        prop_assert_eq!(accept_submission(&state, text).unwrap_err(), InputRejected::Pending);
    }

    // Every accepted submission is answered by exactly one assistant message
    #[test]
    fn prop_exchange_appends_two_messages(
        text in "[a-zA-Z]{1,10}[a-zA-Z ]{0,20}",
        reply in proptest::option::of(arb_text()),
    ) {
        let mut store = new_store();
        store.submit(text.clone()).unwrap();

        let event = match reply {
            Some(text) => Event::ReplyReceived { text },
            None => Event::ReplyFailed { reason: "unavailable".into() },
        };
        store.apply(event).unwrap();

        let messages = store.messages();
        prop_assert_eq!(messages.len(), 3);
        prop_assert_eq!(messages[1].role(), Role::User);
        prop_assert_eq!(messages[1].content(), text.as_str());
        prop_assert_eq!(messages[2].role(), Role::Assistant);
        prop_assert!(!messages[2].content().is_empty());
        prop_assert!(!store.is_pending());
    }
}
