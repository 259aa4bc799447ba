//! Server-Sent Events support

use crate::runtime::{SessionEvent, SessionSnapshot};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde::Serialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream, starting with the current snapshot
pub fn sse_stream(
    session_id: String,
    snapshot: SessionSnapshot,
    broadcast_rx: tokio::sync::broadcast::Receiver<SessionEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(init_event(&session_id, &snapshot)) });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(session_event_to_axum(event))),
        Err(_) => None, // Skip lagged messages
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

/// Same shape as the REST session response, tagged with the event type
#[derive(Serialize)]
struct InitPayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    session_id: &'a str,
    #[serde(flatten)]
    snapshot: &'a SessionSnapshot,
}

fn init_payload(session_id: &str, snapshot: &SessionSnapshot) -> Value {
    let payload = InitPayload {
        kind: "init",
        session_id,
        snapshot,
    };
    serde_json::to_value(&payload).unwrap_or(Value::Null)
}

fn init_event(session_id: &str, snapshot: &SessionSnapshot) -> Event {
    let data = init_payload(session_id, snapshot);
    Event::default().event("init").data(data.to_string())
}

fn session_event_to_axum(event: SessionEvent) -> Event {
    let (event_type, data) = match event {
        SessionEvent::Message { message } => (
            "message",
            json!({
                "type": "message",
                "message": message
            }),
        ),
        SessionEvent::Fragment { text } => (
            "fragment",
            json!({
                "type": "fragment",
                "text": text
            }),
        ),
        SessionEvent::StateChange { pending } => (
            "state_change",
            json!({
                "type": "state_change",
                "pending": pending
            }),
        ),
    };

    Event::default().event(event_type).data(data.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SessionResponse;

    fn snapshot(draft: Option<&str>) -> SessionSnapshot {
        SessionSnapshot {
            messages: vec![],
            pending: draft.is_some(),
            draft: draft.map(str::to_string),
        }
    }

    #[test]
    fn test_init_matches_rest_shape() {
        for draft in [None, Some("alpha ")] {
            let mut init = init_payload("s1", &snapshot(draft));
            let rest = serde_json::to_value(SessionResponse {
                session_id: "s1".to_string(),
                snapshot: snapshot(draft),
            })
            .unwrap();

            assert_eq!(init["type"], "init");
            init.as_object_mut().unwrap().remove("type");
            assert_eq!(init, rest);
        }
    }

    #[test]
    fn test_init_omits_missing_draft() {
        let init = init_payload("s1", &snapshot(None));
        assert!(init.get("draft").is_none());

        let init = init_payload("s1", &snapshot(Some("alpha ")));
        assert_eq!(init["draft"], json!("alpha "));
    }
}
