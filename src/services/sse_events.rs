use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        common::SessionSnapshot,
        sse::{PhaseChangedEvent, QuizResultEvent, ServerEvent},
    },
    state::{SharedState, session::Session},
};

const EVENT_SNAPSHOT: &str = "snapshot";
const EVENT_PHASE_CHANGED: &str = "phase_changed";
const EVENT_QUIZ_RESULT: &str = "quiz_result";

/// Broadcast the full session snapshot to public subscribers.
pub fn broadcast_snapshot(state: &SharedState, session: &Session) {
    let snapshot = SessionSnapshot::from(session);
    send_public_event(state, EVENT_SNAPSHOT, &snapshot);
}

/// Broadcast a phase change notification.
pub fn broadcast_phase(state: &SharedState, session: &Session) {
    let payload = PhaseChangedEvent {
        phase: (&session.phase()).into(),
    };
    send_public_event(state, EVENT_PHASE_CHANGED, &payload);
}

/// Broadcast the outcome of a quiz resolution.
pub fn broadcast_quiz_result(state: &SharedState, payload: QuizResultEvent) {
    send_public_event(state, EVENT_QUIZ_RESULT, &payload);
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
