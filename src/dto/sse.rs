use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::{common::TeamSideDto, phase::VisiblePhase};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// Optional SSE event name.
    pub event: Option<String>,
    /// Serialized data field.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }

    /// Build an event around an already serialized (or plain-text) payload.
    pub fn new<E>(event: E, data: String) -> Self
    where
        E: Into<Option<String>>,
    {
        Self {
            event: event.into(),
            data,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever the session phase changes.
pub struct PhaseChangedEvent {
    /// Phase the session entered.
    pub phase: VisiblePhase,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a quiz is resolved so clients can render the result banner.
pub struct QuizResultEvent {
    /// Team that answered.
    pub team: TeamSideDto,
    /// Whether the answer was correct.
    pub correct: bool,
    /// Points awarded, including any combo bonus.
    pub awarded: u32,
    /// The team's combo counter after this resolution.
    pub combo: u32,
}
