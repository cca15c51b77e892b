use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload describing the loaded content pack.
pub fn health_status(state: &SharedState) -> HealthResponse {
    let content = state.content();
    HealthResponse {
        status: "ok".to_string(),
        players: content.players().len(),
        orders: content.order_count(),
        quizzes: content.quiz_count(),
    }
}
