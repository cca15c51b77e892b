use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status (always "ok"; the service carries no external backend).
    pub status: String,
    /// Number of players available in the loaded content pack.
    pub players: usize,
    /// Number of order templates available in the loaded content pack.
    pub orders: usize,
    /// Number of quizzes available in the loaded content pack.
    pub quizzes: usize,
}
