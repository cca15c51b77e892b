use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::{
        common::SessionSnapshot,
        game::{
            ActionResponse, PauseResponse, PlaceIngredientRequest, PlacementResponse,
            QuizAnswerRequest, QuizResultResponse, StartGameRequest,
        },
    },
    error::AppError,
    services::{play_service, session_service},
    state::SharedState,
};

/// Routes carrying the presentation layer's commands to the controller.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game/start", post(start_game))
        .route("/game/teams/shuffle", post(shuffle_teams))
        .route("/game/play", post(start_playing))
        .route("/game/ingredients", post(place_ingredient))
        .route("/game/quiz/answer", post(answer_quiz))
        .route("/game/pause", post(toggle_pause))
        .route("/game/end", post(end_game))
        .route("/game/again", post(play_again))
        .route("/game/exit", post(exit_game))
}

/// Validate the settings and start a new game session.
#[utoipa::path(
    post,
    path = "/game/start",
    tag = "game",
    request_body = StartGameRequest,
    responses(
        (status = 200, description = "Game started", body = SessionSnapshot),
        (status = 400, description = "Malformed settings"),
        (status = 409, description = "A game is already running"),
        (status = 503, description = "Selected ranges have no content")
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    Json(payload): Json<StartGameRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = session_service::start_game(&state, payload).await?;
    Ok(Json(snapshot))
}

/// Redistribute the roster over the two teams.
#[utoipa::path(
    post,
    path = "/game/teams/shuffle",
    tag = "game",
    responses(
        (status = 200, description = "Teams shuffled", body = SessionSnapshot),
        (status = 409, description = "Not in team setup")
    )
)]
pub async fn shuffle_teams(
    State(state): State<SharedState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = session_service::shuffle_teams(&state).await?;
    Ok(Json(snapshot))
}

/// Confirm the teams and begin round 1.
#[utoipa::path(
    post,
    path = "/game/play",
    tag = "game",
    responses(
        (status = 200, description = "Round 1 starting", body = SessionSnapshot),
        (status = 409, description = "Not in team setup")
    )
)]
pub async fn start_playing(
    State(state): State<SharedState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = session_service::start_playing(&state).await?;
    Ok(Json(snapshot))
}

/// Tap one ingredient onto a team's assembly.
#[utoipa::path(
    post,
    path = "/game/ingredients",
    tag = "game",
    request_body = PlaceIngredientRequest,
    responses(
        (status = 200, description = "Placement outcome", body = PlacementResponse)
    )
)]
pub async fn place_ingredient(
    State(state): State<SharedState>,
    Json(payload): Json<PlaceIngredientRequest>,
) -> Result<Json<PlacementResponse>, AppError> {
    let response = play_service::place_ingredient(&state, payload).await?;
    Ok(Json(response))
}

/// Answer the pending quiz.
#[utoipa::path(
    post,
    path = "/game/quiz/answer",
    tag = "game",
    request_body = QuizAnswerRequest,
    responses(
        (status = 200, description = "Quiz resolution", body = QuizResultResponse)
    )
)]
pub async fn answer_quiz(
    State(state): State<SharedState>,
    Json(payload): Json<QuizAnswerRequest>,
) -> Result<Json<QuizResultResponse>, AppError> {
    let response = play_service::resolve_quiz(&state, payload).await?;
    Ok(Json(response))
}

/// Toggle the pause state.
#[utoipa::path(
    post,
    path = "/game/pause",
    tag = "game",
    responses(
        (status = 200, description = "Pause toggled", body = PauseResponse),
        (status = 409, description = "No game in progress")
    )
)]
pub async fn toggle_pause(
    State(state): State<SharedState>,
) -> Result<Json<PauseResponse>, AppError> {
    let response = session_service::toggle_pause(&state).await?;
    Ok(Json(response))
}

/// Force the game over from any round sub-phase.
#[utoipa::path(
    post,
    path = "/game/end",
    tag = "game",
    responses(
        (status = 200, description = "Game ended", body = ActionResponse),
        (status = 409, description = "No game in progress")
    )
)]
pub async fn end_game(State(state): State<SharedState>) -> Result<Json<ActionResponse>, AppError> {
    let response = session_service::end_game(&state).await?;
    Ok(Json(response))
}

/// Reset the finished game and return to the settings screen.
#[utoipa::path(
    post,
    path = "/game/again",
    tag = "game",
    responses(
        (status = 200, description = "Session reset", body = SessionSnapshot),
        (status = 409, description = "Game is not over")
    )
)]
pub async fn play_again(
    State(state): State<SharedState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = session_service::play_again(&state).await?;
    Ok(Json(snapshot))
}

/// Exit the finished game and return to the settings screen.
#[utoipa::path(
    post,
    path = "/game/exit",
    tag = "game",
    responses(
        (status = 200, description = "Session reset", body = SessionSnapshot),
        (status = 409, description = "Game is not over")
    )
)]
pub async fn exit_game(
    State(state): State<SharedState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = session_service::exit_game(&state).await?;
    Ok(Json(snapshot))
}
