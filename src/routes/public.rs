use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{
        common::{IngredientCatalogResponse, IngredientView, SessionSnapshot},
        phase::PhaseResponse,
    },
    state::SharedState,
};

/// Public read-only endpoints that expose the current session state.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/public/snapshot", get(get_snapshot))
        .route("/public/phase", get(get_phase))
        .route("/public/ingredients", get(get_ingredients))
}

#[utoipa::path(
    get,
    path = "/public/snapshot",
    tag = "public",
    responses((status = 200, description = "Full session snapshot", body = SessionSnapshot))
)]
/// Return the full read-only snapshot the presentation layer renders from.
pub async fn get_snapshot(State(state): State<SharedState>) -> Json<SessionSnapshot> {
    let session = state.session().read().await;
    Json((&*session).into())
}

#[utoipa::path(
    get,
    path = "/public/phase",
    tag = "public",
    responses((status = 200, description = "Current phase", body = PhaseResponse))
)]
/// Return the high-level phase the session is currently in.
pub async fn get_phase(State(state): State<SharedState>) -> Json<PhaseResponse> {
    let session = state.session().read().await;
    Json(PhaseResponse {
        phase: (&session.phase()).into(),
        paused: session.paused,
    })
}

#[utoipa::path(
    get,
    path = "/public/ingredients",
    tag = "public",
    responses((status = 200, description = "Ingredient catalog", body = IngredientCatalogResponse))
)]
/// Return the ingredient catalog in display order.
pub async fn get_ingredients(State(state): State<SharedState>) -> Json<IngredientCatalogResponse> {
    let ingredients = state
        .content()
        .ingredients()
        .iter()
        .map(|(id, info)| IngredientView {
            id: id.clone(),
            name: info.name.clone(),
            emoji: info.emoji.clone(),
        })
        .collect();
    Json(IngredientCatalogResponse { ingredients })
}
