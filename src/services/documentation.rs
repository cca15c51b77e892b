use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Burger Rush Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::game::start_game,
        crate::routes::game::shuffle_teams,
        crate::routes::game::start_playing,
        crate::routes::game::place_ingredient,
        crate::routes::game::answer_quiz,
        crate::routes::game::toggle_pause,
        crate::routes::game::end_game,
        crate::routes::game::play_again,
        crate::routes::game::exit_game,
        crate::routes::public::get_snapshot,
        crate::routes::public::get_phase,
        crate::routes::public::get_ingredients,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::phase::VisiblePhase,
            crate::dto::phase::PhaseResponse,
            crate::dto::common::SessionSnapshot,
            crate::dto::common::TeamSideDto,
            crate::dto::common::TeamTally,
            crate::dto::common::PlayerView,
            crate::dto::common::RosterView,
            crate::dto::common::TeamsView,
            crate::dto::common::CustomerView,
            crate::dto::common::EmotionDto,
            crate::dto::common::QuizView,
            crate::dto::common::WrongFlashView,
            crate::dto::common::AssembliesView,
            crate::dto::common::FinishedView,
            crate::dto::common::IngredientView,
            crate::dto::common::IngredientCatalogResponse,
            crate::dto::game::StartGameRequest,
            crate::dto::game::TeamModeDto,
            crate::dto::game::PlaceIngredientRequest,
            crate::dto::game::PlacementOutcome,
            crate::dto::game::PlacementResponse,
            crate::dto::game::QuizAnswerRequest,
            crate::dto::game::QuizResultResponse,
            crate::dto::game::ActionResponse,
            crate::dto::game::PauseResponse,
            crate::dto::sse::PhaseChangedEvent,
            crate::dto::sse::QuizResultEvent,
        )
    ),
    tags(
        (name = "game", description = "Presentation-layer commands"),
        (name = "public", description = "Read-only session projections"),
        (name = "sse", description = "Server-sent events stream"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
