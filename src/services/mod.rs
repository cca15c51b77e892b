/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Ingredient placement and quiz resolution commands.
pub mod play_service;
/// Round lifecycle: timers, countdown, advancement, game end.
pub mod round_service;
/// Session lifecycle commands (start, shuffle, pause, reset).
pub mod session_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use tokio::time::sleep;

    use crate::{
        config::AppConfig,
        content::{ContentPack, ContentProvider, builtin_pack},
        dto::{
            common::TeamSideDto,
            game::{PlaceIngredientRequest, PlacementOutcome, StartGameRequest, TeamModeDto},
        },
        services::{play_service, session_service},
        state::{
            AppState, SharedState,
            state_machine::{GamePhase, RoundPhase},
        },
    };

    /// The single order in the fixture pack, bottom to top.
    pub const FIXTURE_ORDER: [&str; 4] = ["bun-bottom", "patty", "cheese", "bun-top"];

    /// Content pack with exactly one order and one quiz (both range 1) so
    /// every draw is deterministic, and four players for two-player teams.
    pub fn fixture_pack() -> ContentPack {
        let mut pack = builtin_pack();
        pack.players.truncate(4);
        pack.customers.truncate(1);
        pack.orders.truncate(1);
        pack.quizzes.truncate(1);
        pack
    }

    pub fn fixture_state() -> SharedState {
        let provider = ContentProvider::new(fixture_pack()).unwrap();
        AppState::new(AppConfig::with_content(provider))
    }

    pub fn start_request(rounds: u8) -> StartGameRequest {
        StartGameRequest {
            ranges: vec![1],
            rounds,
            team_mode: TeamModeDto::Balanced,
        }
    }

    pub async fn phase_of(state: &SharedState) -> GamePhase {
        state.session().read().await.phase()
    }

    /// Start a game and let the splash, round banner, and countdown run out.
    pub async fn drive_to_active(state: &SharedState, request: StartGameRequest) {
        session_service::start_game(state, request).await.unwrap();
        sleep(Duration::from_millis(2_100)).await;
        session_service::start_playing(state).await.unwrap();
        sleep(Duration::from_millis(6_000)).await;
        assert_eq!(
            phase_of(state).await,
            GamePhase::Playing(RoundPhase::Active),
            "expected the countdown to have run out"
        );
    }

    pub async fn tap(
        state: &SharedState,
        team: TeamSideDto,
        ingredient: &str,
    ) -> PlacementOutcome {
        play_service::place_ingredient(
            state,
            PlaceIngredientRequest {
                team,
                ingredient: ingredient.to_string(),
            },
        )
        .await
        .unwrap()
        .outcome
    }

    /// Tap the whole fixture order for one team.
    pub async fn complete_order(state: &SharedState, team: TeamSideDto) {
        for ingredient in FIXTURE_ORDER {
            tap(state, team, ingredient).await;
        }
    }
}
