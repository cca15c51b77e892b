//! Session lifecycle commands: configuration, team setup, pause, and resets.

use rand::seq::SliceRandom;
use validator::Validate;

use crate::{
    dto::{
        common::SessionSnapshot,
        game::{ActionResponse, PauseResponse, StartGameRequest},
    },
    error::ServiceError,
    services::{
        round_service::{self, SPLASH_DURATION},
        sse_events,
    },
    state::{
        SharedState, schedule_timer,
        scheduler::TimerKind,
        session::{GameSettings, PerTeam, Player, TeamMode},
        state_machine::{GameEvent, GamePhase},
    },
};

/// Validate the settings, seat the teams, and show the splash screen.
///
/// Configuration problems are surfaced here, before any state changes: the
/// session only leaves the settings screen with a playable configuration.
pub async fn start_game(
    state: &SharedState,
    request: StartGameRequest,
) -> Result<SessionSnapshot, ServiceError> {
    request.validate()?;
    let settings: GameSettings = request.into();
    state.content().ensure_playable(&settings.ranges)?;

    let _gate = state.command_gate().lock().await;
    let mut session = state.session().write().await;
    session.apply(GameEvent::StartGame)?;

    let mut pool: Vec<Player> = state
        .content()
        .players()
        .iter()
        .cloned()
        .map(Into::into)
        .collect();
    if settings.team_mode == TeamMode::Random {
        let mut rng = rand::rng();
        pool.shuffle(&mut rng);
    }
    session.seat_teams(pool);
    session.settings = Some(settings);

    schedule_timer(state, TimerKind::SplashAdvance, SPLASH_DURATION);
    sse_events::broadcast_phase(state, &session);
    sse_events::broadcast_snapshot(state, &session);
    Ok((&*session).into())
}

/// Redistribute the seated players over the two teams at random.
pub async fn shuffle_teams(state: &SharedState) -> Result<SessionSnapshot, ServiceError> {
    let _gate = state.command_gate().lock().await;
    let mut session = state.session().write().await;

    if session.phase() != GamePhase::TeamSetup {
        return Err(ServiceError::InvalidState(
            "teams can only be shuffled during team setup".into(),
        ));
    }

    session.shuffle_teams();
    sse_events::broadcast_snapshot(state, &session);
    Ok((&*session).into())
}

/// Leave team setup and begin round 1.
pub async fn start_playing(state: &SharedState) -> Result<SessionSnapshot, ServiceError> {
    let _gate = state.command_gate().lock().await;
    let mut session = state.session().write().await;

    let ranges = session
        .settings
        .as_ref()
        .map(|settings| settings.ranges.clone())
        .ok_or_else(|| ServiceError::InvalidState("game has not been configured".into()))?;
    state.content().ensure_playable(&ranges)?;

    session.apply(GameEvent::StartPlaying)?;
    session.round = 1;
    session.scores = PerTeam::default();
    session.combos = PerTeam::default();
    session.emotion = None;

    round_service::begin_round(state, &mut session)?;

    sse_events::broadcast_phase(state, &session);
    sse_events::broadcast_snapshot(state, &session);
    Ok((&*session).into())
}

/// Toggle the pause flag, freezing or restarting the sub-phase timers.
///
/// Pausing cancels every scheduled timer outright so nothing stale can fire
/// after resuming; resuming restarts the current sub-phase timer from its
/// full duration. Round progress is untouched either way.
pub async fn toggle_pause(state: &SharedState) -> Result<PauseResponse, ServiceError> {
    let _gate = state.command_gate().lock().await;
    let mut session = state.session().write().await;

    if !matches!(session.phase(), GamePhase::Playing(_)) {
        return Err(ServiceError::InvalidState(
            "pause is only available during play".into(),
        ));
    }

    if session.paused {
        session.paused = false;
        state.timers().bump_epoch();
        round_service::resume_phase_timer(state, &session);
    } else {
        session.paused = true;
        state.timers().bump_epoch();
        round_service::cancel_round_timers(state);
        if let Some(board) = session.board.as_mut() {
            board.wrong_flash = None;
        }
    }

    sse_events::broadcast_snapshot(state, &session);
    Ok(PauseResponse {
        paused: session.paused,
    })
}

/// Force the game over from any round sub-phase.
pub async fn end_game(state: &SharedState) -> Result<ActionResponse, ServiceError> {
    let _gate = state.command_gate().lock().await;
    let mut session = state.session().write().await;

    session.apply(GameEvent::EndGame)?;
    state.timers().bump_epoch();
    state.timers().cancel_all();
    session.board = None;
    session.paused = false;

    sse_events::broadcast_phase(state, &session);
    sse_events::broadcast_snapshot(state, &session);
    Ok(ActionResponse {
        message: "game over".into(),
    })
}

/// Reset the session from the scoreboard and return to the settings screen.
pub async fn play_again(state: &SharedState) -> Result<SessionSnapshot, ServiceError> {
    reset_session(state).await
}

/// Exit the finished game; identical to [`play_again`] from the controller's
/// point of view, the presentation decides which screen to show next.
pub async fn exit_game(state: &SharedState) -> Result<SessionSnapshot, ServiceError> {
    reset_session(state).await
}

async fn reset_session(state: &SharedState) -> Result<SessionSnapshot, ServiceError> {
    let _gate = state.command_gate().lock().await;
    let mut session = state.session().write().await;

    session.apply(GameEvent::Reset)?;
    state.timers().bump_epoch();
    state.timers().cancel_all();
    session.reset();

    sse_events::broadcast_phase(state, &session);
    sse_events::broadcast_snapshot(state, &session);
    Ok((&*session).into())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;
    use crate::{
        dto::{
            common::TeamSideDto,
            game::{QuizAnswerRequest, TeamModeDto},
        },
        services::{
            play_service,
            test_support::{complete_order, drive_to_active, fixture_state, phase_of, start_request},
        },
        state::state_machine::RoundPhase,
    };

    #[tokio::test(start_paused = true)]
    async fn start_game_seats_alternating_teams_and_shows_the_splash() {
        let state = fixture_state();
        let snapshot = start_game(&state, start_request(5)).await.unwrap();

        assert_eq!(phase_of(&state).await, GamePhase::Splash);
        let blue: Vec<&str> = snapshot
            .teams
            .blue
            .players
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let red: Vec<&str> = snapshot
            .teams
            .red
            .players
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(blue, ["Emily", "Olivia"]);
        assert_eq!(red, ["John", "Mike"]);

        sleep(Duration::from_millis(2_100)).await;
        assert_eq!(phase_of(&state).await, GamePhase::TeamSetup);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_settings_are_rejected_before_anything_changes() {
        let state = fixture_state();

        let mut request = start_request(5);
        request.ranges.clear();
        let err = start_game(&state, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let mut request = start_request(5);
        request.rounds = 13;
        let err = start_game(&state, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        assert_eq!(phase_of(&state).await, GamePhase::Settings);
    }

    #[tokio::test(start_paused = true)]
    async fn ranges_without_content_do_not_start_a_session() {
        let state = fixture_state();

        // Range 2 is within bounds but the fixture pack only covers range 1.
        let mut request = start_request(5);
        request.ranges = vec![2];
        let err = start_game(&state, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::ContentUnavailable(_)));
        assert_eq!(phase_of(&state).await, GamePhase::Settings);
    }

    #[tokio::test(start_paused = true)]
    async fn starting_twice_is_an_invalid_state() {
        let state = fixture_state();
        start_game(&state, start_request(5)).await.unwrap();
        let err = start_game(&state, start_request(5)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn shuffle_preserves_parity_and_requires_team_setup() {
        let state = fixture_state();
        start_game(&state, start_request(5)).await.unwrap();

        let err = shuffle_teams(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        sleep(Duration::from_millis(2_100)).await;
        let snapshot = shuffle_teams(&state).await.unwrap();
        assert_eq!(snapshot.teams.blue.players.len(), 2);
        assert_eq!(snapshot.teams.red.players.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn random_team_mode_still_splits_evenly() {
        let state = fixture_state();
        let mut request = start_request(5);
        request.team_mode = TeamModeDto::Random;
        let snapshot = start_game(&state, request).await.unwrap();
        assert_eq!(snapshot.teams.blue.players.len(), 2);
        assert_eq!(snapshot.teams.red.players.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn start_playing_resets_the_tallies_and_enters_round_one() {
        let state = fixture_state();
        start_game(&state, start_request(4)).await.unwrap();
        sleep(Duration::from_millis(2_100)).await;

        let snapshot = start_playing(&state).await.unwrap();
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.max_rounds, 4);
        assert_eq!(snapshot.scores.blue, 0);
        assert_eq!(snapshot.scores.red, 0);
        assert_eq!(
            phase_of(&state).await,
            GamePhase::Playing(RoundPhase::Preparing)
        );
        assert!(snapshot.order.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn finishing_the_last_round_ends_the_game_with_a_winner() {
        let state = fixture_state();
        drive_to_active(&state, start_request(1)).await;

        complete_order(&state, TeamSideDto::Blue).await;
        sleep(Duration::from_millis(1_100)).await;
        play_service::resolve_quiz(
            &state,
            QuizAnswerRequest {
                answer: "Cat".into(),
            },
        )
        .await
        .unwrap();

        sleep(Duration::from_millis(2_600)).await;
        let session = state.session().read().await;
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.round, 1);
        assert_eq!(session.winner(), Some(crate::state::session::TeamSide::Blue));
    }

    #[tokio::test(start_paused = true)]
    async fn end_game_cancels_everything_and_jumps_to_the_scoreboard() {
        let state = fixture_state();
        start_game(&state, start_request(5)).await.unwrap();
        sleep(Duration::from_millis(2_100)).await;
        start_playing(&state).await.unwrap();

        // Mid-countdown.
        sleep(Duration::from_millis(2_000)).await;
        end_game(&state).await.unwrap();
        assert_eq!(phase_of(&state).await, GamePhase::GameOver);

        // No cancelled timer may fire into the finished game.
        sleep(Duration::from_secs(60)).await;
        assert_eq!(phase_of(&state).await, GamePhase::GameOver);
    }

    #[tokio::test(start_paused = true)]
    async fn play_again_returns_a_fresh_session() {
        let state = fixture_state();
        let first_id = {
            let snapshot = start_game(&state, start_request(5)).await.unwrap();
            snapshot.session_id
        };
        sleep(Duration::from_millis(2_100)).await;
        start_playing(&state).await.unwrap();
        end_game(&state).await.unwrap();

        let snapshot = play_again(&state).await.unwrap();
        assert_eq!(phase_of(&state).await, GamePhase::Settings);
        assert_ne!(snapshot.session_id, first_id);
        assert_eq!(snapshot.scores.blue, 0);
        assert!(snapshot.order.is_none());

        // Pause is meaningless outside play.
        let err = toggle_pause(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }
}
