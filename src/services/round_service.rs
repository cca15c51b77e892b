//! Round lifecycle driver.
//!
//! Owns the timed transitions: splash, round banner, countdown beats, round
//! time limit, quiz intro, wrong-flash window, and round advancement. Every
//! timer re-enters the controller through [`handle_timer`], which takes the
//! same command gate as user commands, so timed and user-driven mutations
//! never interleave.

use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState, schedule_timer,
        scheduler::TimerKind,
        session::{RoundBoard, Session},
        state_machine::{GameEvent, GamePhase, RoundPhase},
    },
};

/// Splash display duration after the settings are confirmed.
pub(crate) const SPLASH_DURATION: Duration = Duration::from_secs(2);
/// Round banner display before the countdown begins.
pub(crate) const ROUND_INTRO_DURATION: Duration = Duration::from_millis(1500);
/// Duration of each countdown beat (3, 2, 1, Go).
pub(crate) const COUNTDOWN_STEP_DURATION: Duration = Duration::from_secs(1);
/// Time both teams get to assemble before the round ends without a quiz.
pub(crate) const ROUND_TIME_LIMIT: Duration = Duration::from_secs(30);
/// Beat between the first finish and the quiz presentation.
pub(crate) const QUIZ_INTRO_DELAY: Duration = Duration::from_secs(1);
/// Round result display before the next round starts or the game ends.
pub(crate) const ROUND_CLOSING_DELAY: Duration = Duration::from_millis(2500);
/// Display window of the wrong-ingredient flash.
pub(crate) const WRONG_FLASH_WINDOW: Duration = Duration::from_millis(500);

/// Entry point for every delayed command.
///
/// Stale fires are dropped: a timer that was cancelled while already awake
/// carries an epoch older than the registry's current one.
pub(crate) async fn handle_timer(state: &SharedState, kind: TimerKind, epoch: u64) {
    let _gate = state.command_gate().lock().await;

    if state.timers().epoch() != epoch {
        debug!(?kind, "dropping stale timer");
        return;
    }

    if let Err(err) = dispatch_timer(state, kind).await {
        warn!(?kind, error = %err, "timer command rejected");
    }
}

async fn dispatch_timer(state: &SharedState, kind: TimerKind) -> Result<(), ServiceError> {
    let mut session = state.session().write().await;

    // Pausing cancels every handle, but the flag is authoritative.
    if session.paused {
        return Ok(());
    }

    match (kind, session.phase()) {
        (TimerKind::SplashAdvance, GamePhase::Splash) => {
            session.apply(GameEvent::SplashDone)?;
            sse_events::broadcast_phase(state, &session);
        }
        (TimerKind::RoundIntro, GamePhase::Playing(RoundPhase::Preparing)) => {
            session.apply(GameEvent::RoundPrepared)?;
            schedule_timer(state, TimerKind::CountdownTick, COUNTDOWN_STEP_DURATION);
            sse_events::broadcast_phase(state, &session);
        }
        (TimerKind::CountdownTick, GamePhase::Playing(RoundPhase::Countdown { .. })) => {
            let next = session.apply(GameEvent::CountdownTick)?;
            if matches!(next, GamePhase::Playing(RoundPhase::Active)) {
                schedule_timer(state, TimerKind::RoundTimeLimit, ROUND_TIME_LIMIT);
            } else {
                schedule_timer(state, TimerKind::CountdownTick, COUNTDOWN_STEP_DURATION);
            }
            sse_events::broadcast_phase(state, &session);
        }
        (TimerKind::RoundTimeLimit, GamePhase::Playing(RoundPhase::Active)) => {
            // Time's up with no finisher: no quiz, no score change.
            session.apply(GameEvent::TimeUp)?;
            schedule_timer(state, TimerKind::RoundAdvance, ROUND_CLOSING_DELAY);
            sse_events::broadcast_phase(state, &session);
        }
        (TimerKind::QuizIntro, GamePhase::Playing(RoundPhase::QuizIntro)) => {
            session.apply(GameEvent::QuizDrawn)?;
            sse_events::broadcast_phase(state, &session);
        }
        (TimerKind::WrongFlash, _) => {
            if let Some(board) = session.board.as_mut() {
                board.wrong_flash = None;
            }
        }
        (TimerKind::RoundAdvance, GamePhase::Playing(RoundPhase::RoundClosing)) => {
            advance_round(state, &mut session)?;
            sse_events::broadcast_phase(state, &session);
        }
        (kind, phase) => {
            debug!(?kind, ?phase, "timer fired out of phase; ignoring");
            return Ok(());
        }
    }

    sse_events::broadcast_snapshot(state, &session);
    Ok(())
}

/// Set up the round the session just entered (phase must be `Preparing`):
/// invalidate older timers, advance both rosters, draw the customer and
/// order, reset the board, and start the round banner timer.
pub(crate) fn begin_round(
    state: &SharedState,
    session: &mut Session,
) -> Result<(), ServiceError> {
    let ranges = session
        .settings
        .as_ref()
        .map(|settings| settings.ranges.clone())
        .ok_or_else(|| ServiceError::InvalidState("game has not been configured".into()))?;

    // Draw before mutating so a failed draw leaves the session untouched.
    let order = state.content().draw_order(&ranges)?;
    let customer = state.content().draw_customer();

    state.timers().bump_epoch();
    cancel_round_timers(state);

    session.teams.blue.advance();
    session.teams.red.advance();
    session.board = Some(RoundBoard::new(customer, order));
    session.emotion = None;

    schedule_timer(state, TimerKind::RoundIntro, ROUND_INTRO_DURATION);
    Ok(())
}

fn advance_round(state: &SharedState, session: &mut Session) -> Result<(), ServiceError> {
    if session.round >= session.max_rounds() {
        session.apply(GameEvent::Finish)?;
        state.timers().bump_epoch();
        state.timers().cancel_all();
        session.board = None;
    } else {
        session.apply(GameEvent::NextRound)?;
        session.round += 1;
        begin_round(state, session)?;
    }
    Ok(())
}

/// Abort every round-scoped timer.
pub(crate) fn cancel_round_timers(state: &SharedState) {
    for kind in [
        TimerKind::RoundIntro,
        TimerKind::CountdownTick,
        TimerKind::RoundTimeLimit,
        TimerKind::QuizIntro,
        TimerKind::WrongFlash,
        TimerKind::RoundAdvance,
    ] {
        state.timers().cancel(kind);
    }
}

/// Restart the timer matching the current sub-phase from its full duration.
/// Used on resume; `QuizPending` needs no timer (it waits on the answer).
pub(crate) fn resume_phase_timer(state: &SharedState, session: &Session) {
    match session.phase() {
        GamePhase::Playing(RoundPhase::Preparing) => {
            schedule_timer(state, TimerKind::RoundIntro, ROUND_INTRO_DURATION);
        }
        GamePhase::Playing(RoundPhase::Countdown { .. }) => {
            schedule_timer(state, TimerKind::CountdownTick, COUNTDOWN_STEP_DURATION);
        }
        GamePhase::Playing(RoundPhase::Active) => {
            schedule_timer(state, TimerKind::RoundTimeLimit, ROUND_TIME_LIMIT);
        }
        GamePhase::Playing(RoundPhase::QuizIntro) => {
            schedule_timer(state, TimerKind::QuizIntro, QUIZ_INTRO_DELAY);
        }
        GamePhase::Playing(RoundPhase::RoundClosing) => {
            schedule_timer(state, TimerKind::RoundAdvance, ROUND_CLOSING_DELAY);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use crate::{
        services::{
            session_service,
            test_support::{drive_to_active, fixture_state, phase_of, start_request},
        },
        state::state_machine::{GamePhase, RoundPhase},
    };

    #[tokio::test(start_paused = true)]
    async fn round_times_out_without_a_finisher() {
        let state = fixture_state();
        drive_to_active(&state, start_request(2)).await;

        // 30 s limit, then the round result display.
        sleep(Duration::from_millis(30_100)).await;
        assert_eq!(
            phase_of(&state).await,
            GamePhase::Playing(RoundPhase::RoundClosing)
        );

        sleep(Duration::from_millis(2_600)).await;
        let session = state.session().read().await;
        assert_eq!(session.round, 2);
        assert_eq!(session.scores.blue, 0);
        assert_eq!(session.scores.red, 0);
        assert_eq!(session.phase(), GamePhase::Playing(RoundPhase::Preparing));
    }

    #[tokio::test(start_paused = true)]
    async fn final_round_timeout_finishes_the_game() {
        let state = fixture_state();
        drive_to_active(&state, start_request(1)).await;

        sleep(Duration::from_millis(33_000)).await;
        let session = state.session().read().await;
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.round, 1);
        assert_eq!(session.winner(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_mid_countdown_resumes_the_same_step() {
        let state = fixture_state();
        let snapshot = session_service::start_game(&state, start_request(3))
            .await
            .unwrap();
        assert_eq!(snapshot.round, 1);
        sleep(Duration::from_millis(2_100)).await;
        session_service::start_playing(&state).await.unwrap();

        // Land inside the first countdown step.
        sleep(Duration::from_millis(1_600)).await;
        assert_eq!(
            phase_of(&state).await,
            GamePhase::Playing(RoundPhase::Countdown { step: 3 })
        );

        session_service::toggle_pause(&state).await.unwrap();
        sleep(Duration::from_secs(60)).await;
        {
            let session = state.session().read().await;
            assert!(session.paused);
            assert_eq!(
                session.phase(),
                GamePhase::Playing(RoundPhase::Countdown { step: 3 })
            );
        }

        session_service::toggle_pause(&state).await.unwrap();
        // Still the same step right after resuming; the beat restarts in full.
        assert_eq!(
            phase_of(&state).await,
            GamePhase::Playing(RoundPhase::Countdown { step: 3 })
        );

        sleep(Duration::from_millis(1_100)).await;
        assert_eq!(
            phase_of(&state).await,
            GamePhase::Playing(RoundPhase::Countdown { step: 2 })
        );

        // The remaining beats run out before input unlocks: no skipped steps.
        sleep(Duration::from_millis(3_100)).await;
        assert_eq!(phase_of(&state).await, GamePhase::Playing(RoundPhase::Active));
    }

    #[tokio::test(start_paused = true)]
    async fn rosters_advance_every_round_including_the_first() {
        let state = fixture_state();
        drive_to_active(&state, start_request(3)).await;
        {
            let session = state.session().read().await;
            assert_eq!(session.teams.blue.active_index(), 0);
            assert_eq!(session.teams.red.active_index(), 0);
        }

        // Let the round time out and the next one start.
        sleep(Duration::from_millis(33_000)).await;
        let session = state.session().read().await;
        assert_eq!(session.round, 2);
        assert_eq!(session.teams.blue.active_index(), 1);
        assert_eq!(session.teams.red.active_index(), 1);
    }
}
