//! Gameplay commands: ingredient placement and quiz resolution.
//!
//! Both handlers treat out-of-phase commands as explicit no-ops rather than
//! errors: a tap that races the round lock simply reports `ignored`.

use crate::{
    dto::{
        game::{
            PlaceIngredientRequest, PlacementOutcome, PlacementResponse, QuizAnswerRequest,
            QuizResultResponse,
        },
        sse::QuizResultEvent,
    },
    error::ServiceError,
    services::{
        round_service::{QUIZ_INTRO_DELAY, ROUND_CLOSING_DELAY, WRONG_FLASH_WINDOW},
        sse_events,
    },
    state::{
        SharedState, schedule_timer,
        scheduler::TimerKind,
        session::{CustomerEmotion, Placement, TeamSide, WrongFlash},
        state_machine::{GameEvent, GamePhase, RoundPhase},
    },
};

/// Points awarded for a correct quiz answer before any combo bonus.
pub const BASE_POINTS: u32 = 20;

/// Bonus added on top of [`BASE_POINTS`] for a post-increment combo count.
///
/// Zero at combo 1 and grows by 10 per additional consecutive level.
pub fn combo_bonus(combo: u32) -> u32 {
    if combo >= 2 { 10 + 10 * (combo - 2) } else { 0 }
}

/// Try to place `ingredient` onto a team's assembly.
///
/// Rejected (no state change) while the round is inactive, the session is
/// paused, or the team already finished. The first team to complete the
/// order locks both teams' input, stops the round clock, and schedules the
/// quiz presentation.
pub async fn place_ingredient(
    state: &SharedState,
    request: PlaceIngredientRequest,
) -> Result<PlacementResponse, ServiceError> {
    let _gate = state.command_gate().lock().await;
    let mut session = state.session().write().await;

    let side: TeamSide = request.team.into();

    if session.paused || !matches!(session.phase(), GamePhase::Playing(RoundPhase::Active)) {
        return Ok(PlacementResponse {
            outcome: PlacementOutcome::Ignored,
        });
    }

    let ranges = session
        .settings
        .as_ref()
        .map(|settings| settings.ranges.clone())
        .unwrap_or_default();

    // Decide up front whether this tap wins the round, so the quiz draw
    // happens before any mutation and the command stays all-or-nothing.
    let completes_first = {
        let Some(board) = session.board.as_ref() else {
            return Ok(PlacementResponse {
                outcome: PlacementOutcome::Ignored,
            });
        };
        let assembly = board.assemblies.get(side);
        board.quiz_winner.is_none()
            && !*board.finished.get(side)
            && assembly.len() + 1 == board.order.len()
            && board.order[assembly.len()] == request.ingredient
    };

    let quiz = if completes_first {
        Some(state.content().draw_quiz(&ranges)?)
    } else {
        None
    };

    let placement = {
        let Some(board) = session.board.as_mut() else {
            return Ok(PlacementResponse {
                outcome: PlacementOutcome::Ignored,
            });
        };
        let placement = board.place(side, &request.ingredient);
        match placement {
            Placement::Wrong => {
                board.wrong_flash = Some(WrongFlash {
                    team: side,
                    ingredient: request.ingredient.clone(),
                });
            }
            Placement::Completed => {
                if let Some(quiz) = quiz {
                    board.quiz_winner = Some(side);
                    board.quiz = Some(quiz);
                    board.wrong_flash = None;
                }
            }
            _ => {}
        }
        placement
    };

    match placement {
        Placement::Ignored => {
            return Ok(PlacementResponse {
                outcome: PlacementOutcome::Ignored,
            });
        }
        Placement::Wrong => {
            schedule_timer(state, TimerKind::WrongFlash, WRONG_FLASH_WINDOW);
        }
        Placement::Completed if completes_first => {
            session.apply(GameEvent::FirstFinish)?;
            state.timers().bump_epoch();
            state.timers().cancel(TimerKind::RoundTimeLimit);
            state.timers().cancel(TimerKind::WrongFlash);
            schedule_timer(state, TimerKind::QuizIntro, QUIZ_INTRO_DELAY);
            sse_events::broadcast_phase(state, &session);
        }
        _ => {}
    }

    sse_events::broadcast_snapshot(state, &session);
    Ok(PlacementResponse {
        outcome: placement.into(),
    })
}

/// Resolve the pending quiz with the given answer.
///
/// A no-op when no quiz is pending. Exactly one answer is accepted per quiz;
/// scoring and combo updates happen here and nowhere else.
pub async fn resolve_quiz(
    state: &SharedState,
    request: QuizAnswerRequest,
) -> Result<QuizResultResponse, ServiceError> {
    let _gate = state.command_gate().lock().await;
    let mut session = state.session().write().await;

    if session.paused
        || !matches!(
            session.phase(),
            GamePhase::Playing(RoundPhase::QuizPending)
        )
    {
        return Ok(QuizResultResponse::ignored());
    }

    let (quiz, winner) = {
        let Some(board) = session.board.as_mut() else {
            return Ok(QuizResultResponse::ignored());
        };
        let Some(winner) = board.quiz_winner else {
            return Ok(QuizResultResponse::ignored());
        };
        let Some(quiz) = board.quiz.take() else {
            return Ok(QuizResultResponse::ignored());
        };
        (quiz, winner)
    };

    let correct = request.answer == quiz.answer;
    let (awarded, combo) = if correct {
        let counter = session.combos.get_mut(winner);
        *counter += 1;
        let combo = *counter;
        *session.combos.get_mut(winner.opponent()) = 0;

        let awarded = BASE_POINTS + combo_bonus(combo);
        *session.scores.get_mut(winner) += awarded;
        session.emotion = Some(CustomerEmotion::Happy);
        (awarded, combo)
    } else {
        *session.combos.get_mut(winner) = 0;
        session.emotion = Some(CustomerEmotion::Angry);
        (0, 0)
    };

    session.apply(GameEvent::QuizResolved)?;
    schedule_timer(state, TimerKind::RoundAdvance, ROUND_CLOSING_DELAY);

    sse_events::broadcast_quiz_result(
        state,
        QuizResultEvent {
            team: winner.into(),
            correct,
            awarded,
            combo,
        },
    );
    sse_events::broadcast_phase(state, &session);
    sse_events::broadcast_snapshot(state, &session);

    Ok(QuizResultResponse {
        accepted: true,
        correct: Some(correct),
        team: Some(winner.into()),
        awarded: Some(awarded),
        combo: Some(combo),
    })
}
