use thiserror::Error;

/// First value displayed by the pre-round countdown (3-2-1-Go).
pub const COUNTDOWN_START: u8 = 3;

/// High-level phases the session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Settings screen: game configuration is being chosen.
    Settings,
    /// Short splash display after the settings are confirmed.
    Splash,
    /// Teams are displayed and can be reshuffled before play begins.
    TeamSetup,
    /// A game is in progress and sits in one of the round sub-phases.
    Playing(RoundPhase),
    /// Final scoreboard is displayed until the session is reset.
    GameOver,
}

/// Fine-grained phase while a round is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Round banner is shown while the customer and order are set up.
    Preparing,
    /// 3-2-1-Go sequence before input unlocks; `step` 0 is the "Go" beat.
    Countdown {
        /// Current countdown value, from [`COUNTDOWN_START`] down to 0.
        step: u8,
    },
    /// Both teams assemble concurrently; the round time limit is running.
    Active,
    /// A team finished first; short beat before its quiz is revealed.
    QuizIntro,
    /// The winning team's quiz awaits exactly one answer.
    QuizPending,
    /// Round result is displayed before the next round or the game end.
    RoundClosing,
}

/// Events that can be applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Settings confirmed; show the splash screen.
    StartGame,
    /// Splash timer elapsed; move on to team setup.
    SplashDone,
    /// Team setup confirmed; enter the first round.
    StartPlaying,
    /// Round banner timer elapsed; begin the countdown.
    RoundPrepared,
    /// One countdown beat elapsed; step down or unlock input.
    CountdownTick,
    /// A team completed its assembly first; lock input and head to the quiz.
    FirstFinish,
    /// Quiz intro delay elapsed; present the quiz.
    QuizDrawn,
    /// The quiz received its answer; show the round result.
    QuizResolved,
    /// Round time limit expired with no finisher; show the round result.
    TimeUp,
    /// Round result delay elapsed with rounds remaining; prepare the next one.
    NextRound,
    /// Round result delay elapsed on the final round; show the scoreboard.
    Finish,
    /// Host ended the game early from any round sub-phase.
    EndGame,
    /// Play-again or exit from the scoreboard; back to settings.
    Reset,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: GamePhase,
    /// The event that cannot be applied from this phase.
    pub event: GameEvent,
}

/// State machine implementing the round lifecycle flow.
///
/// Every accepted event bumps `version`, which the timer registry uses to
/// detect stale delayed commands.
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    phase: GamePhase,
    version: usize,
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self {
            phase: GamePhase::Settings,
            version: 0,
        }
    }
}

impl GameStateMachine {
    /// Create a new state machine initialised on the settings screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Number of transitions applied so far.
    pub fn version(&self) -> usize {
        self.version
    }

    /// Validate and apply an event, returning the phase entered.
    ///
    /// On rejection the machine is left untouched.
    pub fn apply(&mut self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.phase = next;
        self.version += 1;
        Ok(next)
    }

    /// Compute a transition from an event if the transition is valid.
    fn compute_transition(&self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        use GamePhase::*;
        use RoundPhase::*;

        let next = match (self.phase, event) {
            (Settings, GameEvent::StartGame) => Splash,
            (Splash, GameEvent::SplashDone) => TeamSetup,
            (TeamSetup, GameEvent::StartPlaying) => Playing(Preparing),
            (Playing(Preparing), GameEvent::RoundPrepared) => Playing(Countdown {
                step: COUNTDOWN_START,
            }),
            (Playing(Countdown { step }), GameEvent::CountdownTick) => {
                if step > 0 {
                    Playing(Countdown { step: step - 1 })
                } else {
                    Playing(Active)
                }
            }
            (Playing(Active), GameEvent::FirstFinish) => Playing(QuizIntro),
            (Playing(QuizIntro), GameEvent::QuizDrawn) => Playing(QuizPending),
            (Playing(QuizPending), GameEvent::QuizResolved) => Playing(RoundClosing),
            (Playing(Active), GameEvent::TimeUp) => Playing(RoundClosing),
            (Playing(RoundClosing), GameEvent::NextRound) => Playing(Preparing),
            (Playing(RoundClosing), GameEvent::Finish) => GameOver,
            (Playing(_), GameEvent::EndGame) => GameOver,
            (GameOver, GameEvent::Reset) => Settings,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(sm: &mut GameStateMachine, event: GameEvent) -> GamePhase {
        sm.apply(event).unwrap()
    }

    #[test]
    fn initial_state_is_settings() {
        let sm = GameStateMachine::new();
        assert_eq!(sm.phase(), GamePhase::Settings);
        assert_eq!(sm.version(), 0);
    }

    #[test]
    fn full_happy_path_through_a_quiz_round() {
        let mut sm = GameStateMachine::new();

        assert_eq!(apply(&mut sm, GameEvent::StartGame), GamePhase::Splash);
        assert_eq!(apply(&mut sm, GameEvent::SplashDone), GamePhase::TeamSetup);
        assert_eq!(
            apply(&mut sm, GameEvent::StartPlaying),
            GamePhase::Playing(RoundPhase::Preparing)
        );
        assert_eq!(
            apply(&mut sm, GameEvent::RoundPrepared),
            GamePhase::Playing(RoundPhase::Countdown { step: 3 })
        );
        for expected in [2, 1, 0] {
            assert_eq!(
                apply(&mut sm, GameEvent::CountdownTick),
                GamePhase::Playing(RoundPhase::Countdown { step: expected })
            );
        }
        assert_eq!(
            apply(&mut sm, GameEvent::CountdownTick),
            GamePhase::Playing(RoundPhase::Active)
        );
        assert_eq!(
            apply(&mut sm, GameEvent::FirstFinish),
            GamePhase::Playing(RoundPhase::QuizIntro)
        );
        assert_eq!(
            apply(&mut sm, GameEvent::QuizDrawn),
            GamePhase::Playing(RoundPhase::QuizPending)
        );
        assert_eq!(
            apply(&mut sm, GameEvent::QuizResolved),
            GamePhase::Playing(RoundPhase::RoundClosing)
        );
        assert_eq!(
            apply(&mut sm, GameEvent::NextRound),
            GamePhase::Playing(RoundPhase::Preparing)
        );
    }

    #[test]
    fn time_up_skips_the_quiz_phases() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::StartGame);
        apply(&mut sm, GameEvent::SplashDone);
        apply(&mut sm, GameEvent::StartPlaying);
        apply(&mut sm, GameEvent::RoundPrepared);
        for _ in 0..4 {
            apply(&mut sm, GameEvent::CountdownTick);
        }

        assert_eq!(
            apply(&mut sm, GameEvent::TimeUp),
            GamePhase::Playing(RoundPhase::RoundClosing)
        );
        assert_eq!(apply(&mut sm, GameEvent::Finish), GamePhase::GameOver);
        assert_eq!(apply(&mut sm, GameEvent::Reset), GamePhase::Settings);
    }

    #[test]
    fn end_game_is_valid_from_any_round_sub_phase() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::StartGame);
        apply(&mut sm, GameEvent::SplashDone);
        apply(&mut sm, GameEvent::StartPlaying);

        assert_eq!(apply(&mut sm, GameEvent::EndGame), GamePhase::GameOver);
    }

    #[test]
    fn quiz_cannot_resolve_before_being_drawn() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::StartGame);
        apply(&mut sm, GameEvent::SplashDone);
        apply(&mut sm, GameEvent::StartPlaying);
        apply(&mut sm, GameEvent::RoundPrepared);
        for _ in 0..4 {
            apply(&mut sm, GameEvent::CountdownTick);
        }
        apply(&mut sm, GameEvent::FirstFinish);

        let err = sm.apply(GameEvent::QuizResolved).unwrap_err();
        assert_eq!(err.from, GamePhase::Playing(RoundPhase::QuizIntro));
        assert_eq!(err.event, GameEvent::QuizResolved);
    }

    #[test]
    fn invalid_transition_returns_error_and_keeps_state() {
        let mut sm = GameStateMachine::new();
        let err = sm.apply(GameEvent::CountdownTick).unwrap_err();
        assert_eq!(err.from, GamePhase::Settings);
        assert_eq!(sm.phase(), GamePhase::Settings);
        assert_eq!(sm.version(), 0);
    }

    #[test]
    fn version_counts_applied_transitions_only() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::StartGame);
        let _ = sm.apply(GameEvent::StartGame).unwrap_err();
        apply(&mut sm, GameEvent::SplashDone);
        assert_eq!(sm.version(), 2);
    }
}
