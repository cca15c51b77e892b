use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::{GamePhase, RoundPhase};

/// Publicly visible session phase exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisiblePhase {
    /// Settings screen awaiting configuration.
    Settings,
    /// Splash display after the settings were confirmed.
    Splash,
    /// Team rosters shown, shuffle allowed.
    TeamSetup,
    /// Round banner before the countdown.
    RoundIntro,
    /// 3-2-1-Go sequence; the step is carried in the snapshot.
    Countdown,
    /// Both teams assemble their burgers.
    Assembling,
    /// A team finished; its quiz is about to appear.
    QuizIntro,
    /// The winning team's quiz awaits an answer.
    Quiz,
    /// Round result shown before the next round or the scoreboard.
    RoundResult,
    /// Final scoreboard.
    GameOver,
}

impl From<&GamePhase> for VisiblePhase {
    fn from(value: &GamePhase) -> Self {
        match value {
            GamePhase::Settings => VisiblePhase::Settings,
            GamePhase::Splash => VisiblePhase::Splash,
            GamePhase::TeamSetup => VisiblePhase::TeamSetup,
            GamePhase::Playing(RoundPhase::Preparing) => VisiblePhase::RoundIntro,
            GamePhase::Playing(RoundPhase::Countdown { .. }) => VisiblePhase::Countdown,
            GamePhase::Playing(RoundPhase::Active) => VisiblePhase::Assembling,
            GamePhase::Playing(RoundPhase::QuizIntro) => VisiblePhase::QuizIntro,
            GamePhase::Playing(RoundPhase::QuizPending) => VisiblePhase::Quiz,
            GamePhase::Playing(RoundPhase::RoundClosing) => VisiblePhase::RoundResult,
            GamePhase::GameOver => VisiblePhase::GameOver,
        }
    }
}

/// Response exposing the session's phase and pause flag.
#[derive(Debug, Serialize, ToSchema)]
pub struct PhaseResponse {
    /// Current visible phase.
    pub phase: VisiblePhase,
    /// Whether timers are currently frozen.
    pub paused: bool,
}
