//! Read-only snapshot of the session, sufficient for the presentation layer
//! to render every screen.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    content::{Customer, Quiz},
    dto::{format_system_time, phase::VisiblePhase},
    state::{
        session::{CustomerEmotion, Player, Roster, Session, TeamSide, WrongFlash},
        state_machine::{GamePhase, RoundPhase},
    },
};

/// Wire representation of a team side.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TeamSideDto {
    /// The blue team.
    Blue,
    /// The red team.
    Red,
}

impl From<TeamSide> for TeamSideDto {
    fn from(value: TeamSide) -> Self {
        match value {
            TeamSide::Blue => TeamSideDto::Blue,
            TeamSide::Red => TeamSideDto::Red,
        }
    }
}

impl From<TeamSideDto> for TeamSide {
    fn from(value: TeamSideDto) -> Self {
        match value {
            TeamSideDto::Blue => TeamSide::Blue,
            TeamSideDto::Red => TeamSide::Red,
        }
    }
}

/// A per-team pair of counters (scores or combos).
#[derive(Debug, Serialize, ToSchema, Clone, Copy)]
pub struct TeamTally {
    /// Blue team's value.
    pub blue: u32,
    /// Red team's value.
    pub red: u32,
}

/// Public projection of one player.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct PlayerView {
    /// Stable identifier from the content pool.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Avatar reference.
    pub avatar_url: String,
}

impl From<&Player> for PlayerView {
    fn from(value: &Player) -> Self {
        Self {
            id: value.id.clone(),
            name: value.name.clone(),
            avatar_url: value.avatar_url.clone(),
        }
    }
}

/// Public projection of one team roster.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct RosterView {
    /// Players in roster order.
    pub players: Vec<PlayerView>,
    /// Index of the player on deck for the current round.
    pub active_index: usize,
}

impl From<&Roster> for RosterView {
    fn from(value: &Roster) -> Self {
        Self {
            players: value.players().iter().map(Into::into).collect(),
            active_index: value.active_index(),
        }
    }
}

/// Both team rosters.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct TeamsView {
    /// Blue roster.
    pub blue: RosterView,
    /// Red roster.
    pub red: RosterView,
}

/// Public projection of the round's customer.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct CustomerView {
    /// Display name.
    pub name: String,
    /// Neutral visual reference.
    pub emoji: String,
    /// Happy visual reference.
    pub happy_emoji: String,
    /// Angry visual reference.
    pub angry_emoji: String,
}

impl From<&Customer> for CustomerView {
    fn from(value: &Customer) -> Self {
        Self {
            name: value.name.clone(),
            emoji: value.emoji.clone(),
            happy_emoji: value.happy_emoji.clone(),
            angry_emoji: value.angry_emoji.clone(),
        }
    }
}

/// Wire representation of the customer emotion.
#[derive(Debug, Serialize, ToSchema, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum EmotionDto {
    /// Correct quiz answer.
    Happy,
    /// Incorrect quiz answer.
    Angry,
}

impl From<CustomerEmotion> for EmotionDto {
    fn from(value: CustomerEmotion) -> Self {
        match value {
            CustomerEmotion::Happy => EmotionDto::Happy,
            CustomerEmotion::Angry => EmotionDto::Angry,
        }
    }
}

/// Quiz projection shown to clients: question and options, never the answer.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct QuizView {
    /// Question text.
    pub question: String,
    /// Answer options.
    pub options: Vec<String>,
}

impl From<&Quiz> for QuizView {
    fn from(value: &Quiz) -> Self {
        Self {
            question: value.question.clone(),
            options: value.options.clone(),
        }
    }
}

/// Transient wrong-ingredient marker.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct WrongFlashView {
    /// Team that tapped the wrong ingredient.
    pub team: TeamSideDto,
    /// The ingredient that was tapped.
    pub ingredient: String,
}

impl From<&WrongFlash> for WrongFlashView {
    fn from(value: &WrongFlash) -> Self {
        Self {
            team: value.team.into(),
            ingredient: value.ingredient.clone(),
        }
    }
}

/// Per-team assemblies placed so far.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct AssembliesView {
    /// Blue team's assembly, bottom to top.
    pub blue: Vec<String>,
    /// Red team's assembly, bottom to top.
    pub red: Vec<String>,
}

/// Per-team finished flags.
#[derive(Debug, Serialize, ToSchema, Clone, Copy)]
pub struct FinishedView {
    /// Whether blue completed the order.
    pub blue: bool,
    /// Whether red completed the order.
    pub red: bool,
}

/// One entry of the ingredient catalog, in display order.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct IngredientView {
    /// Ingredient identifier used in orders and assemblies.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Visual reference.
    pub emoji: String,
}

/// The ingredient catalog the presentation renders tap controls from.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngredientCatalogResponse {
    /// Catalog entries in display order.
    pub ingredients: Vec<IngredientView>,
}

/// Full read-only snapshot of the session, emitted after every command.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct SessionSnapshot {
    /// Identifier of the play session; changes on every reset.
    pub session_id: Uuid,
    /// Current visible phase.
    pub phase: VisiblePhase,
    /// Whether timers are currently frozen.
    pub paused: bool,
    /// Current round number.
    pub round: u8,
    /// Configured number of rounds.
    pub max_rounds: u8,
    /// Accumulated scores.
    pub scores: TeamTally,
    /// Consecutive-correct-quiz counters.
    pub combos: TeamTally,
    /// Both team rosters with their on-deck cursors.
    pub teams: TeamsView,
    /// RFC3339 timestamp of session creation.
    pub started_at: String,
    /// Countdown step during the 3-2-1-Go sequence (0 is "Go").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<u8>,
    /// Customer displayed for the round in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerView>,
    /// Customer mood after the latest quiz resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionDto>,
    /// Target ingredient sequence of the round in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<String>>,
    /// Ingredients placed so far by each team.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assemblies: Option<AssembliesView>,
    /// Which teams completed the order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished: Option<FinishedView>,
    /// The team that finished first and owns this round's quiz.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_winner: Option<TeamSideDto>,
    /// Pending quiz, present only while an answer is awaited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizView>,
    /// Most recent incorrect tap, present during its display window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrong_flash: Option<WrongFlashView>,
    /// Leading team on the final scoreboard; absent on a tie or mid-game.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<TeamSideDto>,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        let phase = session.phase();
        let countdown = match phase {
            GamePhase::Playing(RoundPhase::Countdown { step }) => Some(step),
            _ => None,
        };
        let quiz = match phase {
            GamePhase::Playing(RoundPhase::QuizPending) => session
                .board
                .as_ref()
                .and_then(|board| board.quiz.as_ref())
                .map(Into::into),
            _ => None,
        };
        let winner = match phase {
            GamePhase::GameOver => session.winner().map(Into::into),
            _ => None,
        };

        let board = session.board.as_ref();

        Self {
            session_id: session.id,
            phase: (&phase).into(),
            paused: session.paused,
            round: session.round,
            max_rounds: session.max_rounds(),
            scores: TeamTally {
                blue: session.scores.blue,
                red: session.scores.red,
            },
            combos: TeamTally {
                blue: session.combos.blue,
                red: session.combos.red,
            },
            teams: TeamsView {
                blue: (&session.teams.blue).into(),
                red: (&session.teams.red).into(),
            },
            started_at: format_system_time(session.started_at),
            countdown,
            customer: board.map(|board| (&board.customer).into()),
            emotion: session.emotion.map(Into::into),
            order: board.map(|board| board.order.clone()),
            assemblies: board.map(|board| AssembliesView {
                blue: board.assemblies.blue.clone(),
                red: board.assemblies.red.clone(),
            }),
            finished: board.map(|board| FinishedView {
                blue: board.finished.blue,
                red: board.finished.red,
            }),
            quiz_winner: board.and_then(|board| board.quiz_winner.map(Into::into)),
            quiz,
            wrong_flash: board.and_then(|board| board.wrong_flash.as_ref().map(Into::into)),
            winner,
        }
    }
}
