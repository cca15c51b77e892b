use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::{
        common::TeamSideDto,
        validation::{validate_ranges, validate_rounds},
    },
    state::session::{GameSettings, Placement, TeamMode},
};

/// Wire representation of the team distribution mode.
#[derive(Debug, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TeamModeDto {
    /// Alternating assignment preserving pool order.
    Balanced,
    /// Pool is shuffled before the alternating assignment.
    Random,
}

impl From<TeamModeDto> for TeamMode {
    fn from(value: TeamModeDto) -> Self {
        match value {
            TeamModeDto::Balanced => TeamMode::Balanced,
            TeamModeDto::Random => TeamMode::Random,
        }
    }
}

/// Payload used to start a new game from the settings screen.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartGameRequest {
    /// Selected content ranges filtering orders and quizzes.
    pub ranges: Vec<u8>,
    /// Number of rounds to play (1..=12).
    pub rounds: u8,
    /// Team distribution mode.
    pub team_mode: TeamModeDto,
}

impl Validate for StartGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_ranges(&self.ranges) {
            errors.add("ranges", e);
        }
        if let Err(e) = validate_rounds(self.rounds) {
            errors.add("rounds", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl From<StartGameRequest> for GameSettings {
    fn from(value: StartGameRequest) -> Self {
        let mut ranges = value.ranges;
        ranges.sort_unstable();
        ranges.dedup();
        Self {
            ranges,
            rounds: value.rounds,
            team_mode: value.team_mode.into(),
        }
    }
}

/// Payload carrying one ingredient tap.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceIngredientRequest {
    /// Team that tapped.
    pub team: TeamSideDto,
    /// Identifier of the tapped ingredient.
    pub ingredient: String,
}

/// Wire representation of a placement outcome.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlacementOutcome {
    /// The tap was rejected with no effect (round inactive, paused, or
    /// the team already finished).
    Ignored,
    /// The ingredient does not match the next expected one.
    Wrong,
    /// The ingredient was appended to the assembly.
    Placed,
    /// The placement completed the team's assembly.
    Completed,
}

impl From<Placement> for PlacementOutcome {
    fn from(value: Placement) -> Self {
        match value {
            Placement::Ignored => PlacementOutcome::Ignored,
            Placement::Wrong => PlacementOutcome::Wrong,
            Placement::Placed => PlacementOutcome::Placed,
            Placement::Completed => PlacementOutcome::Completed,
        }
    }
}

/// Result of one ingredient tap.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlacementResponse {
    /// What the tap did.
    pub outcome: PlacementOutcome,
}

/// Payload carrying the winning team's quiz answer.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QuizAnswerRequest {
    /// The chosen answer option.
    pub answer: String,
}

/// Result of a quiz resolution.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuizResultResponse {
    /// False when no quiz was pending and the answer was ignored.
    pub accepted: bool,
    /// Whether the answer was correct.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    /// Team that answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamSideDto>,
    /// Points awarded, including any combo bonus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarded: Option<u32>,
    /// The team's combo counter after this resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combo: Option<u32>,
}

impl QuizResultResponse {
    /// Response for an answer that arrived with no quiz pending.
    pub fn ignored() -> Self {
        Self {
            accepted: false,
            correct: None,
            team: None,
            awarded: None,
            combo: None,
        }
    }
}

/// Generic action acknowledgement used by lifecycle endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Result of toggling the pause state.
#[derive(Debug, Serialize, ToSchema)]
pub struct PauseResponse {
    /// Pause flag after the toggle.
    pub paused: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_game_request_validation() {
        let ok = StartGameRequest {
            ranges: vec![1, 2],
            rounds: 5,
            team_mode: TeamModeDto::Balanced,
        };
        assert!(ok.validate().is_ok());

        let no_ranges = StartGameRequest {
            ranges: vec![],
            rounds: 5,
            team_mode: TeamModeDto::Balanced,
        };
        assert!(no_ranges.validate().is_err());

        let too_many_rounds = StartGameRequest {
            ranges: vec![1],
            rounds: 13,
            team_mode: TeamModeDto::Random,
        };
        assert!(too_many_rounds.validate().is_err());
    }

    #[test]
    fn settings_conversion_dedups_ranges() {
        let request = StartGameRequest {
            ranges: vec![3, 1, 3, 2],
            rounds: 4,
            team_mode: TeamModeDto::Balanced,
        };
        let settings: GameSettings = request.into();
        assert_eq!(settings.ranges, vec![1, 2, 3]);
        assert_eq!(settings.rounds, 4);
    }
}
