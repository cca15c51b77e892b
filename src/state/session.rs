use std::time::SystemTime;

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::content::{Customer, PlayerEntry, Quiz};
use crate::state::state_machine::{GameEvent, GamePhase, GameStateMachine, InvalidTransition};

/// Hard ceiling for the configurable round count.
pub const MAX_ROUNDS_LIMIT: u8 = 12;
/// Highest content range selectable in the settings.
pub const MAX_CONTENT_RANGE: u8 = 8;

/// One of the two competing teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    /// The blue team.
    Blue,
    /// The red team.
    Red,
}

impl TeamSide {
    /// Both sides, in display order.
    pub const BOTH: [TeamSide; 2] = [TeamSide::Blue, TeamSide::Red];

    /// The other team.
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Blue => TeamSide::Red,
            TeamSide::Red => TeamSide::Blue,
        }
    }
}

/// A pair of values, one per team, indexed by [`TeamSide`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerTeam<T> {
    /// Blue team's value.
    pub blue: T,
    /// Red team's value.
    pub red: T,
}

impl<T> PerTeam<T> {
    /// Borrow the value for one side.
    pub fn get(&self, side: TeamSide) -> &T {
        match side {
            TeamSide::Blue => &self.blue,
            TeamSide::Red => &self.red,
        }
    }

    /// Mutably borrow the value for one side.
    pub fn get_mut(&mut self, side: TeamSide) -> &mut T {
        match side {
            TeamSide::Blue => &mut self.blue,
            TeamSide::Red => &mut self.red,
        }
    }
}

/// Player info tracked during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identifier from the content pool.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Avatar reference rendered by the presentation layer.
    pub avatar_url: String,
}

impl From<PlayerEntry> for Player {
    fn from(value: PlayerEntry) -> Self {
        Self {
            id: value.id,
            name: value.name,
            avatar_url: value.avatar_url,
        }
    }
}

/// Ordered team roster with the cursor of the player on deck.
///
/// The cursor starts on the last player so the uniform advance performed at
/// the start of every round (round 1 included) lands on the first player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Player>,
    active: usize,
}

impl Roster {
    /// Build a roster around an ordered player list.
    pub fn new(players: Vec<Player>) -> Self {
        let active = players.len().saturating_sub(1);
        Self { players, active }
    }

    /// Players in roster order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Index of the player currently on deck.
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Move the cursor to the next player, wrapping after the last.
    pub fn advance(&mut self) {
        if !self.players.is_empty() {
            self.active = (self.active + 1) % self.players.len();
        }
    }
}

/// How the player pool is distributed over the two teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamMode {
    /// Alternating assignment preserving pool order.
    Balanced,
    /// Pool is shuffled before the alternating assignment.
    Random,
}

/// Validated game configuration accepted at game start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    /// Selected content ranges filtering orders and quizzes.
    pub ranges: Vec<u8>,
    /// Number of rounds to play, within 1..=[`MAX_ROUNDS_LIMIT`].
    pub rounds: u8,
    /// Team distribution mode.
    pub team_mode: TeamMode,
}

/// Customer mood flipped by the quiz resolution, cleared each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerEmotion {
    /// Correct quiz answer.
    Happy,
    /// Incorrect quiz answer.
    Angry,
}

/// Most recent incorrect tap, shown briefly by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongFlash {
    /// Team that tapped the wrong ingredient.
    pub team: TeamSide,
    /// The ingredient that was tapped.
    pub ingredient: String,
}

/// Outcome of one ingredient placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The team already finished; the tap has no effect.
    Ignored,
    /// The ingredient does not match the next expected one.
    Wrong,
    /// The ingredient was appended to the assembly.
    Placed,
    /// The placement completed the team's assembly.
    Completed,
}

/// Per-round state: the order both teams race to match and their progress.
#[derive(Debug, Clone)]
pub struct RoundBoard {
    /// Customer displayed for this round.
    pub customer: Customer,
    /// Target ingredient sequence.
    pub order: Vec<String>,
    /// Ingredients placed so far by each team, always a prefix of `order`.
    pub assemblies: PerTeam<Vec<String>>,
    /// Whether each team's assembly equals the order in full.
    pub finished: PerTeam<bool>,
    /// The team that finished first this round; set at most once.
    pub quiz_winner: Option<TeamSide>,
    /// Quiz drawn for the winning team, cleared once resolved.
    pub quiz: Option<Quiz>,
    /// Transient wrong-ingredient marker, auto-cleared after a short window.
    pub wrong_flash: Option<WrongFlash>,
}

impl RoundBoard {
    /// Start a fresh board for a new round.
    pub fn new(customer: Customer, order: Vec<String>) -> Self {
        Self {
            customer,
            order,
            assemblies: PerTeam::default(),
            finished: PerTeam::default(),
            quiz_winner: None,
            quiz: None,
            wrong_flash: None,
        }
    }

    /// Try to append `ingredient` to a team's assembly.
    ///
    /// The assembly is only ever extended with the exact next element of the
    /// order, so it stays a prefix of the order by construction.
    pub fn place(&mut self, side: TeamSide, ingredient: &str) -> Placement {
        if *self.finished.get(side) {
            return Placement::Ignored;
        }

        let assembly = self.assemblies.get_mut(side);
        let expected = &self.order[assembly.len()];
        if expected != ingredient {
            return Placement::Wrong;
        }

        assembly.push(ingredient.to_string());
        if assembly.len() == self.order.len() {
            *self.finished.get_mut(side) = true;
            Placement::Completed
        } else {
            Placement::Placed
        }
    }
}

/// Top-level aggregate owning all mutable game state for one play session.
#[derive(Debug, Clone)]
pub struct Session {
    machine: GameStateMachine,
    /// Identifier regenerated on every reset so clients can detect new sessions.
    pub id: Uuid,
    /// Creation timestamp for diagnostics.
    pub started_at: SystemTime,
    /// Settings accepted at game start; `None` until then.
    pub settings: Option<GameSettings>,
    /// Current round number, starting at 1.
    pub round: u8,
    /// Accumulated scores, changed only by quiz resolutions.
    pub scores: PerTeam<u32>,
    /// Consecutive-correct-quiz-answer counters.
    pub combos: PerTeam<u32>,
    /// The two team rosters.
    pub teams: PerTeam<Roster>,
    /// Freezes all timers while true.
    pub paused: bool,
    /// State of the round in progress, if any.
    pub board: Option<RoundBoard>,
    /// Customer mood set by the latest quiz resolution.
    pub emotion: Option<CustomerEmotion>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a fresh session sitting on the settings screen.
    pub fn new() -> Self {
        Self {
            machine: GameStateMachine::new(),
            id: Uuid::new_v4(),
            started_at: SystemTime::now(),
            settings: None,
            round: 1,
            scores: PerTeam::default(),
            combos: PerTeam::default(),
            teams: PerTeam::default(),
            paused: false,
            board: None,
            emotion: None,
        }
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    /// Number of phase transitions applied so far.
    pub fn version(&self) -> usize {
        self.machine.version()
    }

    /// Validate and apply a lifecycle event.
    pub fn apply(&mut self, event: GameEvent) -> Result<GamePhase, InvalidTransition> {
        self.machine.apply(event)
    }

    /// Configured round count, defaulting to the ceiling before configuration.
    pub fn max_rounds(&self) -> u8 {
        self.settings
            .as_ref()
            .map(|settings| settings.rounds)
            .unwrap_or(MAX_ROUNDS_LIMIT)
    }

    /// Partition `pool` into the two rosters with alternating assignment.
    pub fn seat_teams(&mut self, pool: Vec<Player>) {
        let mut blue = Vec::with_capacity(pool.len().div_ceil(2));
        let mut red = Vec::with_capacity(pool.len() / 2);
        for (index, player) in pool.into_iter().enumerate() {
            if index % 2 == 0 {
                blue.push(player);
            } else {
                red.push(player);
            }
        }
        self.teams = PerTeam {
            blue: Roster::new(blue),
            red: Roster::new(red),
        };
    }

    /// Redistribute the combined pool of seated players at random,
    /// preserving team size parity.
    pub fn shuffle_teams(&mut self) {
        let mut pool: Vec<Player> = self
            .teams
            .blue
            .players()
            .iter()
            .chain(self.teams.red.players())
            .cloned()
            .collect();
        let mut rng = rand::rng();
        pool.shuffle(&mut rng);
        self.seat_teams(pool);
    }

    /// The leading team on the scoreboard, or `None` on a tie.
    pub fn winner(&self) -> Option<TeamSide> {
        match self.scores.blue.cmp(&self.scores.red) {
            std::cmp::Ordering::Greater => Some(TeamSide::Blue),
            std::cmp::Ordering::Less => Some(TeamSide::Red),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Discard everything and return to the settings screen.
    pub fn reset(&mut self) {
        *self = Session::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin_pack;

    fn sample_players(count: usize) -> Vec<Player> {
        builtin_pack()
            .players
            .into_iter()
            .take(count)
            .map(Into::into)
            .collect()
    }

    fn sample_customer() -> Customer {
        builtin_pack().customers.remove(0)
    }

    fn order() -> Vec<String> {
        ["bun-bottom", "patty", "cheese", "bun-top"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn seating_alternates_while_preserving_pool_order() {
        let mut session = Session::new();
        session.seat_teams(sample_players(5));

        let blue: Vec<&str> = session
            .teams
            .blue
            .players()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        let red: Vec<&str> = session
            .teams
            .red
            .players()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(blue, ["Emily", "Olivia", "James"]);
        assert_eq!(red, ["John", "Mike"]);
    }

    #[test]
    fn shuffle_keeps_the_pool_and_parity() {
        let mut session = Session::new();
        session.seat_teams(sample_players(12));
        session.shuffle_teams();

        assert_eq!(session.teams.blue.players().len(), 6);
        assert_eq!(session.teams.red.players().len(), 6);

        let mut names: Vec<&str> = session
            .teams
            .blue
            .players()
            .iter()
            .chain(session.teams.red.players())
            .map(|p| p.name.as_str())
            .collect();
        names.sort_unstable();
        let mut expected: Vec<String> = sample_players(12).into_iter().map(|p| p.name).collect();
        expected.sort_unstable();
        assert_eq!(names, expected);
    }

    #[test]
    fn first_advance_lands_on_the_first_player() {
        let mut roster = Roster::new(sample_players(3));
        roster.advance();
        assert_eq!(roster.active_index(), 0);
        roster.advance();
        assert_eq!(roster.active_index(), 1);
        roster.advance();
        roster.advance();
        assert_eq!(roster.active_index(), 0);
    }

    #[test]
    fn assembly_stays_a_prefix_under_mixed_taps() {
        let mut board = RoundBoard::new(sample_customer(), order());

        assert_eq!(board.place(TeamSide::Blue, "patty"), Placement::Wrong);
        assert!(board.assemblies.blue.is_empty());

        assert_eq!(board.place(TeamSide::Blue, "bun-bottom"), Placement::Placed);
        assert_eq!(board.place(TeamSide::Blue, "cheese"), Placement::Wrong);
        assert_eq!(board.place(TeamSide::Blue, "patty"), Placement::Placed);

        assert!(board.assemblies.blue.len() <= board.order.len());
        assert_eq!(board.assemblies.blue, &board.order[..2]);
        assert!(board.assemblies.red.is_empty());
    }

    #[test]
    fn completing_the_order_marks_the_team_finished_once() {
        let mut board = RoundBoard::new(sample_customer(), order());
        for ingredient in ["bun-bottom", "patty", "cheese"] {
            assert_eq!(board.place(TeamSide::Red, ingredient), Placement::Placed);
        }
        assert_eq!(board.place(TeamSide::Red, "bun-top"), Placement::Completed);
        assert!(board.finished.red);

        assert_eq!(board.place(TeamSide::Red, "bun-top"), Placement::Ignored);
        assert_eq!(board.assemblies.red.len(), board.order.len());
    }

    #[test]
    fn winner_compares_scores() {
        let mut session = Session::new();
        assert_eq!(session.winner(), None);
        session.scores.blue = 40;
        session.scores.red = 20;
        assert_eq!(session.winner(), Some(TeamSide::Blue));
        session.scores.red = 40;
        assert_eq!(session.winner(), None);
    }
}
