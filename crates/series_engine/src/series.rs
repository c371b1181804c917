//! Round and series bookkeeping.
//!
//! A series is a run of rounds that ends as soon as one side holds a
//! majority of the configured round count. Draws score nothing, so a
//! series can run past `rounds` rounds.

use super::Mark;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Default number of rounds in a series.
pub const DEFAULT_ROUNDS: u32 = 5;

/// Who opens each round.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StartingRule {
    /// The player opens every round.
    Player,
    /// The computer opens every round.
    Computer,
    /// The player opens odd rounds, the computer opens even rounds.
    #[default]
    Alternate,
}

impl StartingRule {
    /// Returns the mark that moves first in round `round` (1-based).
    pub fn first_mover(self, round: u32) -> Mark {
        match self {
            StartingRule::Player => Mark::PLAYER,
            StartingRule::Computer => Mark::COMPUTER,
            StartingRule::Alternate if round % 2 == 1 => Mark::PLAYER,
            StartingRule::Alternate => Mark::COMPUTER,
        }
    }
}

/// Series settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    rounds: u32,
    starting_rule: StartingRule,
}

impl SeriesConfig {
    /// Creates a config; `rounds` of zero is raised to one.
    pub fn new(rounds: u32, starting_rule: StartingRule) -> Self {
        Self {
            rounds: rounds.max(1),
            starting_rule,
        }
    }

    /// Total rounds the series is played "best of".
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Rule deciding who opens each round.
    pub fn starting_rule(&self) -> StartingRule {
        self.starting_rule
    }

    /// True when `wins` is more than half of the configured rounds.
    pub fn is_majority(&self, wins: u32) -> bool {
        wins.saturating_mul(2) > self.rounds
    }

    /// Fewest wins that decide the series.
    pub fn wins_needed(&self) -> u32 {
        self.rounds / 2 + 1
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROUNDS, StartingRule::default())
    }
}

/// Identity of one cleared board.
///
/// Every restart, new round or series reset hands out a fresh id, so an
/// action captured before the board was cleared can be recognised as stale.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct RoundId(u64);

impl RoundId {
    /// The id following this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for RoundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A mark completed a line.
    Winner(Mark),
    /// The board filled with no line.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Winner(mark) => Some(*mark),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the round was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(mark) => write!(f, "Winner: {}", mark),
            Outcome::Draw => write!(f, "Draw!"),
        }
    }
}

/// Final tally of a decided series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesResult {
    /// Side that reached the majority.
    pub champion: Mark,
    /// Rounds won by the player.
    pub player_wins: u32,
    /// Rounds won by the computer.
    pub computer_wins: u32,
    /// Rounds played, draws included.
    pub rounds_played: u32,
}

impl std::fmt::Display for SeriesResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let who = if self.champion == Mark::PLAYER {
            "Player"
        } else {
            "Computer"
        };
        write!(
            f,
            "{} ({}) wins the series {}-{} after {} rounds",
            who, self.champion, self.player_wins, self.computer_wins, self.rounds_played
        )
    }
}

/// Where the current round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Marks are still being placed.
    InProgress,
    /// The round ended and the series goes on.
    RoundOver(Outcome),
    /// The round ended and decided the series.
    SeriesOver {
        /// How the deciding round ended.
        outcome: Outcome,
        /// Final tally, captured before the counters reset.
        result: SeriesResult,
    },
}

impl Phase {
    /// True once the round has a winner or a draw.
    pub fn is_over(&self) -> bool {
        !matches!(self, Phase::InProgress)
    }

    /// Outcome of the round, if it is over.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Phase::InProgress => None,
            Phase::RoundOver(outcome) => Some(*outcome),
            Phase::SeriesOver { outcome, .. } => Some(*outcome),
        }
    }
}

/// Running score of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scoreboard {
    player_wins: u32,
    computer_wins: u32,
    round: u32,
}

impl Scoreboard {
    /// Fresh series: no wins, round 1.
    pub fn new() -> Self {
        Self {
            player_wins: 0,
            computer_wins: 0,
            round: 1,
        }
    }

    /// Rounds won by the player.
    pub fn player_wins(&self) -> u32 {
        self.player_wins
    }

    /// Rounds won by the computer.
    pub fn computer_wins(&self) -> u32 {
        self.computer_wins
    }

    /// Current round number, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Moves on to the next round.
    pub fn advance(&mut self) {
        self.round = self.round.saturating_add(1);
    }

    /// Records a finished round and decides whether the series is over.
    ///
    /// When a side reaches the majority the scoreboard resets to a fresh
    /// series and the final tally is returned.
    #[instrument(skip(self, config), fields(round = self.round))]
    pub fn record(&mut self, outcome: Outcome, config: &SeriesConfig) -> Option<SeriesResult> {
        match outcome {
            Outcome::Winner(Mark::X) => self.player_wins += 1,
            Outcome::Winner(Mark::O) => self.computer_wins += 1,
            Outcome::Draw => {}
        }
        info!(
            %outcome,
            player_wins = self.player_wins,
            computer_wins = self.computer_wins,
            "Round finished"
        );

        let champion = if config.is_majority(self.player_wins) {
            Mark::PLAYER
        } else if config.is_majority(self.computer_wins) {
            Mark::COMPUTER
        } else {
            return None;
        };

        let result = SeriesResult {
            champion,
            player_wins: self.player_wins,
            computer_wins: self.computer_wins,
            rounds_played: self.round,
        };
        info!(%result, "Series decided");
        *self = Self::new();
        Some(result)
    }
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}
