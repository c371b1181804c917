//! Moves and the reasons a game action can be rejected.

use super::series::RoundId;
use super::{Mark, Position};
use serde::{Deserialize, Serialize};

/// A move in tic-tac-toe: a mark placed at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The mark placed.
    pub mark: Mark,
    /// Where the mark was placed.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    pub fn new(mark: Mark, position: Position) -> Self {
        Self { mark, position }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.position.label())
    }
}

/// Why a game action was rejected.
///
/// None of these are fatal. The engine facade and the session log them
/// and leave the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The round is over; restart or start the next round first.
    #[display("Round is already over")]
    RoundOver,

    /// It's not this mark's turn.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(Mark),

    /// There is nowhere left to move.
    #[display("No empty square left")]
    NoEmptySquare,

    /// A delayed action targeted a round that has since been cleared.
    #[display("Stale action for round {} (current round {})", expected, found)]
    StaleRound {
        /// Round the action was issued for.
        expected: RoundId,
        /// Round currently on the board.
        found: RoundId,
    },

    /// The next round cannot begin while this one is still being played.
    #[display("Round is still in progress")]
    RoundInProgress,

    /// Board index outside 0-8.
    #[display("Position {} out of bounds (must be 0-8)", _0)]
    OutOfBounds(usize),
}

impl std::error::Error for MoveError {}
