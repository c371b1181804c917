//! Preconditions and invariants for placing a mark.
//!
//! Preconditions are checked on every move and turn an illegal move into
//! a [`MoveError`]. Invariants are checked after the move in debug builds.

use super::action::{Move, MoveError};
use super::state::GameState;
use super::{Board, Mark};
use tracing::{instrument, warn};

/// Precondition: the round must still be in progress.
pub struct RoundInProgress;

impl RoundInProgress {
    /// Rejects moves once the round has a winner or a draw.
    pub fn check(state: &GameState) -> Result<(), MoveError> {
        if state.is_over() {
            Err(MoveError::RoundOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: it must be the mark's turn.
pub struct MarksTurn;

impl MarksTurn {
    /// Rejects moves made out of turn.
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        if mov.mark != state.to_move() {
            Err(MoveError::NotYourTurn(mov.mark))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the square at the move's position must be empty.
pub struct SquareIsEmpty;

impl SquareIsEmpty {
    /// Rejects moves onto an occupied square.
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        if !state.board().is_empty(mov.position) {
            Err(MoveError::SquareOccupied(mov.position))
        } else {
            Ok(())
        }
    }
}

/// Composite precondition: a move is legal if the round is live, it's the
/// mark's turn and the square is empty.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move, in that order.
    #[instrument(skip(state))]
    pub fn check(mov: &Move, state: &GameState) -> Result<(), MoveError> {
        RoundInProgress::check(state)?;
        MarksTurn::check(mov, state)?;
        SquareIsEmpty::check(mov, state)?;
        Ok(())
    }
}

/// Invariant: mark counts never differ by more than one.
///
/// Holds whichever side opens, since sides strictly alternate.
pub struct BoardConsistent;

impl BoardConsistent {
    /// Checks the invariant, logging the counts when it fails.
    pub fn holds(board: &Board) -> bool {
        let x_count = board.count(Mark::X);
        let o_count = board.count(Mark::O);

        let valid = x_count.abs_diff(o_count) <= 1;
        if !valid {
            warn!(x_count, o_count, "Board consistency violated");
        }
        valid
    }
}
