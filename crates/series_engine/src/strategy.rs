//! Greedy single-ply move picker for the computer opponent.
//!
//! The computer takes a win when one is on the board, otherwise blocks the
//! player's immediate win, otherwise plays a uniformly random empty square.
//! It never looks further ahead, so forks beat it.

use super::rules::LINES;
use super::{Board, Mark, Position, Square};
use derive_new::new;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Why the computer picked a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Reason {
    /// Completes a line of the computer's own marks.
    Win,
    /// Fills the last gap in a line of the player's marks.
    Block,
    /// Nothing to win or block.
    Random,
}

/// A chosen square together with the rule that picked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Choice {
    /// Square to mark.
    pub position: Position,
    /// Rule that selected the square.
    pub reason: Reason,
}

/// Finds the empty square that would complete a line of two `mark`s.
///
/// Lines are scanned in [`LINES`] order and the cells of each line in
/// a, b, c order; the first hit wins.
pub fn completing_move(board: &Board, mark: Mark) -> Option<Position> {
    let own = Square::Occupied(mark);
    for line in LINES {
        for (i, &pos) in line.iter().enumerate() {
            if !board.is_empty(pos) {
                continue;
            }
            let others_own = line
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .all(|(_, &other)| board.get(other) == own);
            if others_own {
                return Some(pos);
            }
        }
    }
    None
}

/// Picks the computer's next square.
///
/// Returns `None` only when the board is full.
#[instrument(skip(board, rng))]
pub fn choose_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Choice> {
    if let Some(position) = completing_move(board, Mark::COMPUTER) {
        debug!(%position, "Taking winning square");
        return Some(Choice::new(position, Reason::Win));
    }

    if let Some(position) = completing_move(board, Mark::PLAYER) {
        debug!(%position, "Blocking player");
        return Some(Choice::new(position, Reason::Block));
    }

    let position = *board.empty_positions().choose(rng)?;
    debug!(%position, "No threat, picking at random");
    Some(Choice::new(position, Reason::Random))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha8Rng;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_blocks_player_row() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let choice = choose_move(&board("XX. .O. ..."), &mut rng).unwrap();
        assert_eq!(choice, Choice::new(Position::TopRight, Reason::Block));
    }

    #[test]
    fn test_takes_winning_square() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let choice = choose_move(&board("OO. XX. X.."), &mut rng).unwrap();
        assert_eq!(choice, Choice::new(Position::TopRight, Reason::Win));
    }

    #[test]
    fn test_win_beats_block() {
        // X threatens the middle column, O can finish the left column.
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let choice = choose_move(&board("OX. .X. O.."), &mut rng).unwrap();
        assert_eq!(choice, Choice::new(Position::MiddleLeft, Reason::Win));
    }

    #[test]
    fn test_gap_in_middle_of_line() {
        assert_eq!(
            completing_move(&board("X.X ... ..."), Mark::X),
            Some(Position::TopCenter)
        );
    }

    #[test]
    fn test_earliest_line_wins_ties() {
        // Two blocking squares: the top row (line 0) precedes the left column (line 3).
        let b = board("XX. X.. ..O");
        assert_eq!(completing_move(&b, Mark::X), Some(Position::TopRight));
    }

    #[test]
    fn test_random_only_picks_empty_squares() {
        let b = board("X.. .O. ...");
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let choice = choose_move(&b, &mut rng).unwrap();
            assert_eq!(choice.reason, Reason::Random);
            assert!(b.is_empty(choice.position));
        }
    }

    #[test]
    fn test_random_pick_is_uniform() {
        const DRAWS: usize = 9_100;
        let b = board("X.. .O. ...");
        let empty = b.empty_positions();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut counts = [0usize; 9];

        for _ in 0..DRAWS {
            let choice = choose_move(&b, &mut rng).unwrap();
            assert_eq!(choice.reason, Reason::Random);
            counts[choice.position.to_index()] += 1;
        }

        let mean = DRAWS / empty.len();
        let tolerance = mean * 15 / 100;
        for position in Position::ALL {
            let count = counts[position.to_index()];
            if empty.contains(&position) {
                assert!(
                    count.abs_diff(mean) <= tolerance,
                    "{position} picked {count} times, expected about {mean}"
                );
            } else {
                assert_eq!(count, 0, "{position} is occupied");
            }
        }
    }

    #[test]
    fn test_zero_rng_picks_lowest_empty_square() {
        let mut rng = StepRng::new(0, 0);
        let choice = choose_move(&board("X.. ... ..."), &mut rng).unwrap();
        assert_eq!(choice, Choice::new(Position::TopCenter, Reason::Random));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(choose_move(&board("XOX OXX OXO"), &mut rng), None);
    }
}
