//! Game state and its pure transitions.
//!
//! Every transition borrows the current [`GameState`] and returns a new
//! one. A rejected action returns an error and the caller keeps the state
//! it already had, so "ignore invalid input" falls out for free.

use super::action::{Move, MoveError};
use super::contracts::{BoardConsistent, LegalMove};
use super::rules;
use super::series::{Outcome, Phase, RoundId, Scoreboard, SeriesConfig, SeriesResult};
use super::strategy::{self, Choice};
use super::{Board, Mark, Position, Square};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// What the status line should say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Round in progress, this mark moves next.
    Next(Mark),
    /// Round won by this mark.
    Winner(Mark),
    /// Round drawn.
    Draw,
    /// The round just played decided the series.
    SeriesOver(SeriesResult),
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Next(mark) => write!(f, "Next player: {}", mark),
            Status::Winner(mark) => write!(f, "Winner: {}", mark),
            Status::Draw => write!(f, "Draw!"),
            Status::SeriesOver(result) => write!(f, "Series over: {}", result),
        }
    }
}

/// Complete state of a series in play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    to_move: Mark,
    phase: Phase,
    score: Scoreboard,
    round_id: RoundId,
    config: SeriesConfig,
    history: Vec<Move>,
}

impl GameState {
    /// Starts a new series at round 1.
    #[instrument]
    pub fn new(config: SeriesConfig) -> Self {
        Self::fresh(config, Scoreboard::new(), RoundId::default())
    }

    fn fresh(config: SeriesConfig, score: Scoreboard, round_id: RoundId) -> Self {
        Self {
            board: Board::new(),
            to_move: config.starting_rule().first_mover(score.round()),
            phase: Phase::InProgress,
            score,
            round_id,
            config,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark whose turn it is.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Returns the phase of the current round.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The game-over flag: true once the round has a winner or a draw.
    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    /// Winner currently on the board.
    pub fn winner(&self) -> Option<Mark> {
        rules::evaluate_winner(&self.board)
    }

    /// True if the board is a draw.
    pub fn is_draw(&self) -> bool {
        rules::is_draw(&self.board)
    }

    /// Rounds the player has won in this series.
    pub fn player_wins(&self) -> u32 {
        self.score.player_wins()
    }

    /// Rounds the computer has won in this series.
    pub fn computer_wins(&self) -> u32 {
        self.score.computer_wins()
    }

    /// Current round number, starting at 1.
    pub fn round(&self) -> u32 {
        self.score.round()
    }

    /// Identity of the board currently in play.
    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    /// Series settings.
    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }

    /// Moves played this round.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// True when the round is live and the computer is on move.
    pub fn awaits_computer(&self) -> bool {
        !self.is_over() && self.to_move == Mark::COMPUTER
    }

    /// Status line for the view.
    pub fn status(&self) -> Status {
        match self.phase {
            Phase::InProgress => Status::Next(self.to_move),
            Phase::RoundOver(Outcome::Winner(mark)) => Status::Winner(mark),
            Phase::RoundOver(Outcome::Draw) => Status::Draw,
            Phase::SeriesOver { result, .. } => Status::SeriesOver(result),
        }
    }

    /// Places an `X` for the player.
    ///
    /// Rejected if the round is over, it is the computer's turn, or the
    /// square is taken.
    #[instrument(skip(self), fields(round = self.round()))]
    pub fn apply_player_move(&self, position: Position) -> Result<Self, MoveError> {
        let mov = Move::new(Mark::PLAYER, position);
        LegalMove::check(&mov, self)?;
        Ok(self.place(mov))
    }

    /// Lets the computer pick and place an `O`.
    ///
    /// Rejected if the round is over, it is the player's turn, or no
    /// square is empty.
    #[instrument(skip(self, rng), fields(round = self.round()))]
    pub fn apply_computer_move<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(Self, Choice), MoveError> {
        if self.is_over() {
            return Err(MoveError::RoundOver);
        }
        if self.to_move != Mark::COMPUTER {
            return Err(MoveError::NotYourTurn(Mark::COMPUTER));
        }

        let choice = strategy::choose_move(&self.board, rng).ok_or(MoveError::NoEmptySquare)?;
        let mov = Move::new(Mark::COMPUTER, choice.position);
        LegalMove::check(&mov, self)?;
        Ok((self.place(mov), choice))
    }

    /// Computer move issued for a specific board.
    ///
    /// Rejected with [`MoveError::StaleRound`] when the board has been
    /// cleared since `round_id` was captured.
    #[instrument(skip(self, rng), fields(round = self.round()))]
    pub fn apply_computer_move_for<R: Rng + ?Sized>(
        &self,
        round_id: RoundId,
        rng: &mut R,
    ) -> Result<(Self, Choice), MoveError> {
        if round_id != self.round_id {
            return Err(MoveError::StaleRound {
                expected: round_id,
                found: self.round_id,
            });
        }
        self.apply_computer_move(rng)
    }

    /// Clears the board for a replay of the current round.
    ///
    /// Win counters and the round number are kept.
    #[instrument(skip(self), fields(round = self.round()))]
    pub fn restart(&self) -> Self {
        debug!("Restarting round");
        Self::fresh(self.config, self.score, self.round_id.next())
    }

    /// Clears the board and begins the next round.
    ///
    /// After a decided series this is round 1 of a new series, since the
    /// scoreboard was already reset when the series ended.
    #[instrument(skip(self), fields(round = self.round()))]
    pub fn next_round(&self) -> Result<Self, MoveError> {
        let mut score = self.score;
        match self.phase {
            Phase::InProgress => return Err(MoveError::RoundInProgress),
            Phase::RoundOver(_) => score.advance(),
            Phase::SeriesOver { .. } => {}
        }
        debug!(next_round = score.round(), "Starting next round");
        Ok(Self::fresh(self.config, score, self.round_id.next()))
    }

    /// Back to round 1 with no wins on either side.
    #[instrument(skip(self))]
    pub fn reset_series(&self) -> Self {
        debug!("Resetting series");
        Self::fresh(self.config, Scoreboard::new(), self.round_id.next())
    }

    fn place(&self, mov: Move) -> Self {
        let mut next = self.clone();
        next.board.set(mov.position, Square::Occupied(mov.mark));
        next.history.push(mov);
        next.to_move = mov.mark.opponent();

        let outcome = match rules::evaluate_winner(&next.board) {
            Some(mark) => Some(Outcome::Winner(mark)),
            None if rules::is_full(&next.board) => Some(Outcome::Draw),
            None => None,
        };

        if let Some(outcome) = outcome {
            next.phase = match next.score.record(outcome, &next.config) {
                Some(result) => Phase::SeriesOver { outcome, result },
                None => Phase::RoundOver(outcome),
            };
        }

        debug_assert!(BoardConsistent::holds(&next.board), "Board consistency violated");
        next
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(SeriesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StartingRule;
    use rand::rngs::mock::StepRng;

    fn player_first(rounds: u32) -> GameState {
        GameState::new(SeriesConfig::new(rounds, StartingRule::Player))
    }

    #[test]
    fn test_new_state() {
        let state = player_first(5);
        assert_eq!(state.round(), 1);
        assert_eq!(state.player_wins(), 0);
        assert_eq!(state.computer_wins(), 0);
        assert_eq!(state.to_move(), Mark::X);
        assert!(!state.is_over());
        assert_eq!(state.status().to_string(), "Next player: X");
    }

    #[test]
    fn test_player_move_flips_turn() {
        let state = player_first(5).apply_player_move(Position::Center).unwrap();
        assert_eq!(state.board().get(Position::Center), Square::Occupied(Mark::X));
        assert_eq!(state.to_move(), Mark::O);
        assert!(state.awaits_computer());
    }

    #[test]
    fn test_player_cannot_move_twice() {
        let state = player_first(5).apply_player_move(Position::Center).unwrap();
        assert_eq!(
            state.apply_player_move(Position::TopLeft),
            Err(MoveError::NotYourTurn(Mark::X))
        );
    }

    #[test]
    fn test_computer_cannot_move_out_of_turn() {
        let mut rng = StepRng::new(0, 0);
        assert_eq!(
            player_first(5).apply_computer_move(&mut rng).map(|(_, c)| c),
            Err(MoveError::NotYourTurn(Mark::O))
        );
    }

    #[test]
    fn test_restart_keeps_round_and_new_identity() {
        let mut rng = StepRng::new(0, 0);
        let state = player_first(5).apply_player_move(Position::Center).unwrap();
        let restarted = state.restart();
        assert_eq!(restarted.board(), &Board::new());
        assert_eq!(restarted.round(), state.round());
        assert_ne!(restarted.round_id(), state.round_id());
        assert_eq!(restarted.to_move(), Mark::X);

        // A reply captured before the restart must not land.
        assert!(matches!(
            restarted.apply_computer_move_for(state.round_id(), &mut rng),
            Err(MoveError::StaleRound { .. })
        ));
    }

    #[test]
    fn test_next_round_rejected_mid_round() {
        assert_eq!(player_first(5).next_round(), Err(MoveError::RoundInProgress));
    }

    #[test]
    fn test_alternate_rule_lets_computer_open_round_two() {
        let config = SeriesConfig::new(5, StartingRule::Alternate);
        let mut rng = StepRng::new(0, 0);
        let mut state = GameState::new(config);
        assert_eq!(state.to_move(), Mark::X);

        // Play the round out; the zero rng always takes the lowest empty square.
        while !state.is_over() {
            state = if state.to_move() == Mark::X {
                let pos = state.board().empty_positions()[0];
                state.apply_player_move(pos).unwrap()
            } else {
                state.apply_computer_move(&mut rng).unwrap().0
            };
        }

        let round_two = state.next_round().unwrap();
        assert_eq!(round_two.round(), 2);
        assert_eq!(round_two.to_move(), Mark::O);
        assert!(round_two.awaits_computer());
    }
}
