//! Stateful facade over the pure transitions.
//!
//! [`GameEngine`] holds the current [`GameState`] and the computer's RNG,
//! and swallows rejected actions the way a click on an occupied square
//! should be swallowed: nothing changes.

use super::action::MoveError;
use super::series::{RoundId, SeriesConfig};
use super::state::{GameState, Status};
use super::strategy::Choice;
use super::Position;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

/// Tic-tac-toe series engine.
#[derive(Debug, Clone)]
pub struct GameEngine<R = ChaCha8Rng> {
    state: GameState,
    rng: R,
}

impl GameEngine<ChaCha8Rng> {
    /// Creates an engine whose random moves are seeded from the OS.
    #[instrument]
    pub fn new(config: SeriesConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// Creates an engine with reproducible random moves.
    #[instrument]
    pub fn seeded(config: SeriesConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    /// Creates an engine drawing random moves from `rng`.
    pub fn with_rng(config: SeriesConfig, rng: R) -> Self {
        Self {
            state: GameState::new(config),
            rng,
        }
    }

    /// Returns the current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Status line for the view.
    pub fn status(&self) -> Status {
        self.state.status()
    }

    /// Player clicks a square. Returns false if the click was ignored.
    #[instrument(skip(self))]
    pub fn player_move(&mut self, position: Position) -> bool {
        let result = self.state.apply_player_move(position);
        self.commit(result)
    }

    /// Player clicks a square by board index (0-8).
    pub fn player_move_at(&mut self, index: usize) -> bool {
        match Position::try_from(index) {
            Ok(position) => self.player_move(position),
            Err(err) => {
                debug!(%err, "Ignoring click");
                false
            }
        }
    }

    /// Computer takes its turn now.
    #[instrument(skip(self))]
    pub fn computer_move(&mut self) -> Option<Choice> {
        let result = self.state.apply_computer_move(&mut self.rng);
        self.commit_choice(result)
    }

    /// Computer takes a turn scheduled for board `round_id`.
    ///
    /// Ignored when the board has been cleared since.
    #[instrument(skip(self))]
    pub fn computer_move_for(&mut self, round_id: RoundId) -> Option<Choice> {
        let result = self.state.apply_computer_move_for(round_id, &mut self.rng);
        self.commit_choice(result)
    }

    /// Clears the board, keeping scores and round number.
    pub fn restart(&mut self) {
        self.state = self.state.restart();
    }

    /// Moves on after a finished round. Returns false mid-round.
    pub fn next_round(&mut self) -> bool {
        let result = self.state.next_round();
        self.commit(result)
    }

    /// Starts the series over.
    pub fn reset_series(&mut self) {
        self.state = self.state.reset_series();
    }

    fn commit(&mut self, result: Result<GameState, MoveError>) -> bool {
        match result {
            Ok(state) => {
                self.state = state;
                true
            }
            Err(err) => {
                debug!(%err, "Ignoring action");
                false
            }
        }
    }

    fn commit_choice(&mut self, result: Result<(GameState, Choice), MoveError>) -> Option<Choice> {
        let (state, choice) = result
            .inspect_err(|err| debug!(%err, "Ignoring computer move"))
            .ok()?;
        self.state = state;
        Some(choice)
    }
}
