//! Tic-tac-toe series engine.
//!
//! A human plays `X` against a computer `O` over a best-of series.
//!
//! # Architecture
//!
//! - **Rules**: pure win and draw evaluation over the eight lines
//! - **Strategy**: greedy win / block / random move picker for the computer
//! - **State**: [`GameState`] with pure transitions for moves, restarts,
//!   new rounds and series resets
//! - **Engine**: [`GameEngine`], a stateful facade that ignores invalid actions
//!
//! # Example
//!
//! ```
//! use series_engine::{GameEngine, Position, SeriesConfig, StartingRule};
//!
//! let mut engine = GameEngine::seeded(SeriesConfig::new(5, StartingRule::Player), 7);
//! assert!(engine.player_move(Position::Center));
//! let choice = engine.computer_move().expect("computer has a move");
//! assert!(!engine.player_move(choice.position));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod contracts;
mod engine;
mod position;
pub mod rules;
mod series;
mod state;
pub mod strategy;
mod types;

pub use action::{Move, MoveError};
pub use contracts::{BoardConsistent, LegalMove};
pub use engine::GameEngine;
pub use position::Position;
pub use rules::{evaluate_winner, is_draw, is_full};
pub use series::{
    DEFAULT_ROUNDS, Outcome, Phase, RoundId, Scoreboard, SeriesConfig, SeriesResult, StartingRule,
};
pub use state::{GameState, Status};
pub use strategy::{Choice, Reason, choose_move};
pub use types::{Board, BoardParseError, Mark, Square};
