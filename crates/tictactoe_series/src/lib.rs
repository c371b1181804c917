//! Tic-tac-toe series driver.
//!
//! Wraps [`series_engine`] with configuration and an async [`Session`]
//! that delays the computer's reply and cancels it when the board is
//! cleared.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod autoplay;
pub mod cli;
mod config;
pub mod render;
mod session;

pub use config::{AppConfig, ConfigError};
pub use session::{Command, Session, SessionEvent, SessionHandle};
