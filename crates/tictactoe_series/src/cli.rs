//! Command-line interface for tictactoe_series.

use crate::session::Command as SessionCommand;
use clap::{Parser, Subcommand};
use series_engine::{Position, StartingRule};

/// Tic-tac-toe series - play best-of-N against the computer
#[derive(Parser, Debug)]
#[command(name = "tictactoe_series")]
#[command(about = "Play a best-of series of tic-tac-toe against the computer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Rounds in the series (overrides config)
    #[arg(long, global = true)]
    pub rounds: Option<u32>,

    /// Who opens each round: player, computer or alternate (overrides config)
    #[arg(long, global = true)]
    pub starting_rule: Option<StartingRule>,

    /// Computer reply delay in milliseconds (overrides config)
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,

    /// Seed for the computer's random moves (overrides config)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively in the terminal
    Play {
        /// Print each state as a JSON line instead of a grid
        #[arg(long)]
        json: bool,
    },

    /// Let a random player run whole series against the computer
    Autoplay {
        /// Number of series to play
        #[arg(short, long, default_value = "1")]
        series: u32,
    },
}

/// Parses one line of terminal input.
///
/// Cells are numbered 1-9 as shown on the grid; labels such as
/// `center` also work. `r` restarts, `n` starts the next round,
/// `reset` resets the series and `q` quits.
pub fn parse_command(line: &str) -> Option<SessionCommand> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => None,
        "q" | "quit" | "exit" => Some(SessionCommand::Shutdown),
        "r" | "restart" => Some(SessionCommand::Restart),
        "n" | "next" => Some(SessionCommand::NextRound),
        "reset" => Some(SessionCommand::ResetSeries),
        _ => {
            let position = match line.parse::<usize>() {
                Ok(cell) => cell.checked_sub(1).and_then(Position::from_index)?,
                Err(_) => Position::from_label_or_number(line)?,
            };
            Some(SessionCommand::PlayerMove(position))
        }
    }
}
