//! Plain-text rendering of session events for the terminal driver.

use crate::session::SessionEvent;
use series_engine::{GameState, Mark};

/// Renders a state as the grid plus round, score and status lines.
pub fn render_state(state: &GameState) -> String {
    format!(
        "Round {} | {} Player: {} | {} Computer: {}\n{}\n{}",
        state.round(),
        Mark::PLAYER,
        state.player_wins(),
        Mark::COMPUTER,
        state.computer_wins(),
        state.board().display(),
        state.status(),
    )
}

/// Text for one event, or `None` when the event has nothing to show.
///
/// With `json` set, states are printed as one JSON object per line.
pub fn render_event(event: &SessionEvent, json: bool) -> Option<String> {
    match event {
        SessionEvent::StateChanged(state) if json => serde_json::to_string(state).ok(),
        SessionEvent::StateChanged(state) => Some(format!("\n{}", render_state(state))),
        SessionEvent::ComputerThinking { .. } if !json => Some("Computer is thinking...".into()),
        SessionEvent::MoveMade {
            mv,
            reason: Some(reason),
        } if !json => Some(format!("Computer plays {} ({})", mv.position, reason)),
        SessionEvent::SeriesOver(result) if !json => Some(format!("*** {} ***", result)),
        SessionEvent::Ignored(command) if !json => Some(format!("Ignored: {:?}", command)),
        _ => None,
    }
}
