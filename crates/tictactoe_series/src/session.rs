//! Event loop that drives one series for a view.
//!
//! The view sends [`Command`]s and renders [`SessionEvent`]s. After the
//! player moves, the computer's reply is armed as a timer tagged with the
//! board's [`RoundId`]. A finished round arms the same timer to start the
//! next round after a pause. Clearing the board disarms it, and a timer
//! whose id no longer matches is refused, so a late timer can never touch
//! a board it was not scheduled for.

use series_engine::{
    GameEngine, GameState, Mark, Move, Outcome, Phase, Position, Reason, RoundId, SeriesResult,
};
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Sleep;
use tracing::{debug, info, instrument, trace};

/// Input from the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Player clicked a square.
    PlayerMove(Position),
    /// Replay the current round from an empty board.
    Restart,
    /// Continue after a finished round without waiting for the pause.
    NextRound,
    /// Start the series over.
    ResetSeries,
    /// Stop the session.
    Shutdown,
}

/// Messages sent from the session to the view.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Full state after any change.
    StateChanged(GameState),
    /// The computer will reply after the delay.
    ComputerThinking {
        /// Board the reply is scheduled for.
        round_id: RoundId,
    },
    /// A mark was placed.
    MoveMade {
        /// The move.
        mv: Move,
        /// Why the computer chose it; `None` for player moves.
        reason: Option<Reason>,
    },
    /// The round ended.
    RoundOver(Outcome),
    /// The round decided the series.
    SeriesOver(SeriesResult),
    /// A command was rejected and nothing changed.
    Ignored(Command),
}

/// Cloneable sender for commands.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    /// Sends a command. Returns false once the session has stopped.
    pub fn send(&self, command: Command) -> bool {
        self.tx.send(command).is_ok()
    }

    /// Player clicks `position`.
    pub fn player_move(&self, position: Position) -> bool {
        self.send(Command::PlayerMove(position))
    }

    /// Restarts the current round.
    pub fn restart(&self) -> bool {
        self.send(Command::Restart)
    }

    /// Continues with the next round.
    pub fn next_round(&self) -> bool {
        self.send(Command::NextRound)
    }

    /// Resets the series.
    pub fn reset_series(&self) -> bool {
        self.send(Command::ResetSeries)
    }

    /// Asks the session to stop.
    pub fn shutdown(&self) -> bool {
        self.send(Command::Shutdown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheduled {
    ComputerReply,
    NextRound,
}

struct Pending {
    round_id: RoundId,
    action: Scheduled,
    timer: Pin<Box<Sleep>>,
}

/// Owns the engine and the pending timer.
pub struct Session {
    engine: GameEngine,
    reply_delay: Duration,
    round_pause: Duration,
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<SessionEvent>,
    pending: Option<Pending>,
}

impl Session {
    /// Creates a session plus its command handle and event stream.
    ///
    /// `reply_delay` is how long the computer waits before moving,
    /// `round_pause` how long a finished board stays up before the next
    /// round starts on its own.
    pub fn new(
        engine: GameEngine,
        reply_delay: Duration,
        round_pause: Duration,
    ) -> (Self, SessionHandle, mpsc::UnboundedReceiver<SessionEvent>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let session = Self {
            engine,
            reply_delay,
            round_pause,
            commands: command_rx,
            events: event_tx,
            pending: None,
        };
        (session, SessionHandle { tx: command_tx }, event_rx)
    }

    /// Creates a session and runs it on a tokio task.
    pub fn spawn(
        engine: GameEngine,
        reply_delay: Duration,
        round_pause: Duration,
    ) -> (
        SessionHandle,
        mpsc::UnboundedReceiver<SessionEvent>,
        JoinHandle<()>,
    ) {
        let (session, handle, events) = Self::new(engine, reply_delay, round_pause);
        let task = tokio::spawn(session.run());
        (handle, events, task)
    }

    /// Runs until [`Command::Shutdown`] or until every handle is dropped.
    ///
    /// A timer still pending at that point is dropped with the session.
    #[instrument(skip(self), fields(
        delay_ms = self.reply_delay.as_millis() as u64,
        pause_ms = self.round_pause.as_millis() as u64
    ))]
    pub async fn run(mut self) {
        info!("Session started");
        self.publish_state();
        self.schedule_next();

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                (round_id, action) = wait_for_timer(&mut self.pending) => {
                    self.fire(round_id, action)
                }
            }
        }

        if self.pending.take().is_some() {
            debug!("Dropping pending timer");
        }
        info!("Session closed");
    }

    fn handle(&mut self, command: Command) {
        debug!(?command, "Handling command");
        match command {
            Command::PlayerMove(position) => {
                if self.engine.player_move(position) {
                    self.after_move(Move::new(Mark::PLAYER, position), None);
                } else {
                    self.emit(SessionEvent::Ignored(command));
                }
            }
            Command::Restart => {
                self.engine.restart();
                self.after_clear();
            }
            Command::NextRound => {
                if self.engine.next_round() {
                    self.after_clear();
                } else {
                    self.emit(SessionEvent::Ignored(command));
                }
            }
            Command::ResetSeries => {
                self.engine.reset_series();
                self.after_clear();
            }
            Command::Shutdown => {}
        }
    }

    fn fire(&mut self, round_id: RoundId, action: Scheduled) {
        self.pending = None;
        match action {
            Scheduled::ComputerReply => match self.engine.computer_move_for(round_id) {
                Some(choice) => {
                    self.after_move(Move::new(Mark::COMPUTER, choice.position), Some(choice.reason))
                }
                None => debug!(%round_id, "Computer reply had nothing to do"),
            },
            Scheduled::NextRound => {
                if self.engine.state().round_id() != round_id {
                    debug!(%round_id, "Board already cleared, skipping next round");
                    return;
                }
                if self.engine.next_round() {
                    info!(round = self.engine.state().round(), "Next round started");
                    self.after_clear();
                }
            }
        }
    }

    fn after_move(&mut self, mv: Move, reason: Option<Reason>) {
        self.emit(SessionEvent::MoveMade { mv, reason });

        match *self.engine.state().phase() {
            Phase::InProgress => {}
            Phase::RoundOver(outcome) => self.emit(SessionEvent::RoundOver(outcome)),
            Phase::SeriesOver { outcome, result } => {
                self.emit(SessionEvent::RoundOver(outcome));
                self.emit(SessionEvent::SeriesOver(result));
            }
        }

        self.publish_state();
        self.schedule_next();
    }

    fn after_clear(&mut self) {
        if let Some(stale) = self.pending.take() {
            debug!(round_id = %stale.round_id, action = ?stale.action, "Cancelled pending timer");
        }
        self.publish_state();
        self.schedule_next();
    }

    /// Arms the computer's reply, or the pause before the next round.
    fn schedule_next(&mut self) {
        let state = self.engine.state();
        let round_id = state.round_id();
        let (action, delay) = if state.awaits_computer() {
            (Scheduled::ComputerReply, self.reply_delay)
        } else if state.is_over() {
            (Scheduled::NextRound, self.round_pause)
        } else {
            return;
        };
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.round_id == round_id && p.action == action)
        {
            return;
        }

        debug!(%round_id, ?action, "Arming timer");
        self.pending = Some(Pending {
            round_id,
            action,
            timer: Box::pin(tokio::time::sleep(delay)),
        });
        if action == Scheduled::ComputerReply {
            self.emit(SessionEvent::ComputerThinking { round_id });
        }
    }

    fn publish_state(&self) {
        self.emit(SessionEvent::StateChanged(self.engine.state().clone()));
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            trace!("No view listening");
        }
    }
}

/// Resolves when the armed timer is due; never resolves when none is armed.
async fn wait_for_timer(pending: &mut Option<Pending>) -> (RoundId, Scheduled) {
    match pending {
        Some(p) => {
            p.timer.as_mut().await;
            (p.round_id, p.action)
        }
        None => std::future::pending().await,
    }
}
