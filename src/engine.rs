//! The authoritative game state machine.
//!
//! [`GameEngine::handle`] takes one connection event at a time and returns
//! the ordered list of dispatches it produced. The engine never performs
//! I/O; the server feeds it events in receipt order and delivers what comes
//! back before reading the next event.

use crate::config::DisconnectPolicy;
use crate::connection::{ConnectionEvent, ConnectionId};
use crate::error::GameError;
use crate::protocol::{ClientRequest, ServerEvent};
use crate::seats::{RoomFull, SeatRegistry};
use parity_grid_rules::{CellIndex, Grid, Outcome, evaluate};
use tracing::{debug, info, instrument, warn};

/// Something the server must deliver after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Send to one connection only.
    Send {
        /// Recipient.
        to: ConnectionId,
        /// Payload.
        event: ServerEvent,
    },
    /// Send to every seated connection.
    Broadcast(ServerEvent),
    /// Close the connection after anything already queued for it.
    Close(ConnectionId),
}

impl Dispatch {
    /// The event carried, if this dispatch carries one.
    pub fn event(&self) -> Option<&ServerEvent> {
        match self {
            Dispatch::Send { event, .. } | Dispatch::Broadcast(event) => Some(event),
            Dispatch::Close(_) => None,
        }
    }
}

/// Coarse lifecycle phase, derived from outcome and occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Fewer than two seats are held and nothing has ended the game.
    WaitingForPlayers,
    /// Both seats are held and no line is complete.
    InProgress,
    /// Someone won or a disconnect ended the match.
    GameOver,
}

/// The shared grid and its outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    grid: Grid,
    outcome: Outcome,
}

impl GameState {
    /// A blank grid with the game in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    fn reset(&mut self) {
        self.grid.reset();
        self.outcome = Outcome::InProgress;
    }
}

/// Owns the game state and seat registry and applies every event.
#[derive(Debug, Clone)]
pub struct GameEngine {
    state: GameState,
    seats: SeatRegistry,
    policy: DisconnectPolicy,
}

impl GameEngine {
    /// Creates an engine with a blank grid and no seated players.
    #[instrument]
    pub fn new(policy: DisconnectPolicy) -> Self {
        info!(%policy, "Creating game engine");
        Self {
            state: GameState::new(),
            seats: SeatRegistry::new(),
            policy,
        }
    }

    /// Current grid.
    pub fn grid(&self) -> &Grid {
        self.state.grid()
    }

    /// Current outcome.
    pub fn outcome(&self) -> &Outcome {
        self.state.outcome()
    }

    /// Seat occupancy.
    pub fn seats(&self) -> &SeatRegistry {
        &self.seats
    }

    /// Configured disconnect policy.
    pub fn policy(&self) -> DisconnectPolicy {
        self.policy
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        if !self.state.outcome.is_in_progress() {
            Phase::GameOver
        } else if self.seats.is_full() {
            Phase::InProgress
        } else {
            Phase::WaitingForPlayers
        }
    }

    /// Applies one connection event to completion.
    #[instrument(skip(self), fields(connection_id = %event.connection()))]
    pub fn handle(&mut self, event: ConnectionEvent) -> Vec<Dispatch> {
        match event {
            ConnectionEvent::Connect(id) => self.on_connect(id),
            ConnectionEvent::Message(id, text) => self.on_message(id, &text),
            ConnectionEvent::Close(id) => self.on_close(id),
        }
    }

    fn on_connect(&mut self, id: ConnectionId) -> Vec<Dispatch> {
        let seat = match self.seats.try_assign_seat(id) {
            Ok(seat) => seat,
            Err(RoomFull) => {
                warn!(connection_id = %id, "Rejecting connection, room is full");
                return vec![
                    Dispatch::Send {
                        to: id,
                        event: ServerEvent::from(&GameError::RoomFull),
                    },
                    Dispatch::Close(id),
                ];
            }
        };

        info!(connection_id = %id, %seat, "Player assigned");
        let mut out = vec![Dispatch::Send {
            to: id,
            event: ServerEvent::PlayerAssigned {
                seat,
                grid: self.state.grid.clone(),
            },
        }];

        match self.phase() {
            Phase::InProgress => {
                info!("Both seats filled, starting game");
                out.push(Dispatch::Broadcast(ServerEvent::game_start()));
            }
            Phase::GameOver => {
                debug!(connection_id = %id, "Joined a finished game");
                out.push(Dispatch::Send {
                    to: id,
                    event: ServerEvent::game_over(&self.state.outcome),
                });
            }
            Phase::WaitingForPlayers => {}
        }
        out
    }

    fn on_message(&mut self, id: ConnectionId, text: &str) -> Vec<Dispatch> {
        if self.seats.seat_of(id).is_none() {
            debug!(connection_id = %id, "Dropping frame from unseated connection");
            return Vec::new();
        }

        let result = ClientRequest::parse(text).and_then(|request| match request {
            ClientRequest::Increment { square } => self.apply_increment(id, square),
            ClientRequest::Reset => Ok(self.reset()),
        });

        result.unwrap_or_else(|err| {
            debug!(connection_id = %id, error = %err, "Request rejected");
            let mut out = vec![Dispatch::Send {
                to: id,
                event: ServerEvent::from(&err),
            }];
            if err.closes_connection() {
                out.push(Dispatch::Close(id));
            }
            out
        })
    }

    fn on_close(&mut self, id: ConnectionId) -> Vec<Dispatch> {
        let was_live = self.phase() == Phase::InProgress;
        let Some(seat) = self.seats.release_seat(id) else {
            debug!(connection_id = %id, "Unseated connection closed");
            return Vec::new();
        };

        info!(connection_id = %id, %seat, was_live, "Seated player disconnected");
        let mut out = vec![Dispatch::Broadcast(ServerEvent::player_disconnected(seat))];

        if self.seats.occupant_count() == 0 {
            info!("Room is empty, resetting game");
            out.extend(self.reset());
            return out;
        }

        match self.policy {
            DisconnectPolicy::Terminate if was_live => {
                self.state.outcome = Outcome::TerminatedByDisconnect;
                info!(%seat, "Game terminated by disconnect");
                out.push(Dispatch::Broadcast(ServerEvent::game_over(
                    &self.state.outcome,
                )));
            }
            DisconnectPolicy::Terminate => {}
            DisconnectPolicy::AwaitOpponent => out.extend(self.reset()),
        }
        out
    }

    /// Increments one cell on behalf of `id`.
    ///
    /// Either seat may increment any cell; callers only route seated
    /// connections here. The update is broadcast
    /// before the post-increment grid is checked for a win, so the winning
    /// move's value always reaches clients ahead of `GAME_OVER`.
    #[instrument(skip(self))]
    pub fn apply_increment(
        &mut self,
        id: ConnectionId,
        square: i64,
    ) -> Result<Vec<Dispatch>, GameError> {
        if !self.state.outcome.is_in_progress() {
            return Err(GameError::OperationAfterGameOver);
        }
        let cell = CellIndex::try_from(square)?;

        let new_value = self.state.grid.increment(cell)?;
        debug!(connection_id = %id, %cell, new_value, "Cell incremented");
        let mut out = vec![Dispatch::Broadcast(ServerEvent::Update {
            cell_index: cell,
            new_value,
        })];

        let outcome = evaluate(&self.state.grid);
        if !outcome.is_in_progress() {
            self.state.outcome = outcome;
            info!(
                winner = ?outcome.winner(),
                line = ?outcome.winning_line().map(|l| l.indices()),
                grid = %self.state.grid.display(),
                "Game over"
            );
            out.push(Dispatch::Broadcast(ServerEvent::game_over(&outcome)));
        }
        Ok(out)
    }

    /// Zeroes the grid and clears the outcome. Seats are untouched.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Vec<Dispatch> {
        self.state.reset();
        info!("Game reset");
        vec![Dispatch::Broadcast(ServerEvent::GameReset {
            grid: self.state.grid.clone(),
        })]
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(DisconnectPolicy::default())
    }
}
