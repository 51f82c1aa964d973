//! Fan-out of engine dispatches to connection outboxes.

use crate::connection::ConnectionId;
use crate::engine::Dispatch;
use crate::protocol::ServerEvent;
use crate::seats::SeatRegistry;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, instrument, trace};

/// An item queued for a connection's writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// Serialize and send this event.
    Event(ServerEvent),
    /// Send a close frame and stop writing.
    Close,
}

/// Sending half of a connection's writer queue.
pub type Outbox = mpsc::UnboundedSender<Outgoing>;

/// Routes dispatches to the outboxes of attached connections.
///
/// Broadcasts reach seated connections only. A peer whose writer has already
/// gone is skipped without retry; its own close event cleans it up.
#[derive(Debug, Default)]
pub struct Broadcaster {
    peers: HashMap<ConnectionId, Outbox>,
}

impl Broadcaster {
    /// Creates a broadcaster with no peers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection's outbox.
    #[instrument(skip(self, outbox))]
    pub fn attach(&mut self, id: ConnectionId, outbox: Outbox) {
        self.peers.insert(id, outbox);
        debug!(connection_id = %id, peers = self.peers.len(), "Outbox attached");
    }

    /// Drops a connection's outbox. Returns whether it was attached.
    #[instrument(skip(self))]
    pub fn detach(&mut self, id: ConnectionId) -> bool {
        let removed = self.peers.remove(&id).is_some();
        if removed {
            debug!(connection_id = %id, peers = self.peers.len(), "Outbox detached");
        }
        removed
    }

    /// Number of attached outboxes.
    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Delivers dispatches in order.
    #[instrument(skip_all, fields(count = dispatches.len()))]
    pub fn deliver(&mut self, dispatches: Vec<Dispatch>, seats: &SeatRegistry) {
        for dispatch in dispatches {
            match dispatch {
                Dispatch::Send { to, event } => {
                    self.send(to, Outgoing::Event(event));
                }
                Dispatch::Broadcast(event) => {
                    let recipients: Vec<_> = seats.occupants().map(|(_, id)| id).collect();
                    trace!(kind = event.kind(), recipients = recipients.len(), "Broadcasting");
                    for id in recipients {
                        self.send(id, Outgoing::Event(event.clone()));
                    }
                }
                Dispatch::Close(id) => {
                    self.send(id, Outgoing::Close);
                    self.detach(id);
                }
            }
        }
    }

    fn send(&self, id: ConnectionId, item: Outgoing) -> bool {
        let Some(outbox) = self.peers.get(&id) else {
            debug!(connection_id = %id, "No outbox for connection, skipping");
            return false;
        };
        if outbox.send(item).is_err() {
            debug!(connection_id = %id, "Outbox closed, skipping");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(b: &mut Broadcaster, n: u64) -> (ConnectionId, mpsc::UnboundedReceiver<Outgoing>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::from(n);
        b.attach(id, tx);
        (id, rx)
    }

    #[test]
    fn test_broadcast_reaches_seated_only() {
        let mut b = Broadcaster::new();
        let mut seats = SeatRegistry::new();
        let (a, mut rx_a) = peer(&mut b, 1);
        let (c, mut rx_c) = peer(&mut b, 2);
        seats.try_assign_seat(a).unwrap();

        b.deliver(vec![Dispatch::Broadcast(ServerEvent::game_start())], &seats);

        assert_eq!(rx_a.try_recv(), Ok(Outgoing::Event(ServerEvent::game_start())));
        assert!(rx_c.try_recv().is_err());
        assert_eq!(seats.seat_of(c), None);
    }

    #[test]
    fn test_closed_outbox_is_skipped() {
        let mut b = Broadcaster::new();
        let mut seats = SeatRegistry::new();
        let (a, rx_a) = peer(&mut b, 1);
        let (c, mut rx_c) = peer(&mut b, 2);
        seats.try_assign_seat(a).unwrap();
        seats.try_assign_seat(c).unwrap();
        drop(rx_a);

        b.deliver(vec![Dispatch::Broadcast(ServerEvent::game_start())], &seats);

        assert_eq!(rx_c.try_recv(), Ok(Outgoing::Event(ServerEvent::game_start())));
        // Cleanup is left to the close event.
        assert_eq!(b.peer_count(), 2);
    }

    #[test]
    fn test_close_follows_queued_event() {
        let mut b = Broadcaster::new();
        let seats = SeatRegistry::new();
        let (id, mut rx) = peer(&mut b, 3);
        let error = ServerEvent::Error {
            message: "Game is full. Only 2 players allowed.".to_string(),
        };

        b.deliver(
            vec![
                Dispatch::Send {
                    to: id,
                    event: error.clone(),
                },
                Dispatch::Close(id),
            ],
            &seats,
        );

        assert_eq!(rx.try_recv(), Ok(Outgoing::Event(error)));
        assert_eq!(rx.try_recv(), Ok(Outgoing::Close));
        assert_eq!(b.peer_count(), 0);
    }
}
