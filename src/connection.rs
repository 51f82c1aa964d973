//! Connection identities and the lifecycle events the engine consumes.

use derive_more::{Display, From};
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identity of one accepted socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display("conn-{_0}")]
pub struct ConnectionId(u64);

/// Hands out unique connection ids for the lifetime of the process.
#[derive(Debug)]
pub struct ConnectionIds {
    next: AtomicU64,
}

impl ConnectionIds {
    /// Creates a generator starting at 1.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Returns a fresh id.
    pub fn next_id(&self) -> ConnectionId {
        ConnectionId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionIds {
    fn default() -> Self {
        Self::new()
    }
}

/// A single transport event, processed to completion before the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A socket was accepted.
    Connect(ConnectionId),
    /// A complete text frame arrived on a socket.
    Message(ConnectionId, String),
    /// A socket closed, cleanly or not.
    Close(ConnectionId),
}

impl ConnectionEvent {
    /// The connection the event belongs to.
    pub fn connection(&self) -> ConnectionId {
        match self {
            ConnectionEvent::Connect(id)
            | ConnectionEvent::Message(id, _)
            | ConnectionEvent::Close(id) => *id,
        }
    }
}
