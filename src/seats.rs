//! Seat occupancy for the two-player room.

use crate::connection::ConnectionId;
use derive_more::{Display, Error};
use parity_grid_rules::Seat;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Both seats are already held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Both seats are occupied")]
pub struct RoomFull;

/// Tracks which connection holds which seat.
///
/// Assignment is first come: the lowest free seat goes to the next
/// connection, and a released seat is immediately available again.
#[derive(Debug, Clone, Default)]
pub struct SeatRegistry {
    holders: BTreeMap<Seat, ConnectionId>,
}

impl SeatRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gives the connection the lowest unoccupied seat.
    ///
    /// A connection that already holds a seat keeps it.
    #[instrument(skip(self))]
    pub fn try_assign_seat(&mut self, connection: ConnectionId) -> Result<Seat, RoomFull> {
        if let Some(seat) = self.seat_of(connection) {
            return Ok(seat);
        }
        let seat = Seat::in_order()
            .find(|seat| !self.holders.contains_key(seat))
            .ok_or(RoomFull)?;
        self.holders.insert(seat, connection);
        debug!(%connection, %seat, "Seat assigned");
        Ok(seat)
    }

    /// Frees whatever seat the connection held. Idempotent.
    #[instrument(skip(self))]
    pub fn release_seat(&mut self, connection: ConnectionId) -> Option<Seat> {
        let seat = self.seat_of(connection)?;
        self.holders.remove(&seat);
        debug!(%connection, %seat, "Seat released");
        Some(seat)
    }

    /// The seat held by `connection`, if any.
    pub fn seat_of(&self, connection: ConnectionId) -> Option<Seat> {
        self.holders
            .iter()
            .find_map(|(seat, holder)| (*holder == connection).then_some(*seat))
    }

    /// Number of occupied seats, 0 to 2.
    pub fn occupant_count(&self) -> usize {
        self.holders.len()
    }

    /// Whether both seats are taken.
    pub fn is_full(&self) -> bool {
        Seat::in_order().all(|seat| self.holders.contains_key(&seat))
    }

    /// Seated connections in seat order.
    pub fn occupants(&self) -> impl Iterator<Item = (Seat, ConnectionId)> + '_ {
        self.holders.iter().map(|(seat, id)| (*seat, *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_come_assignment() {
        let mut seats = SeatRegistry::new();
        assert_eq!(seats.try_assign_seat(ConnectionId::from(1)), Ok(Seat::Odd));
        assert_eq!(seats.try_assign_seat(ConnectionId::from(2)), Ok(Seat::Even));
        assert_eq!(seats.try_assign_seat(ConnectionId::from(3)), Err(RoomFull));
        assert_eq!(seats.occupant_count(), 2);
        assert!(seats.is_full());
    }

    #[test]
    fn test_released_seat_is_reused() {
        let mut seats = SeatRegistry::new();
        seats.try_assign_seat(ConnectionId::from(1)).unwrap();
        seats.try_assign_seat(ConnectionId::from(2)).unwrap();
        assert_eq!(seats.release_seat(ConnectionId::from(1)), Some(Seat::Odd));
        assert_eq!(seats.try_assign_seat(ConnectionId::from(3)), Ok(Seat::Odd));
        assert_eq!(seats.seat_of(ConnectionId::from(3)), Some(Seat::Odd));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut seats = SeatRegistry::new();
        seats.try_assign_seat(ConnectionId::from(1)).unwrap();
        assert_eq!(seats.release_seat(ConnectionId::from(1)), Some(Seat::Odd));
        assert_eq!(seats.release_seat(ConnectionId::from(1)), None);
        assert_eq!(seats.release_seat(ConnectionId::from(9)), None);
        assert_eq!(seats.occupant_count(), 0);
    }

    #[test]
    fn test_reassigning_keeps_existing_seat() {
        let mut seats = SeatRegistry::new();
        seats.try_assign_seat(ConnectionId::from(1)).unwrap();
        assert_eq!(seats.try_assign_seat(ConnectionId::from(1)), Ok(Seat::Odd));
        assert_eq!(seats.occupant_count(), 1);
    }

    #[test]
    fn test_occupants_in_seat_order() {
        let mut seats = SeatRegistry::new();
        seats.try_assign_seat(ConnectionId::from(5)).unwrap();
        seats.try_assign_seat(ConnectionId::from(6)).unwrap();
        seats.release_seat(ConnectionId::from(5));
        seats.try_assign_seat(ConnectionId::from(7)).unwrap();
        let order: Vec<_> = seats.occupants().collect();
        assert_eq!(
            order,
            vec![
                (Seat::Odd, ConnectionId::from(7)),
                (Seat::Even, ConnectionId::from(6))
            ]
        );
    }
}
