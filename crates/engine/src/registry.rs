//! Reservation registry
//!
//! In-memory cache of live reservations keyed by id. Reads are lock-free
//! (`DashMap`); writes only happen inside the allocation lock, after the
//! store has acknowledged the corresponding change. The registry therefore
//! never holds an id the store does not have.

use dashmap::DashMap;

use tablebook_core::{Reservation, ReservationId};

/// Live reservations by id
#[derive(Debug, Default)]
pub struct ReservationRegistry {
    reservations: DashMap<ReservationId, Reservation>,
}

impl ReservationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding `reservations`
    pub fn rebuild<I>(reservations: I) -> Self
    where
        I: IntoIterator<Item = Reservation>,
    {
        let registry = Self::new();
        for reservation in reservations {
            registry.insert(reservation);
        }
        registry
    }

    /// Reservation by id, cloned out of the map
    pub fn get(&self, id: ReservationId) -> Option<Reservation> {
        self.reservations.get(&id).map(|entry| entry.value().clone())
    }

    /// Whether `id` is live
    pub fn contains(&self, id: ReservationId) -> bool {
        self.reservations.contains_key(&id)
    }

    pub(crate) fn insert(&self, reservation: Reservation) {
        self.reservations.insert(reservation.id(), reservation);
    }

    pub(crate) fn remove(&self, id: ReservationId) -> Option<Reservation> {
        self.reservations.remove(&id).map(|(_, reservation)| reservation)
    }

    /// Live ids, ascending
    pub fn ids(&self) -> Vec<ReservationId> {
        let mut ids: Vec<ReservationId> = self.reservations.iter().map(|e| *e.key()).collect();
        ids.sort();
        ids
    }

    /// Snapshot of every live reservation, ordered by id
    pub fn all(&self) -> Vec<Reservation> {
        let mut all: Vec<Reservation> = self
            .reservations
            .iter()
            .map(|e| e.value().clone())
            .collect();
        all.sort_by_key(Reservation::id);
        all
    }

    /// Number of live reservations
    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    /// Whether no reservation is live
    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}
