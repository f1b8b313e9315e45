//! Secondary index for slot queries
//!
//! SlotIndex maps (TableId, date) -> time -> reservation ids so that
//! availability checks are O(reservations for that table and day) instead
//! of O(all reservations).

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tablebook_core::{ReservationId, Slot, SlotTime, TableId};

/// Secondary index: (TableId, date) -> booked times
///
/// More than one id may sit under a slot; the store does not forbid it,
/// so the index must count faithfully.
#[derive(Debug, Default, Clone)]
pub struct SlotIndex {
    index: HashMap<(TableId, NaiveDate), BTreeMap<SlotTime, Vec<ReservationId>>>,
}

impl SlotIndex {
    /// Create a new empty SlotIndex
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Record `id` as occupying `slot`
    pub fn insert(&mut self, slot: Slot, id: ReservationId) {
        self.index
            .entry((slot.table, slot.date))
            .or_default()
            .entry(slot.time)
            .or_default()
            .push(id);
    }

    /// Drop `id` from `slot`
    ///
    /// Empty inner entries are removed so the index does not accumulate
    /// days that no longer hold bookings.
    pub fn remove(&mut self, slot: Slot, id: ReservationId) {
        let key = (slot.table, slot.date);
        if let Some(times) = self.index.get_mut(&key) {
            if let Some(ids) = times.get_mut(&slot.time) {
                ids.retain(|existing| *existing != id);
                if ids.is_empty() {
                    times.remove(&slot.time);
                }
            }
            if times.is_empty() {
                self.index.remove(&key);
            }
        }
    }

    /// Number of reservations on a slot
    pub fn count(&self, table: TableId, date: NaiveDate, time: SlotTime) -> u64 {
        self.index
            .get(&(table, date))
            .and_then(|times| times.get(&time))
            .map_or(0, |ids| ids.len() as u64)
    }

    /// Booked times for a table on a date, ascending
    pub fn times(&self, table: TableId, date: NaiveDate) -> Vec<SlotTime> {
        self.index
            .get(&(table, date))
            .map(|times| times.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
