//! Availability index
//!
//! Answers "is this slot free" and "which times are free" by querying the
//! store. Holds no state of its own besides the configured slot catalog,
//! so it never goes stale.

use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;

use tablebook_core::{ReservationStore, Result, SlotCatalog, SlotTime, Table};

/// Store-backed availability queries
#[derive(Clone)]
pub struct AvailabilityIndex {
    store: Arc<dyn ReservationStore>,
    slots: SlotCatalog,
}

impl AvailabilityIndex {
    /// Create an index over `store` offering `slots`
    pub fn new(store: Arc<dyn ReservationStore>, slots: SlotCatalog) -> Self {
        AvailabilityIndex { store, slots }
    }

    /// True iff no reservation occupies (table, date, time)
    pub fn is_available(&self, table: &Table, date: NaiveDate, time: SlotTime) -> Result<bool> {
        Ok(self.store.count_reservations(table.id(), date, time)? == 0)
    }

    /// Times already booked for `table` on `date`
    pub fn booked_times(&self, table: &Table, date: NaiveDate) -> Result<BTreeSet<SlotTime>> {
        Ok(self
            .store
            .booked_times(table.id(), date)?
            .into_iter()
            .collect())
    }

    /// Slot catalog minus booked times, in catalog order
    pub fn available_times(&self, table: &Table, date: NaiveDate) -> Result<Vec<SlotTime>> {
        let booked = self.booked_times(table, date)?;
        Ok(self
            .slots
            .iter()
            .filter(|time| !booked.contains(time))
            .collect())
    }

    /// Configured slot catalog
    pub fn slots(&self) -> &SlotCatalog {
        &self.slots
    }
}

impl std::fmt::Debug for AvailabilityIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityIndex")
            .field("slots", &self.slots)
            .finish()
    }
}
