//! Table allocator
//!
//! Creates reservations by first-fit over the table catalog and cancels
//! them. Both run inside the `AllocationLock`, one system-wide exclusive
//! region, so no two attempts can interleave their check-then-insert.
//!
//! ## Create Sequence
//!
//! ```text
//! 1. validate the request (no lock)
//! 2. enter the allocation lock
//! 3. for each table in catalog order:
//!      skip if capacity < party size
//!      skip if the slot is booked
//!      resolve or insert the customer
//!      insert the reservation row (store assigns the id)
//!      insert into the registry
//!      return
//! 4. NoTableAvailable
//! ```
//!
//! The guard is dropped on every exit path, errors and panics included.
//! Any store failure aborts the attempt before the registry is touched.

use chrono::NaiveDate;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

use tablebook_core::{
    Customer, CustomerId, Error, Reservation, ReservationId, ReservationStore, Result, SlotTime,
};
use tracing::{debug, info, warn};

use crate::availability::AvailabilityIndex;
use crate::catalog::TableCatalog;
use crate::registry::ReservationRegistry;

/// The single exclusive region guarding every registry/store write
#[derive(Debug, Default)]
pub struct AllocationLock {
    inner: Mutex<()>,
}

/// Proof of holding the allocation lock
pub struct AllocationGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl AllocationLock {
    /// Create an unlocked region
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the region is free, then hold it until the guard drops
    pub fn enter(&self) -> AllocationGuard<'_> {
        AllocationGuard {
            _guard: self.inner.lock(),
        }
    }

    /// Whether some caller currently holds the region
    pub fn is_held(&self) -> bool {
        self.inner.is_locked()
    }
}

/// First-fit reservation allocator
pub struct Allocator {
    store: Arc<dyn ReservationStore>,
    catalog: Arc<TableCatalog>,
    availability: AvailabilityIndex,
    registry: Arc<ReservationRegistry>,
    lock: AllocationLock,
}

impl Allocator {
    /// Wire an allocator over its collaborators
    pub fn new(
        store: Arc<dyn ReservationStore>,
        catalog: Arc<TableCatalog>,
        availability: AvailabilityIndex,
        registry: Arc<ReservationRegistry>,
    ) -> Self {
        Allocator {
            store,
            catalog,
            availability,
            registry,
            lock: AllocationLock::new(),
        }
    }

    /// Book the first catalog table that seats the party and is free
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the party is empty or the time is not bookable
    /// - `NoTableAvailable` if every table is too small or taken
    /// - `Store` if persistence fails; nothing is registered in that case
    pub fn create_reservation(
        &self,
        customer: &Customer,
        party_size: u32,
        date: NaiveDate,
        time: SlotTime,
    ) -> Result<Reservation> {
        if party_size == 0 {
            return Err(Error::invalid_input("party size must be at least 1"));
        }
        if !self.availability.slots().contains(time) {
            return Err(Error::invalid_input(format!(
                "{} is not a bookable time",
                time
            )));
        }

        let _guard = self.lock.enter();

        for table in self.catalog.iter() {
            if !table.seats(party_size) {
                continue;
            }
            if !self.availability.is_available(table, date, time)? {
                debug!(table_id = %table.id(), %date, %time, "Slot taken, trying next table");
                continue;
            }

            let customer_id = self.resolve_customer(customer)?;
            let id = self
                .store
                .insert_reservation(customer_id, table.id(), date, time)?;
            let reservation = Reservation::new(id, customer.clone(), *table, date, time);
            self.registry.insert(reservation.clone());

            info!(
                reservation_id = %id,
                table_id = %table.id(),
                party_size,
                %date,
                %time,
                "Reservation created"
            );
            return Ok(reservation);
        }

        debug!(party_size, %date, %time, "No table available");
        Err(Error::NoTableAvailable {
            party_size,
            date,
            time,
        })
    }

    /// Cancel a live reservation
    ///
    /// Deletes the row from the store, then drops it from the registry.
    /// Unknown or already-cancelled ids return `Ok(false)` and touch nothing.
    ///
    /// # Errors
    ///
    /// Returns `Store` if the delete fails; the registry is left unchanged.
    pub fn cancel_reservation(&self, id: ReservationId) -> Result<bool> {
        let _guard = self.lock.enter();

        if !self.registry.contains(id) {
            return Ok(false);
        }
        if !self.store.delete_reservation(id)? {
            warn!(
                reservation_id = %id,
                "Registry held a reservation the store did not; dropping it"
            );
        }
        self.registry.remove(id);

        info!(reservation_id = %id, "Reservation cancelled");
        Ok(true)
    }

    /// The allocation lock
    pub fn lock(&self) -> &AllocationLock {
        &self.lock
    }

    fn resolve_customer(&self, customer: &Customer) -> Result<CustomerId> {
        if let Some(id) = self.store.find_customer_by_name(customer.name())? {
            return Ok(id);
        }
        Ok(self.store.insert_customer(customer.name())?)
    }
}

impl std::fmt::Debug for Allocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Allocator")
            .field("tables", &self.catalog.len())
            .field("reservations", &self.registry.len())
            .finish()
    }
}
