//! Persistence seam
//!
//! `ReservationStore` is the durable source of truth for tables, customers
//! and reservations. The allocator never assigns identifiers itself; every
//! id comes back from the store.
//!
//! Thread safety: All methods must be safe to call concurrently from
//! multiple threads (requires Send + Sync). The store does not enforce
//! slot uniqueness; the allocator's lock does.

use chrono::NaiveDate;

use crate::error::StoreResult;
use crate::slots::SlotTime;
use crate::types::{CustomerId, ReservationId, ReservationRecord, Table, TableId};

/// Storage abstraction for the reservation system
pub trait ReservationStore: Send + Sync {
    /// All tables, ordered by ascending identifier
    fn list_tables(&self) -> StoreResult<Vec<Table>>;

    /// Add a table and return its assigned identifier
    ///
    /// # Errors
    ///
    /// Returns `Rejected` if `capacity` is zero.
    fn insert_table(&self, capacity: u32) -> StoreResult<TableId>;

    /// Look up a customer by exact name
    fn find_customer_by_name(&self, name: &str) -> StoreResult<Option<CustomerId>>;

    /// Add a customer and return its assigned identifier
    fn insert_customer(&self, name: &str) -> StoreResult<CustomerId>;

    /// Number of reservations occupying (table, date, time)
    fn count_reservations(
        &self,
        table: TableId,
        date: NaiveDate,
        time: SlotTime,
    ) -> StoreResult<u64>;

    /// Times already booked for `table` on `date`
    fn booked_times(&self, table: TableId, date: NaiveDate) -> StoreResult<Vec<SlotTime>>;

    /// Persist a reservation and return its assigned identifier
    fn insert_reservation(
        &self,
        customer: CustomerId,
        table: TableId,
        date: NaiveDate,
        time: SlotTime,
    ) -> StoreResult<ReservationId>;

    /// Remove a reservation; false if it did not exist
    fn delete_reservation(&self, id: ReservationId) -> StoreResult<bool>;

    /// Every persisted reservation, ordered by identifier
    fn list_reservations(&self) -> StoreResult<Vec<ReservationRecord>>;
}

impl<S: ReservationStore + ?Sized> ReservationStore for std::sync::Arc<S> {
    fn list_tables(&self) -> StoreResult<Vec<Table>> {
        (**self).list_tables()
    }

    fn insert_table(&self, capacity: u32) -> StoreResult<TableId> {
        (**self).insert_table(capacity)
    }

    fn find_customer_by_name(&self, name: &str) -> StoreResult<Option<CustomerId>> {
        (**self).find_customer_by_name(name)
    }

    fn insert_customer(&self, name: &str) -> StoreResult<CustomerId> {
        (**self).insert_customer(name)
    }

    fn count_reservations(
        &self,
        table: TableId,
        date: NaiveDate,
        time: SlotTime,
    ) -> StoreResult<u64> {
        (**self).count_reservations(table, date, time)
    }

    fn booked_times(&self, table: TableId, date: NaiveDate) -> StoreResult<Vec<SlotTime>> {
        (**self).booked_times(table, date)
    }

    fn insert_reservation(
        &self,
        customer: CustomerId,
        table: TableId,
        date: NaiveDate,
        time: SlotTime,
    ) -> StoreResult<ReservationId> {
        (**self).insert_reservation(customer, table, date, time)
    }

    fn delete_reservation(&self, id: ReservationId) -> StoreResult<bool> {
        (**self).delete_reservation(id)
    }

    fn list_reservations(&self) -> StoreResult<Vec<ReservationRecord>> {
        (**self).list_reservations()
    }
}
