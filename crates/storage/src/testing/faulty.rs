//! Fault-injecting store wrapper

use chrono::NaiveDate;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::thread;
use std::time::Duration;

use tablebook_core::{
    CustomerId, ReservationId, ReservationRecord, ReservationStore, SlotTime, StoreError,
    StoreResult, Table, TableId,
};

/// Store operations that can be failed or delayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// `list_tables`
    ListTables,
    /// `insert_table`
    InsertTable,
    /// `find_customer_by_name`
    FindCustomer,
    /// `insert_customer`
    InsertCustomer,
    /// `count_reservations`
    CountReservations,
    /// `booked_times`
    BookedTimes,
    /// `insert_reservation`
    InsertReservation,
    /// `delete_reservation`
    DeleteReservation,
    /// `list_reservations`
    ListReservations,
}

/// Wraps a store; armed operations return `StoreError::Unavailable`
#[derive(Debug)]
pub struct FaultyStore<S> {
    inner: S,
    failing: Mutex<HashSet<StoreOp>>,
    latency: Mutex<HashMap<StoreOp, Duration>>,
    calls: Mutex<HashMap<StoreOp, usize>>,
}

impl<S: ReservationStore> FaultyStore<S> {
    /// Wrap `inner` with no faults armed
    pub fn new(inner: S) -> Self {
        FaultyStore {
            inner,
            failing: Mutex::new(HashSet::new()),
            latency: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Make every future call of `op` fail
    pub fn fail(&self, op: StoreOp) {
        self.failing.lock().insert(op);
    }

    /// Stop failing `op`
    pub fn heal(&self, op: StoreOp) {
        self.failing.lock().remove(&op);
    }

    /// Sleep for `delay` before every call of `op`
    pub fn delay(&self, op: StoreOp, delay: Duration) {
        self.latency.lock().insert(op, delay);
    }

    /// Number of times `op` was called, failed calls included
    pub fn calls(&self, op: StoreOp) -> usize {
        self.calls.lock().get(&op).copied().unwrap_or(0)
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn enter(&self, op: StoreOp) -> StoreResult<()> {
        *self.calls.lock().entry(op).or_insert(0) += 1;
        let delay = self.latency.lock().get(&op).copied();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
        if self.failing.lock().contains(&op) {
            return Err(StoreError::Unavailable(format!("injected fault on {:?}", op)));
        }
        Ok(())
    }
}

impl<S: ReservationStore> ReservationStore for FaultyStore<S> {
    fn list_tables(&self) -> StoreResult<Vec<Table>> {
        self.enter(StoreOp::ListTables)?;
        self.inner.list_tables()
    }

    fn insert_table(&self, capacity: u32) -> StoreResult<TableId> {
        self.enter(StoreOp::InsertTable)?;
        self.inner.insert_table(capacity)
    }

    fn find_customer_by_name(&self, name: &str) -> StoreResult<Option<CustomerId>> {
        self.enter(StoreOp::FindCustomer)?;
        self.inner.find_customer_by_name(name)
    }

    fn insert_customer(&self, name: &str) -> StoreResult<CustomerId> {
        self.enter(StoreOp::InsertCustomer)?;
        self.inner.insert_customer(name)
    }

    fn count_reservations(
        &self,
        table: TableId,
        date: NaiveDate,
        time: SlotTime,
    ) -> StoreResult<u64> {
        self.enter(StoreOp::CountReservations)?;
        self.inner.count_reservations(table, date, time)
    }

    fn booked_times(&self, table: TableId, date: NaiveDate) -> StoreResult<Vec<SlotTime>> {
        self.enter(StoreOp::BookedTimes)?;
        self.inner.booked_times(table, date)
    }

    fn insert_reservation(
        &self,
        customer: CustomerId,
        table: TableId,
        date: NaiveDate,
        time: SlotTime,
    ) -> StoreResult<ReservationId> {
        self.enter(StoreOp::InsertReservation)?;
        self.inner.insert_reservation(customer, table, date, time)
    }

    fn delete_reservation(&self, id: ReservationId) -> StoreResult<bool> {
        self.enter(StoreOp::DeleteReservation)?;
        self.inner.delete_reservation(id)
    }

    fn list_reservations(&self) -> StoreResult<Vec<ReservationRecord>> {
        self.enter(StoreOp::ListReservations)?;
        self.inner.list_reservations()
    }
}
