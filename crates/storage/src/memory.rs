//! MemoryStore: volatile `ReservationStore`
//!
//! A `StoreState` behind a `parking_lot::RwLock`. Reads share the lock;
//! each write plans and applies its mutation under one write guard, so id
//! assignment and visibility happen together.

use chrono::NaiveDate;
use parking_lot::RwLock;

use tablebook_core::{
    CustomerId, ReservationId, ReservationRecord, ReservationStore, SlotTime, StoreResult, Table,
    TableId,
};

use crate::state::{Mutation, StoreState};

/// In-memory reservation store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::from_state(StoreState::new())
    }

    /// Wrap an existing state
    pub fn from_state(state: StoreState) -> Self {
        MemoryStore {
            state: RwLock::new(state),
        }
    }

    /// Create a store seeded with tables of the given capacities, in order
    ///
    /// # Errors
    ///
    /// Returns `Rejected` if any capacity is zero.
    pub fn with_tables(capacities: &[u32]) -> StoreResult<Self> {
        let store = Self::new();
        for &capacity in capacities {
            store.insert_table(capacity)?;
        }
        Ok(store)
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> StoreState {
        self.state.read().clone()
    }

    fn commit<F>(&self, plan: F) -> StoreResult<Mutation>
    where
        F: FnOnce(&StoreState) -> StoreResult<Mutation>,
    {
        let mut state = self.state.write();
        let mutation = plan(&*state)?;
        state.apply(&mutation)?;
        Ok(mutation)
    }
}

impl ReservationStore for MemoryStore {
    fn list_tables(&self) -> StoreResult<Vec<Table>> {
        Ok(self.state.read().tables())
    }

    fn insert_table(&self, capacity: u32) -> StoreResult<TableId> {
        let mutation = self.commit(|state| state.plan_table(capacity))?;
        Ok(TableId(mutation.id()))
    }

    fn find_customer_by_name(&self, name: &str) -> StoreResult<Option<CustomerId>> {
        Ok(self.state.read().customer_by_name(name))
    }

    fn insert_customer(&self, name: &str) -> StoreResult<CustomerId> {
        let mutation = self.commit(|state| state.plan_customer(name))?;
        Ok(CustomerId(mutation.id()))
    }

    fn count_reservations(
        &self,
        table: TableId,
        date: NaiveDate,
        time: SlotTime,
    ) -> StoreResult<u64> {
        Ok(self.state.read().count_reservations(table, date, time))
    }

    fn booked_times(&self, table: TableId, date: NaiveDate) -> StoreResult<Vec<SlotTime>> {
        Ok(self.state.read().booked_times(table, date))
    }

    fn insert_reservation(
        &self,
        customer: CustomerId,
        table: TableId,
        date: NaiveDate,
        time: SlotTime,
    ) -> StoreResult<ReservationId> {
        let mutation = self.commit(|state| state.plan_reservation(customer, table, date, time))?;
        Ok(ReservationId(mutation.id()))
    }

    fn delete_reservation(&self, id: ReservationId) -> StoreResult<bool> {
        let mut state = self.state.write();
        match state.plan_removal(id) {
            Some(mutation) => {
                state.apply(&mutation)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list_reservations(&self) -> StoreResult<Vec<ReservationRecord>> {
        Ok(self.state.read().reservations())
    }
}
