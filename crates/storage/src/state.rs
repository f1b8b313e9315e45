//! Store state and the mutations that change it
//!
//! Every write is expressed as a `Mutation` before it touches the state.
//! Planning a mutation assigns the next identifier; applying it is the only
//! way state changes. The durability crate logs mutations between the two
//! steps, and replays them through the same `apply` on open.
//!
//! Identifiers start at 1 and only grow. Replay restores the counters from
//! the highest identifier seen, so ids are never reused across restarts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use tablebook_core::{
    CustomerId, ReservationId, ReservationRecord, Slot, SlotTime, StoreError, StoreResult, Table,
    TableId,
};

use crate::index::SlotIndex;

/// A single state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// A table joined the catalog
    AddTable {
        /// Assigned id
        id: TableId,
        /// Seating capacity
        capacity: u32,
    },
    /// A customer was registered
    AddCustomer {
        /// Assigned id
        id: CustomerId,
        /// Exact name
        name: String,
    },
    /// A reservation was booked
    AddReservation {
        /// Assigned id
        id: ReservationId,
        /// Owning customer
        customer: CustomerId,
        /// Booked table
        table: TableId,
        /// Booked date
        date: NaiveDate,
        /// Booked time
        time: SlotTime,
    },
    /// A reservation was cancelled
    RemoveReservation {
        /// Cancelled id
        id: ReservationId,
    },
}

impl Mutation {
    /// Raw identifier the mutation assigns or targets
    pub fn id(&self) -> u64 {
        match self {
            Mutation::AddTable { id, .. } => id.as_u64(),
            Mutation::AddCustomer { id, .. } => id.as_u64(),
            Mutation::AddReservation { id, .. } => id.as_u64(),
            Mutation::RemoveReservation { id } => id.as_u64(),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredReservation {
    customer: CustomerId,
    slot: Slot,
}

/// Tables, customers and reservations with their id counters
#[derive(Debug, Clone)]
pub struct StoreState {
    tables: BTreeMap<TableId, Table>,
    customers: BTreeMap<CustomerId, String>,
    customers_by_name: HashMap<String, CustomerId>,
    reservations: BTreeMap<ReservationId, StoredReservation>,
    slots: SlotIndex,
    next_table_id: u64,
    next_customer_id: u64,
    next_reservation_id: u64,
}

impl StoreState {
    /// Create an empty state; the first id of every kind is 1
    pub fn new() -> Self {
        StoreState {
            tables: BTreeMap::new(),
            customers: BTreeMap::new(),
            customers_by_name: HashMap::new(),
            reservations: BTreeMap::new(),
            slots: SlotIndex::new(),
            next_table_id: 1,
            next_customer_id: 1,
            next_reservation_id: 1,
        }
    }

    // ========================================================================
    // Planning
    // ========================================================================

    /// Plan adding a table
    ///
    /// # Errors
    ///
    /// Returns `Rejected` if `capacity` is zero.
    pub fn plan_table(&self, capacity: u32) -> StoreResult<Mutation> {
        if capacity == 0 {
            return Err(StoreError::Rejected(
                "table capacity must be positive".to_string(),
            ));
        }
        Ok(Mutation::AddTable {
            id: TableId(self.next_table_id),
            capacity,
        })
    }

    /// Plan registering a customer
    ///
    /// # Errors
    ///
    /// Returns `Rejected` if the name is empty or already registered.
    pub fn plan_customer(&self, name: &str) -> StoreResult<Mutation> {
        if name.is_empty() {
            return Err(StoreError::Rejected(
                "customer name must not be empty".to_string(),
            ));
        }
        if self.customers_by_name.contains_key(name) {
            return Err(StoreError::Rejected(format!(
                "customer '{}' already exists",
                name
            )));
        }
        Ok(Mutation::AddCustomer {
            id: CustomerId(self.next_customer_id),
            name: name.to_string(),
        })
    }

    /// Plan booking a reservation
    ///
    /// # Errors
    ///
    /// Returns `Rejected` if the customer or table is unknown.
    pub fn plan_reservation(
        &self,
        customer: CustomerId,
        table: TableId,
        date: NaiveDate,
        time: SlotTime,
    ) -> StoreResult<Mutation> {
        if !self.customers.contains_key(&customer) {
            return Err(StoreError::Rejected(format!(
                "unknown customer {}",
                customer
            )));
        }
        if !self.tables.contains_key(&table) {
            return Err(StoreError::Rejected(format!("unknown table {}", table)));
        }
        Ok(Mutation::AddReservation {
            id: ReservationId(self.next_reservation_id),
            customer,
            table,
            date,
            time,
        })
    }

    /// Plan removing a reservation; None if it does not exist
    pub fn plan_removal(&self, id: ReservationId) -> Option<Mutation> {
        self.reservations
            .contains_key(&id)
            .then_some(Mutation::RemoveReservation { id })
    }

    // ========================================================================
    // Applying
    // ========================================================================

    /// Apply a mutation
    ///
    /// # Errors
    ///
    /// Returns `Corruption` if the mutation contradicts the current state
    /// (duplicate id, dangling reference, removal of an unknown id). Live
    /// writes cannot hit this after planning; replayed logs can.
    pub fn apply(&mut self, mutation: &Mutation) -> StoreResult<()> {
        match mutation {
            Mutation::AddTable { id, capacity } => {
                let next = successor(id.as_u64())?;
                if self.tables.contains_key(id) {
                    return Err(StoreError::Corruption(format!("duplicate table {}", id)));
                }
                let table = Table::new(*id, *capacity)
                    .map_err(|e| StoreError::Corruption(e.to_string()))?;
                self.tables.insert(*id, table);
                self.next_table_id = self.next_table_id.max(next);
            }
            Mutation::AddCustomer { id, name } => {
                let next = successor(id.as_u64())?;
                if self.customers.contains_key(id) || self.customers_by_name.contains_key(name) {
                    return Err(StoreError::Corruption(format!(
                        "duplicate customer {} '{}'",
                        id, name
                    )));
                }
                self.customers.insert(*id, name.clone());
                self.customers_by_name.insert(name.clone(), *id);
                self.next_customer_id = self.next_customer_id.max(next);
            }
            Mutation::AddReservation {
                id,
                customer,
                table,
                date,
                time,
            } => {
                let next = successor(id.as_u64())?;
                if self.reservations.contains_key(id) {
                    return Err(StoreError::Corruption(format!(
                        "duplicate reservation {}",
                        id
                    )));
                }
                if !self.customers.contains_key(customer) || !self.tables.contains_key(table) {
                    return Err(StoreError::Corruption(format!(
                        "reservation {} references unknown customer {} or table {}",
                        id, customer, table
                    )));
                }
                let slot = Slot {
                    table: *table,
                    date: *date,
                    time: *time,
                };
                self.slots.insert(slot, *id);
                self.reservations.insert(
                    *id,
                    StoredReservation {
                        customer: *customer,
                        slot,
                    },
                );
                self.next_reservation_id = self.next_reservation_id.max(next);
            }
            Mutation::RemoveReservation { id } => {
                let stored = self.reservations.remove(id).ok_or_else(|| {
                    StoreError::Corruption(format!("removal of unknown reservation {}", id))
                })?;
                self.slots.remove(stored.slot, *id);
            }
        }
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tables in ascending id order
    pub fn tables(&self) -> Vec<Table> {
        self.tables.values().copied().collect()
    }

    /// Customer id for an exact name
    pub fn customer_by_name(&self, name: &str) -> Option<CustomerId> {
        self.customers_by_name.get(name).copied()
    }

    /// Reservations on a slot
    pub fn count_reservations(&self, table: TableId, date: NaiveDate, time: SlotTime) -> u64 {
        self.slots.count(table, date, time)
    }

    /// Booked times for a table on a date, ascending
    pub fn booked_times(&self, table: TableId, date: NaiveDate) -> Vec<SlotTime> {
        self.slots.times(table, date)
    }

    /// All reservations in id order, joined with customer names
    pub fn reservations(&self) -> Vec<ReservationRecord> {
        self.reservations
            .iter()
            .map(|(id, stored)| ReservationRecord {
                id: *id,
                customer_id: stored.customer,
                customer_name: self
                    .customers
                    .get(&stored.customer)
                    .cloned()
                    .unwrap_or_default(),
                table_id: stored.slot.table,
                date: stored.slot.date,
                time: stored.slot.time,
            })
            .collect()
    }

    /// Number of live reservations
    pub fn reservation_count(&self) -> usize {
        self.reservations.len()
    }

    /// Id the next reservation will receive
    pub fn next_reservation_id(&self) -> ReservationId {
        ReservationId(self.next_reservation_id)
    }
}

/// Counter value after a replayed id; `u64::MAX` leaves no room for another
fn successor(id: u64) -> StoreResult<u64> {
    id.checked_add(1)
        .ok_or_else(|| StoreError::Corruption(format!("id {} exhausts the id space", id)))
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}
