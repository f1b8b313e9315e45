//! Core types for Tablebook
//!
//! This module defines the booking model:
//! - TableId / CustomerId / ReservationId: identifiers assigned by the store
//! - Table: a bookable table with a fixed seating capacity
//! - Customer: a party's name, resolved to an identity by exact match
//! - Reservation: an immutable booking of one table for one slot
//! - Slot: the (table, date, time) triple that may be booked at most once

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::slots::SlotTime;

/// Capacity of a small table
pub const SMALL_TABLE_CAPACITY: u32 = 4;

/// Capacity of a large table
pub const LARGE_TABLE_CAPACITY: u32 = 8;

const DATE_FORMAT: &str = "%Y-%m-%d";

macro_rules! store_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value
            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                $name(raw)
            }
        }
    };
}

store_id!(
    /// Identifier of a table, assigned by the store
    TableId
);
store_id!(
    /// Identifier of a customer, assigned by the store
    CustomerId
);
store_id!(
    /// Identifier of a reservation, assigned by the store
    ReservationId
);

/// Parse a calendar date written `YYYY-MM-DD`
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| Error::invalid_input(format!("invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// A bookable table
///
/// Capacity is fixed when the table is created and is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Table {
    id: TableId,
    capacity: u32,
}

impl Table {
    /// Create a table with an arbitrary capacity
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `capacity` is zero.
    pub fn new(id: TableId, capacity: u32) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid_input(format!(
                "table {} must seat at least one guest",
                id
            )));
        }
        Ok(Table { id, capacity })
    }

    /// A small table (seats 4)
    pub fn small(id: TableId) -> Self {
        Table {
            id,
            capacity: SMALL_TABLE_CAPACITY,
        }
    }

    /// A large table (seats 8)
    pub fn large(id: TableId) -> Self {
        Table {
            id,
            capacity: LARGE_TABLE_CAPACITY,
        }
    }

    /// Table identifier
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Seating capacity
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Whether a party of `party_size` can sit here
    pub fn seats(&self, party_size: u32) -> bool {
        self.capacity >= party_size
    }
}

/// The party a reservation is made for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Customer {
    name: String,
}

impl Customer {
    /// Create a customer; surrounding whitespace is dropped
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the name is empty after trimming.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(Error::invalid_input("customer name must not be empty"));
        }
        Ok(Customer {
            name: name.to_string(),
        })
    }

    /// Customer name (identity key in the store)
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The unit of booking atomicity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    /// Booked table
    pub table: TableId,
    /// Calendar day
    pub date: NaiveDate,
    /// Time of day
    pub time: SlotTime,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table {} on {} at {}", self.table, self.date, self.time)
    }
}

/// A confirmed booking
///
/// Created once by the allocator and never modified; cancellation removes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    customer: Customer,
    table: Table,
    date: NaiveDate,
    time: SlotTime,
}

impl Reservation {
    /// Assemble a reservation from its persisted parts
    pub fn new(
        id: ReservationId,
        customer: Customer,
        table: Table,
        date: NaiveDate,
        time: SlotTime,
    ) -> Self {
        Reservation {
            id,
            customer,
            table,
            date,
            time,
        }
    }

    /// Store-assigned identifier
    pub fn id(&self) -> ReservationId {
        self.id
    }

    /// Owning customer
    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Assigned table
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Booked date
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Booked time
    pub fn time(&self) -> SlotTime {
        self.time
    }

    /// The slot this reservation occupies
    pub fn slot(&self) -> Slot {
        Slot {
            table: self.table.id(),
            date: self.date,
            time: self.time,
        }
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reservation ID: {}, Customer: {}, Table ID: {}, Date: {}, Time: {}",
            self.id,
            self.customer.name(),
            self.table.id(),
            self.date,
            self.time
        )
    }
}

/// A reservation row as the store keeps it
///
/// Carries the customer name so a registry can be rebuilt without a join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    /// Reservation identifier
    pub id: ReservationId,
    /// Owning customer
    pub customer_id: CustomerId,
    /// Owning customer's name
    pub customer_name: String,
    /// Booked table
    pub table_id: TableId,
    /// Booked date
    pub date: NaiveDate,
    /// Booked time
    pub time: SlotTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_tiers() {
        let small = Table::small(TableId(1));
        let large = Table::large(TableId(2));
        assert_eq!(small.capacity(), 4);
        assert_eq!(large.capacity(), 8);
        assert_eq!(Table::new(TableId(3), 6).unwrap().capacity(), 6);
    }

    #[test]
    fn test_table_rejects_zero_capacity() {
        assert!(matches!(
            Table::new(TableId(1), 0),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_table_seats_is_inclusive() {
        let table = Table::small(TableId(1));
        assert!(table.seats(1));
        assert!(table.seats(4));
        assert!(!table.seats(5));
    }

    #[test]
    fn test_customer_name_trimmed() {
        let c = Customer::new("  Ada Lovelace ").unwrap();
        assert_eq!(c.name(), "Ada Lovelace");
        assert!(Customer::new("   ").is_err());
        assert!(Customer::new("").is_err());
    }

    #[test]
    fn test_parse_date() {
        let d = parse_date("2025-05-01").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_date("01/05/2025").is_err());
    }

    #[test]
    fn test_reservation_slot_and_display() {
        let r = Reservation::new(
            ReservationId(7),
            Customer::new("Grace").unwrap(),
            Table::large(TableId(2)),
            parse_date("2025-05-01").unwrap(),
            "13:00".parse().unwrap(),
        );
        let slot = r.slot();
        assert_eq!(slot.table, TableId(2));
        assert_eq!(
            r.to_string(),
            "Reservation ID: 7, Customer: Grace, Table ID: 2, Date: 2025-05-01, Time: 13:00"
        );
        assert_eq!(slot.to_string(), "table 2 on 2025-05-01 at 13:00");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&ReservationId(12)).unwrap(), "12");
        let id: TableId = serde_json::from_str("3").unwrap();
        assert_eq!(id, TableId(3));
    }
}
