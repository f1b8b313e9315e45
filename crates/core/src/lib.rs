//! Core types and traits for Tablebook
//!
//! This crate defines the foundational types used throughout the system:
//! - TableId, CustomerId, ReservationId: store-assigned identifiers
//! - Table: a bookable table with a fixed seating capacity
//! - Customer, Reservation, Slot: the booking model
//! - SlotTime, SlotCatalog: the configured set of bookable times
//! - Error: Error type hierarchy
//! - Traits: the `ReservationStore` persistence seam

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod slots;
pub mod traits;
pub mod types;

pub use error::{Error, Result, StoreError, StoreResult};
pub use slots::{SlotCatalog, SlotTime, DEFAULT_SLOTS};
pub use traits::ReservationStore;
pub use types::{
    parse_date, Customer, CustomerId, Reservation, ReservationId, ReservationRecord, Slot, Table,
    TableId, LARGE_TABLE_CAPACITY, SMALL_TABLE_CAPACITY,
};
