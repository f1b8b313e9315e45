//! Storage layer for Tablebook
//!
//! This crate implements the in-memory side of persistence:
//! - StoreState: tables, customers and reservations plus id counters
//! - Mutation: the unit of change applied to a StoreState (and logged by
//!   the durability crate)
//! - SlotIndex: (table, date) -> booked times secondary index
//! - MemoryStore: `ReservationStore` over a `parking_lot::RwLock<StoreState>`
//! - testing: fault injection for exercising store-failure paths

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod memory;
pub mod state;
pub mod testing;

pub use index::SlotIndex;
pub use memory::MemoryStore;
pub use state::{Mutation, StoreState};
