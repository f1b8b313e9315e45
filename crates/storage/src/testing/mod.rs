//! Testing utilities for store failure paths
//!
//! - **FaultyStore**: wraps any `ReservationStore` and fails chosen
//!   operations on demand, or slows them down to widen race windows
//!
//! # Example
//!
//! ```ignore
//! use tablebook_storage::testing::{FaultyStore, StoreOp};
//!
//! let store = FaultyStore::new(MemoryStore::with_tables(&[4, 8])?);
//! store.fail(StoreOp::InsertReservation);
//! assert!(store.insert_reservation(c, t, date, time).is_err());
//! ```

mod faulty;

pub use faulty::{FaultyStore, StoreOp};
