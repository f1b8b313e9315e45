//! Durability layer for Tablebook
//!
//! This crate handles everything that touches disk:
//!
//! - Mutation log: append-only file, one CRC-framed JSON record per change
//! - Durability modes: Strict (fsync per record), Buffered (flush only)
//! - Replay: rebuilds a `StoreState` from the log on open, discarding a
//!   torn final record
//! - DurableStore: `ReservationStore` that logs every mutation before
//!   applying it

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod log;
pub mod mode;
pub mod store;

pub use log::{MutationLog, Replay, LOG_FILE_NAME};
pub use mode::DurabilityMode;
pub use store::{DurableStore, LOCK_FILE_NAME};
