//! Reservation engine for Tablebook
//!
//! This crate orchestrates all lower layers:
//! - TableCatalog: tables loaded once from the store, in catalog order
//! - AvailabilityIndex: booked/free times per table and date
//! - Allocator: first-fit table selection under the system-wide lock
//! - ReservationRegistry: in-memory cache of live reservations
//! - Audit: best-effort notification per created reservation
//! - ReservationService: the front-end facade, with `tablebook.toml` config
//!
//! The engine is the only component that knows about:
//! - The allocation lock and what it covers
//! - Keeping the registry consistent with the store

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod allocator;
pub mod audit;
pub mod availability;
pub mod catalog;
pub mod config;
pub mod registry;
pub mod report;
pub mod service;

pub use allocator::{AllocationLock, Allocator};
pub use audit::{AuditSink, FileAuditLog, NoopAudit, TracingAudit};
pub use availability::AvailabilityIndex;
pub use catalog::TableCatalog;
pub use config::{BookingConfig, CONFIG_FILE_NAME};
pub use registry::ReservationRegistry;
pub use report::{SlotReport, TableSlots};
pub use service::ReservationService;
