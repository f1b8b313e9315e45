//! Tablebook - restaurant table reservations without double booking
//!
//! Tablebook allocates tables to parties for fixed time slots. Every
//! allocation and cancellation runs inside one system-wide exclusive region,
//! so no (table, date, time) slot is ever held by two live reservations.
//!
//! # Quick Start
//!
//! ```ignore
//! use tablebook::{ReservationService, SlotTime};
//!
//! // In-memory service with tables of 4 and 8 seats
//! let service = ReservationService::ephemeral()?;
//!
//! let date = tablebook::parse_date("2025-05-01")?;
//! let time: SlotTime = "12:00".parse()?;
//! let reservation = service.create_reservation("Ada", 4, date, time)?;
//!
//! println!("{}", service.show_available_slots(date)?);
//! ```
//!
//! # Architecture
//!
//! All operations go through [`ReservationService`]. Stores, the allocation
//! lock and the registry live in the engine and lower crates; only the
//! service API and the domain types are re-exported here.

pub use tablebook_core::{
    parse_date, Customer, Error, Reservation, ReservationId, Result, SlotCatalog, SlotTime,
    Table, TableId,
};
pub use tablebook_engine::{BookingConfig, ReservationService, SlotReport, TableSlots};
