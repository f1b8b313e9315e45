//! Error types for Tablebook
//!
//! Two layers:
//! - `StoreError`: infrastructure failures raised by a `ReservationStore`
//! - `Error`: everything a reservation operation can fail with
//!
//! Lookups of unknown identifiers are not errors; they return `None`/`false`.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use chrono::NaiveDate;
use std::io;
use thiserror::Error;

use crate::slots::SlotTime;

/// Result type alias for reservation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures of the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error (log file, data directory)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Persisted data failed an integrity check
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// The store cannot currently be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write
    #[error("Write rejected: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Error types for reservation operations
#[derive(Debug, Error)]
pub enum Error {
    /// No table in the catalog fits the party and is free for the slot
    #[error("No available table for a party of {party_size} on {date} at {time}")]
    NoTableAvailable {
        /// Requested party size
        party_size: u32,
        /// Requested date
        date: NaiveDate,
        /// Requested time
        time: SlotTime,
    },

    /// Persistence failed; the operation did not take effect
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The request itself is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an InvalidInput error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a Config error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Business-rule failure the caller can fix by asking for something else
    pub fn is_business_failure(&self) -> bool {
        matches!(self, Error::NoTableAvailable { .. } | Error::InvalidInput(_))
    }

    /// Infrastructure failure
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Error::Store(_))
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Store(StoreError::Io(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    #[test]
    fn test_error_display_no_table() {
        let err = Error::NoTableAvailable {
            party_size: 4,
            date: may_first(),
            time: "12:00".parse().unwrap(),
        };
        let msg = err.to_string();
        assert!(msg.contains("No available table"));
        assert!(msg.contains("2025-05-01"));
        assert!(msg.contains("12:00"));
    }

    #[test]
    fn test_error_display_store() {
        let err = Error::Store(StoreError::Unavailable("connection refused".to_string()));
        let msg = err.to_string();
        assert!(msg.contains("Store error"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Store(StoreError::Io(_))));
        assert!(err.is_store_failure());
    }

    #[test]
    fn test_store_error_from_json() {
        let result: std::result::Result<u32, _> = serde_json::from_str("{not json");
        let err: StoreError = result.unwrap_err().into();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_classification() {
        let business = Error::NoTableAvailable {
            party_size: 10,
            date: may_first(),
            time: "13:00".parse().unwrap(),
        };
        assert!(business.is_business_failure());
        assert!(!business.is_store_failure());

        let infra = Error::from(StoreError::Rejected("disk full".into()));
        assert!(infra.is_store_failure());
        assert!(!infra.is_business_failure());

        assert!(Error::invalid_input("party size must be positive").is_business_failure());
        assert!(!Error::config("bad slot").is_business_failure());
    }
}
