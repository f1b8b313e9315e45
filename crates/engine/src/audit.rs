//! Audit trail for created reservations
//!
//! Sinks receive one notification per successful creation, after the
//! allocation lock is released. A sink may fail; the service logs the
//! failure and keeps the reservation.

use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use tablebook_core::Reservation;
use tracing::info;

/// Failure to write an audit record
#[derive(Debug, Error)]
pub enum AuditError {
    /// The audit destination could not be written
    #[error("audit write failed: {0}")]
    Io(#[from] io::Error),
}

/// Destination for reservation audit records
pub trait AuditSink: Send + Sync {
    /// Record a newly created reservation
    fn record(&self, reservation: &Reservation) -> Result<(), AuditError>;
}

/// Appends one line per reservation to a text file
#[derive(Debug)]
pub struct FileAuditLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileAuditLog {
    /// Audit to `path`; the file is created on first write
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FileAuditLog {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Audit file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for FileAuditLog {
    fn record(&self, reservation: &Reservation) -> Result<(), AuditError> {
        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", reservation)?;
        Ok(())
    }
}

/// Emits each reservation as an `info` event on the `tablebook::audit` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAudit;

impl AuditSink for TracingAudit {
    fn record(&self, reservation: &Reservation) -> Result<(), AuditError> {
        info!(
            target: "tablebook::audit",
            reservation_id = %reservation.id(),
            customer = reservation.customer().name(),
            table_id = %reservation.table().id(),
            date = %reservation.date(),
            time = %reservation.time(),
            "audit"
        );
        Ok(())
    }
}

/// Discards every record
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAudit;

impl AuditSink for NoopAudit {
    fn record(&self, _reservation: &Reservation) -> Result<(), AuditError> {
        Ok(())
    }
}
