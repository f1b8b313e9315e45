//! Append-only mutation log
//!
//! ## File Format
//!
//! One record per line:
//!
//! ```text
//! <crc32 of payload, 8 lowercase hex digits> <payload: JSON Mutation>\n
//! ```
//!
//! A record counts only once its terminating newline is on disk. On open:
//! - an unterminated final segment is a torn write: it is discarded and
//!   the file is truncated back to the last complete record
//! - a terminated record that fails its checksum or does not decode is
//!   corruption and fails the open
//!
//! An append that fails part way is cut back off the file before the error
//! is returned, so the file never holds a record the state did not apply.
//! If that truncation also fails the log refuses every later append.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tablebook_core::{StoreError, StoreResult};
use tablebook_storage::Mutation;
use tracing::{debug, error, warn};

use crate::mode::DurabilityMode;

/// Log file name inside a data directory
pub const LOG_FILE_NAME: &str = "reservations.log";

/// Result of reading a log on open
#[derive(Debug, Default)]
pub struct Replay {
    /// Complete records, in append order
    pub mutations: Vec<Mutation>,
    /// Bytes of torn tail that were discarded
    pub discarded_bytes: u64,
}

/// File operations the log needs from its backing file
pub trait LogFile: Send {
    /// Write the whole buffer at the end of the file
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;
    /// Flush written data to the device
    fn sync_data(&self) -> io::Result<()>;
    /// Truncate or extend the file to `len` bytes
    fn set_len(&self, len: u64) -> io::Result<()>;
}

impl LogFile for File {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Write::write_all(self, buf)
    }

    fn sync_data(&self) -> io::Result<()> {
        File::sync_data(self)
    }

    fn set_len(&self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }
}

/// Append handle on a mutation log file
pub struct MutationLog<F: LogFile = File> {
    path: PathBuf,
    file: F,
    mode: DurabilityMode,
    /// Length of the complete records on disk
    len: u64,
    appended: u64,
    poisoned: bool,
}

impl MutationLog<File> {
    /// Open (or create) the log at `path` and read back its records
    ///
    /// # Errors
    ///
    /// Returns `Io` on file errors and `Corruption` if a complete record
    /// fails its checksum or cannot be decoded.
    pub fn open<P: AsRef<Path>>(path: P, mode: DurabilityMode) -> StoreResult<(Self, Replay)> {
        let path = path.as_ref().to_path_buf();

        let (replay, len) = if path.exists() {
            let bytes = fs::read(&path)?;
            let (replay, valid_len) = read_records(&bytes)?;
            if replay.discarded_bytes > 0 {
                warn!(
                    path = %path.display(),
                    discarded_bytes = replay.discarded_bytes,
                    "Discarding torn record at end of mutation log"
                );
                OpenOptions::new().write(true).open(&path)?.set_len(valid_len)?;
            }
            (replay, valid_len)
        } else {
            (Replay::default(), 0)
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(
            path = %path.display(),
            records = replay.mutations.len(),
            %mode,
            "Opened mutation log"
        );

        Ok((MutationLog::from_file(path, file, mode, len), replay))
    }
}

impl<F: LogFile> MutationLog<F> {
    fn from_file(path: PathBuf, file: F, mode: DurabilityMode, len: u64) -> Self {
        MutationLog {
            path,
            file,
            mode,
            len,
            appended: 0,
            poisoned: false,
        }
    }

    /// Append one record; durable per the configured mode on return
    ///
    /// # Errors
    ///
    /// Returns `Io` if the write or sync fails, after cutting the partial
    /// record back off the file. Returns `Unavailable` once a failed append
    /// could not be cut back.
    pub fn append(&mut self, mutation: &Mutation) -> StoreResult<()> {
        if self.poisoned {
            return Err(StoreError::Unavailable(format!(
                "mutation log '{}' holds an unrecoverable partial record",
                self.path.display()
            )));
        }
        let record = encode_record(mutation)?;

        if let Err(e) = self.write_record(record.as_bytes()) {
            self.roll_back();
            return Err(e.into());
        }
        self.len += record.len() as u64;
        self.appended += 1;
        Ok(())
    }

    fn write_record(&mut self, record: &[u8]) -> io::Result<()> {
        self.file.write_all(record)?;
        if self.mode.requires_fsync() {
            self.file.sync_data()?;
        }
        Ok(())
    }

    /// Cut the file back to its last complete record
    fn roll_back(&mut self) {
        match self.file.set_len(self.len) {
            Ok(()) => warn!(
                path = %self.path.display(),
                len = self.len,
                "Rolled back failed append to mutation log"
            ),
            Err(e) => {
                self.poisoned = true;
                error!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not roll back failed append; mutation log is now read-only"
                );
            }
        }
    }

    /// True once a failed append could not be rolled back
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Log file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended through this handle
    pub fn appended(&self) -> u64 {
        self.appended
    }

    /// Configured durability mode
    pub fn mode(&self) -> DurabilityMode {
        self.mode
    }
}

impl<F: LogFile> std::fmt::Debug for MutationLog<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationLog")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("len", &self.len)
            .field("appended", &self.appended)
            .field("poisoned", &self.poisoned)
            .finish()
    }
}

/// Encode a mutation as one newline-terminated record
pub fn encode_record(mutation: &Mutation) -> StoreResult<String> {
    let payload = serde_json::to_string(mutation)?;
    let crc = crc32fast::hash(payload.as_bytes());
    Ok(format!("{:08x} {}\n", crc, payload))
}

fn decode_record(line: &[u8]) -> Result<Mutation, String> {
    let line = std::str::from_utf8(line).map_err(|e| e.to_string())?;
    let (crc_hex, payload) = line
        .split_once(' ')
        .ok_or_else(|| "missing checksum separator".to_string())?;
    let expected = u32::from_str_radix(crc_hex, 16).map_err(|e| e.to_string())?;
    let actual = crc32fast::hash(payload.as_bytes());
    if expected != actual {
        return Err(format!(
            "checksum mismatch: stored {:08x}, computed {:08x}",
            expected, actual
        ));
    }
    serde_json::from_str(payload).map_err(|e| e.to_string())
}

/// Split `bytes` into records; returns the replay and the valid prefix length
fn read_records(bytes: &[u8]) -> StoreResult<(Replay, u64)> {
    let mut replay = Replay::default();
    let mut offset = 0usize;

    while offset < bytes.len() {
        let rest = &bytes[offset..];
        match rest.iter().position(|&b| b == b'\n') {
            Some(end) => {
                let mutation = decode_record(&rest[..end]).map_err(|reason| {
                    StoreError::Corruption(format!(
                        "record {} at byte {}: {}",
                        replay.mutations.len() + 1,
                        offset,
                        reason
                    ))
                })?;
                replay.mutations.push(mutation);
                offset += end + 1;
            }
            None => {
                replay.discarded_bytes = rest.len() as u64;
                break;
            }
        }
    }

    Ok((replay, offset as u64))
}
