//! DurableStore: log-backed `ReservationStore`
//!
//! Commit Sequence for every write:
//!
//! ```text
//! 1. take the state write lock
//! 2. plan the mutation (assigns the next id, validates references)
//! 3. append it to the log (DURABILITY POINT)
//! 4. apply it to the in-memory state (VISIBILITY POINT)
//! ```
//!
//! If step 3 fails nothing is applied and the id is not consumed. Reads
//! only take the state read lock and never touch the log.
//!
//! An open store holds an exclusive lock on `<data_dir>/.lock` until it is
//! dropped. A second opener of the same directory, in this process or
//! another, fails with `Unavailable`.

use chrono::NaiveDate;
use parking_lot::{Mutex, RwLock};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use tablebook_core::{
    CustomerId, ReservationId, ReservationRecord, ReservationStore, SlotTime, StoreError,
    StoreResult, Table, TableId,
};
use tablebook_storage::{Mutation, StoreState};
use tracing::info;

use crate::log::{MutationLog, LOG_FILE_NAME};
use crate::mode::DurabilityMode;

/// Lock file guarding a data directory against concurrent openers
pub const LOCK_FILE_NAME: &str = ".lock";

/// Reservation store persisted to a mutation log
#[derive(Debug)]
pub struct DurableStore {
    state: RwLock<StoreState>,
    log: Mutex<MutationLog>,
    data_dir: PathBuf,
    _lock_file: File,
}

impl DurableStore {
    /// Open the store in `data_dir`, creating the directory if needed
    ///
    /// Replays the log into memory before returning.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if another open store holds the directory,
    /// `Io` on file errors and `Corruption` if the log is damaged anywhere
    /// but its final record.
    pub fn open<P: AsRef<Path>>(data_dir: P, mode: DurabilityMode) -> StoreResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        let lock_file = lock_data_dir(&data_dir)?;

        let (log, replay) = MutationLog::open(data_dir.join(LOG_FILE_NAME), mode)?;
        let mut state = StoreState::new();
        for mutation in &replay.mutations {
            state.apply(mutation)?;
        }

        info!(
            data_dir = %data_dir.display(),
            records = replay.mutations.len(),
            reservations = state.reservation_count(),
            "Recovered reservation store"
        );

        Ok(DurableStore {
            state: RwLock::new(state),
            log: Mutex::new(log),
            data_dir,
            _lock_file: lock_file,
        })
    }

    /// Data directory this store lives in
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Clone of the current in-memory state
    pub fn snapshot(&self) -> StoreState {
        self.state.read().clone()
    }

    fn commit<F>(&self, plan: F) -> StoreResult<Mutation>
    where
        F: FnOnce(&StoreState) -> StoreResult<Mutation>,
    {
        let mut state = self.state.write();
        let mutation = plan(&*state)?;
        self.log.lock().append(&mutation)?;
        state.apply(&mutation)?;
        Ok(mutation)
    }
}

/// Take the exclusive directory lock; released when the file is closed
fn lock_data_dir(data_dir: &Path) -> StoreResult<File> {
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(data_dir.join(LOCK_FILE_NAME))?;
    fs2::FileExt::try_lock_exclusive(&lock_file).map_err(|_| {
        StoreError::Unavailable(format!(
            "data directory '{}' is already in use",
            data_dir.display()
        ))
    })?;
    Ok(lock_file)
}

impl ReservationStore for DurableStore {
    fn list_tables(&self) -> StoreResult<Vec<Table>> {
        Ok(self.state.read().tables())
    }

    fn insert_table(&self, capacity: u32) -> StoreResult<TableId> {
        let mutation = self.commit(|state| state.plan_table(capacity))?;
        Ok(TableId(mutation.id()))
    }

    fn find_customer_by_name(&self, name: &str) -> StoreResult<Option<CustomerId>> {
        Ok(self.state.read().customer_by_name(name))
    }

    fn insert_customer(&self, name: &str) -> StoreResult<CustomerId> {
        let mutation = self.commit(|state| state.plan_customer(name))?;
        Ok(CustomerId(mutation.id()))
    }

    fn count_reservations(
        &self,
        table: TableId,
        date: NaiveDate,
        time: SlotTime,
    ) -> StoreResult<u64> {
        Ok(self.state.read().count_reservations(table, date, time))
    }

    fn booked_times(&self, table: TableId, date: NaiveDate) -> StoreResult<Vec<SlotTime>> {
        Ok(self.state.read().booked_times(table, date))
    }

    fn insert_reservation(
        &self,
        customer: CustomerId,
        table: TableId,
        date: NaiveDate,
        time: SlotTime,
    ) -> StoreResult<ReservationId> {
        let mutation = self.commit(|state| state.plan_reservation(customer, table, date, time))?;
        Ok(ReservationId(mutation.id()))
    }

    fn delete_reservation(&self, id: ReservationId) -> StoreResult<bool> {
        let mut state = self.state.write();
        let Some(mutation) = state.plan_removal(id) else {
            return Ok(false);
        };
        self.log.lock().append(&mutation)?;
        state.apply(&mutation)?;
        Ok(true)
    }

    fn list_reservations(&self) -> StoreResult<Vec<ReservationRecord>> {
        Ok(self.state.read().reservations())
    }
}
