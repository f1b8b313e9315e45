//! Recovery tests for DurableStore
//!
//! Verifies that everything acknowledged by the store survives a reopen,
//! that identifiers keep growing across restarts, and that damaged logs
//! are handled per the log format rules.

use chrono::NaiveDate;
use std::fs::{self, OpenOptions};
use std::io::Write;

use tablebook_core::{ReservationId, ReservationStore, SlotTime, StoreError, TableId};
use tablebook_durability::{DurabilityMode, DurableStore, LOG_FILE_NAME};
use tempfile::TempDir;

fn may_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
}

fn at(time: &str) -> SlotTime {
    time.parse().unwrap()
}

#[test]
fn test_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap();
        store.insert_table(4).unwrap();
        store.insert_table(8).unwrap();
        let ada = store.insert_customer("Ada").unwrap();
        store
            .insert_reservation(ada, TableId(1), may_first(), at("12:00"))
            .unwrap();
        store
            .insert_reservation(ada, TableId(2), may_first(), at("13:00"))
            .unwrap();
    }

    let store = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap();
    let tables = store.list_tables().unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[1].capacity(), 8);
    assert!(store.find_customer_by_name("Ada").unwrap().is_some());

    let records = store.list_reservations().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].customer_name, "Ada");
    assert_eq!(records[1].time, at("13:00"));
    assert_eq!(
        store
            .count_reservations(TableId(1), may_first(), at("12:00"))
            .unwrap(),
        1
    );
}

#[test]
fn test_deletion_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = DurableStore::open(dir.path(), DurabilityMode::Buffered).unwrap();
        store.insert_table(4).unwrap();
        let ada = store.insert_customer("Ada").unwrap();
        let id = store
            .insert_reservation(ada, TableId(1), may_first(), at("12:00"))
            .unwrap();
        assert!(store.delete_reservation(id).unwrap());
        assert!(!store.delete_reservation(id).unwrap());
    }

    let store = DurableStore::open(dir.path(), DurabilityMode::Buffered).unwrap();
    assert!(store.list_reservations().unwrap().is_empty());
    assert!(store.booked_times(TableId(1), may_first()).unwrap().is_empty());
}

#[test]
fn test_ids_continue_after_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap();
        store.insert_table(4).unwrap();
        let ada = store.insert_customer("Ada").unwrap();
        for time in ["12:00", "13:00", "14:00"] {
            store
                .insert_reservation(ada, TableId(1), may_first(), at(time))
                .unwrap();
        }
        store.delete_reservation(ReservationId(3)).unwrap();
    }

    let store = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap();
    let ada = store.find_customer_by_name("Ada").unwrap().unwrap();
    let next = store
        .insert_reservation(ada, TableId(1), may_first(), at("15:00"))
        .unwrap();
    assert_eq!(next, ReservationId(4));
}

#[test]
fn test_rejected_write_is_not_logged() {
    let dir = TempDir::new().unwrap();
    {
        let store = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap();
        assert!(matches!(
            store.insert_table(0),
            Err(StoreError::Rejected(_))
        ));
        store.insert_table(4).unwrap();
    }
    let store = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap();
    let tables = store.list_tables().unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].id(), TableId(1));
}

#[test]
fn test_torn_tail_recovers_prefix() {
    let dir = TempDir::new().unwrap();
    {
        let store = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap();
        store.insert_table(4).unwrap();
    }
    let log_path = dir.path().join(LOG_FILE_NAME);
    let mut file = OpenOptions::new().append(true).open(&log_path).unwrap();
    file.write_all(b"0badc0de {\"op\":\"add_ta").unwrap();
    drop(file);

    let store = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap();
    assert_eq!(store.list_tables().unwrap().len(), 1);
    assert_eq!(store.insert_table(8).unwrap(), TableId(2));
}

#[test]
fn test_interior_corruption_fails_open() {
    let dir = TempDir::new().unwrap();
    {
        let store = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap();
        store.insert_table(4).unwrap();
        store.insert_table(8).unwrap();
    }
    let log_path = dir.path().join(LOG_FILE_NAME);
    let content = fs::read_to_string(&log_path).unwrap();
    fs::write(&log_path, content.replacen("\"capacity\":4", "\"capacity\":5", 1)).unwrap();

    let err = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap_err();
    assert!(matches!(err, StoreError::Corruption(_)));
}

#[test]
fn test_open_creates_missing_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = DurableStore::open(&nested, DurabilityMode::Strict).unwrap();
    assert_eq!(store.data_dir(), nested.as_path());
    assert!(nested.join(LOG_FILE_NAME).exists());
}

#[test]
fn test_second_open_of_live_directory_fails() {
    let dir = TempDir::new().unwrap();
    let first = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap();
    first.insert_table(4).unwrap();

    let err = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));

    // The rejected opener wrote nothing; the holder keeps working
    first.insert_table(8).unwrap();
    drop(first);

    let reopened = DurableStore::open(dir.path(), DurabilityMode::Strict).unwrap();
    assert_eq!(reopened.list_tables().unwrap().len(), 2);
}
