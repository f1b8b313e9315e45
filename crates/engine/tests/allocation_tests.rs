//! Allocation behaviour of the reservation service
//!
//! Catalog used throughout: [Table 1 (seats 4), Table 2 (seats 8)].

use chrono::NaiveDate;
use std::sync::Arc;

use tablebook_core::{Error, ReservationId, ReservationStore, SlotTime, TableId};
use tablebook_engine::{
    AuditSink, BookingConfig, NoopAudit, ReservationService, TracingAudit,
};
use tablebook_engine::audit::AuditError;
use tablebook_storage::testing::{FaultyStore, StoreOp};
use tablebook_storage::MemoryStore;

// ============================================================================
// Test Helpers
// ============================================================================

fn may_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
}

fn at(time: &str) -> SlotTime {
    time.parse().unwrap()
}

fn two_table_service() -> ReservationService {
    ReservationService::with_store(
        Arc::new(MemoryStore::new()),
        &BookingConfig::default(),
        Arc::new(NoopAudit),
    )
    .unwrap()
}

struct BrokenAudit;

impl AuditSink for BrokenAudit {
    fn record(&self, _reservation: &tablebook_core::Reservation) -> Result<(), AuditError> {
        Err(AuditError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_three_identical_requests_fill_then_fail() {
    let service = two_table_service();

    let first = service
        .create_reservation("Ada", 4, may_first(), at("12:00"))
        .unwrap();
    assert_eq!(first.table().id(), TableId(1));

    let second = service
        .create_reservation("Ada", 4, may_first(), at("12:00"))
        .unwrap();
    assert_eq!(second.table().id(), TableId(2));

    let third = service.create_reservation("Ada", 4, may_first(), at("12:00"));
    assert!(matches!(third, Err(Error::NoTableAvailable { .. })));
}

#[test]
fn test_party_larger_than_every_table_fails() {
    let service = two_table_service();
    let err = service
        .create_reservation("Grace", 10, may_first(), at("12:00"))
        .unwrap_err();
    assert!(matches!(err, Error::NoTableAvailable { party_size: 10, .. }));
    assert!(err.is_business_failure());
}

#[test]
fn test_capacity_equal_to_party_is_accepted() {
    let service = two_table_service();
    let r = service
        .create_reservation("Grace", 8, may_first(), at("12:00"))
        .unwrap();
    assert_eq!(r.table().id(), TableId(2));
    assert!(r.table().capacity() >= 8);
}

#[test]
fn test_first_fit_prefers_catalog_order_not_best_fit() {
    let service = ReservationService::with_store(
        Arc::new(MemoryStore::new()),
        &BookingConfig {
            tables: vec![8, 4],
            ..BookingConfig::default()
        },
        Arc::new(NoopAudit),
    )
    .unwrap();
    let r = service
        .create_reservation("Ada", 2, may_first(), at("12:00"))
        .unwrap();
    assert_eq!(r.table().capacity(), 8);
}

#[test]
fn test_same_smallest_table_then_different_table() {
    let service = two_table_service();
    let a = service
        .create_reservation("Ada", 2, may_first(), at("14:00"))
        .unwrap();
    let b = service
        .create_reservation("Grace", 3, may_first(), at("14:00"))
        .unwrap();
    assert_eq!(a.table().id(), TableId(1));
    assert_ne!(b.table().id(), a.table().id());
}

#[test]
fn test_different_times_reuse_the_same_table() {
    let service = two_table_service();
    let a = service
        .create_reservation("Ada", 4, may_first(), at("12:00"))
        .unwrap();
    let b = service
        .create_reservation("Ada", 4, may_first(), at("13:00"))
        .unwrap();
    assert_eq!(a.table().id(), b.table().id());
}

#[test]
fn test_ids_start_at_one_and_increase() {
    let service = two_table_service();
    let a = service
        .create_reservation("Ada", 2, may_first(), at("12:00"))
        .unwrap();
    let b = service
        .create_reservation("Ada", 2, may_first(), at("13:00"))
        .unwrap();
    assert_eq!(a.id(), ReservationId(1));
    assert_eq!(b.id(), ReservationId(2));
}

// ============================================================================
// Lookup and cancellation
// ============================================================================

#[test]
fn test_round_trip_lookup() {
    let service = two_table_service();
    let created = service
        .create_reservation("Ada Lovelace", 3, may_first(), at("15:00"))
        .unwrap();
    let found = service.get_reservation_by_id(created.id()).unwrap();
    assert_eq!(found.customer().name(), "Ada Lovelace");
    assert_eq!(found.table().id(), created.table().id());
    assert_eq!(found.date(), may_first());
    assert_eq!(found.time(), at("15:00"));
}

#[test]
fn test_lookup_unknown_is_none() {
    let service = two_table_service();
    assert!(service.get_reservation_by_id(ReservationId(42)).is_none());
}

#[test]
fn test_cancel_twice_and_unknown() {
    let service = two_table_service();
    let r = service
        .create_reservation("Ada", 2, may_first(), at("12:00"))
        .unwrap();

    assert!(service.cancel_reservation(r.id()).unwrap());
    assert!(!service.cancel_reservation(r.id()).unwrap());
    assert!(!service.cancel_reservation(ReservationId(999)).unwrap());
    assert!(service.get_reservation_by_id(r.id()).is_none());
    assert!(service.reservations().is_empty());
}

#[test]
fn test_cancel_frees_the_slot() {
    let service = two_table_service();
    let r = service
        .create_reservation("Ada", 4, may_first(), at("12:00"))
        .unwrap();
    service.cancel_reservation(r.id()).unwrap();
    let again = service
        .create_reservation("Grace", 4, may_first(), at("12:00"))
        .unwrap();
    assert_eq!(again.table().id(), TableId(1));
    assert_ne!(again.id(), r.id());
}

// ============================================================================
// Availability reporting
// ============================================================================

#[test]
fn test_available_times_exclude_booking() {
    let service = two_table_service();
    service
        .create_reservation("Ada", 2, may_first(), at("13:00"))
        .unwrap();

    let report = service.available_slots(may_first()).unwrap();
    let table_one = service.tables()[0];
    let free: Vec<String> = report
        .for_table(&table_one)
        .unwrap()
        .iter()
        .map(|t| t.to_string())
        .collect();
    assert_eq!(free, vec!["12:00", "14:00", "15:00", "16:00"]);
    assert_eq!(report.for_table(&service.tables()[1]).unwrap().len(), 5);
}

#[test]
fn test_show_available_slots_renders_full_table() {
    let service = two_table_service();
    for time in ["12:00", "13:00", "14:00", "15:00", "16:00"] {
        service
            .create_reservation("Ada", 2, may_first(), at(time))
            .unwrap();
    }
    let text = service.show_available_slots(may_first()).unwrap();
    assert!(text.starts_with("Available slots on 2025-05-01:"));
    assert!(text.contains("Table ID 1 (seats 4) - Available Times:\n  No available slots"));
    assert!(text.contains("Table ID 2 (seats 8) - Available Times:\n  12:00"));
}

// ============================================================================
// Input validation
// ============================================================================

#[test]
fn test_invalid_inputs() {
    let service = two_table_service();
    assert!(matches!(
        service.create_reservation("  ", 2, may_first(), at("12:00")),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        service.create_reservation("Ada", 0, may_first(), at("12:00")),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        service.create_reservation("Ada", 2, may_first(), at("09:00")),
        Err(Error::InvalidInput(_))
    ));
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_store_failure_surfaces_and_leaves_no_trace() {
    let store = Arc::new(FaultyStore::new(MemoryStore::new()));
    let service = ReservationService::with_store(
        store.clone(),
        &BookingConfig::default(),
        Arc::new(NoopAudit),
    )
    .unwrap();

    store.fail(StoreOp::InsertReservation);
    let err = service
        .create_reservation("Ada", 2, may_first(), at("12:00"))
        .unwrap_err();
    assert!(err.is_store_failure());
    assert!(service.reservations().is_empty());
    assert!(store.inner().list_reservations().unwrap().is_empty());
}

#[test]
fn test_catalog_load_failure_is_fatal() {
    let store = Arc::new(FaultyStore::new(MemoryStore::with_tables(&[4]).unwrap()));
    store.fail(StoreOp::ListTables);
    let result = ReservationService::with_store(
        store,
        &BookingConfig::default(),
        Arc::new(NoopAudit),
    );
    assert!(matches!(result, Err(Error::Store(_))));
}

#[test]
fn test_audit_failure_does_not_fail_reservation() {
    let service = ReservationService::with_store(
        Arc::new(MemoryStore::new()),
        &BookingConfig::default(),
        Arc::new(BrokenAudit),
    )
    .unwrap();
    let r = service
        .create_reservation("Ada", 2, may_first(), at("12:00"))
        .unwrap();
    assert!(service.get_reservation_by_id(r.id()).is_some());
}

#[test]
fn test_tracing_audit_service() {
    let service = ReservationService::with_store(
        Arc::new(MemoryStore::new()),
        &BookingConfig::default(),
        Arc::new(TracingAudit),
    )
    .unwrap();
    assert!(service
        .create_reservation("Ada", 2, may_first(), at("12:00"))
        .is_ok());
}

#[test]
fn test_existing_tables_are_not_reseeded() {
    let store = Arc::new(MemoryStore::with_tables(&[2, 2, 6]).unwrap());
    let service =
        ReservationService::with_store(store, &BookingConfig::default(), Arc::new(NoopAudit))
            .unwrap();
    let caps: Vec<u32> = service.tables().iter().map(|t| t.capacity()).collect();
    assert_eq!(caps, vec![2, 2, 6]);
}

#[test]
fn test_ephemeral_uses_defaults() {
    let service = ReservationService::ephemeral().unwrap();
    assert_eq!(service.tables().len(), 2);
    assert_eq!(service.slots().len(), 5);
}
