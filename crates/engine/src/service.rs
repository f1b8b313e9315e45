//! Reservation service
//!
//! The facade the front end talks to. Opening a service:
//!
//! ```text
//! 1. load tablebook.toml (durable mode only)
//! 2. open the store
//! 3. seed the configured tables if the store has none
//! 4. load the table catalog
//! 5. rebuild the registry from the store's reservations
//! ```
//!
//! After startup the registry and store only change together, inside the
//! allocator's lock.

use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;

use tablebook_core::{
    Customer, Reservation, ReservationId, ReservationStore, Result, SlotCatalog, SlotTime,
    StoreError, Table,
};
use tablebook_durability::DurableStore;
use tablebook_storage::MemoryStore;
use tracing::{info, warn};

use crate::allocator::Allocator;
use crate::audit::{AuditSink, FileAuditLog, NoopAudit, TracingAudit};
use crate::availability::AvailabilityIndex;
use crate::catalog::TableCatalog;
use crate::config::BookingConfig;
use crate::registry::ReservationRegistry;
use crate::report::{SlotReport, TableSlots};

/// Table reservations over a store
pub struct ReservationService {
    catalog: Arc<TableCatalog>,
    availability: AvailabilityIndex,
    registry: Arc<ReservationRegistry>,
    allocator: Allocator,
    audit: Arc<dyn AuditSink>,
}

impl ReservationService {
    /// Open a durable service in `data_dir`
    ///
    /// Creates the directory and a default `tablebook.toml` on first use.
    ///
    /// # Errors
    ///
    /// `Config` for a bad config file, `Store` if the log cannot be opened
    /// or replayed.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let config = BookingConfig::load_or_init(data_dir)?;
        let store = DurableStore::open(data_dir, config.durability_mode()?)?;
        let audit: Arc<dyn AuditSink> = match config.audit_path(data_dir) {
            Some(path) => Arc::new(FileAuditLog::new(path)),
            None => Arc::new(NoopAudit),
        };
        Self::with_store(Arc::new(store), &config, audit)
    }

    /// In-memory service with the default configuration
    pub fn ephemeral() -> Result<Self> {
        Self::with_store(
            Arc::new(MemoryStore::new()),
            &BookingConfig::default(),
            Arc::new(TracingAudit),
        )
    }

    /// Build a service over an existing store
    ///
    /// # Errors
    ///
    /// Fails if the config is invalid, the store cannot be read, or a
    /// persisted reservation names a table the store does not list.
    pub fn with_store(
        store: Arc<dyn ReservationStore>,
        config: &BookingConfig,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self> {
        config.validate()?;
        let slots = config.slot_catalog()?;

        if store.list_tables()?.is_empty() {
            for &capacity in &config.tables {
                store.insert_table(capacity)?;
            }
            info!(tables = config.tables.len(), "Seeded table catalog");
        }

        let catalog = Arc::new(TableCatalog::load(&*store)?);
        let registry = Arc::new(Self::rebuild_registry(&*store, &catalog)?);
        let availability = AvailabilityIndex::new(store.clone(), slots);
        let allocator = Allocator::new(
            store,
            catalog.clone(),
            availability.clone(),
            registry.clone(),
        );

        info!(
            tables = catalog.len(),
            reservations = registry.len(),
            "Reservation service ready"
        );

        Ok(ReservationService {
            catalog,
            availability,
            registry,
            allocator,
            audit,
        })
    }

    fn rebuild_registry(
        store: &dyn ReservationStore,
        catalog: &TableCatalog,
    ) -> Result<ReservationRegistry> {
        let mut reservations = Vec::new();
        for record in store.list_reservations()? {
            let table = catalog.get(record.table_id).ok_or_else(|| {
                StoreError::Corruption(format!(
                    "reservation {} references unknown table {}",
                    record.id, record.table_id
                ))
            })?;
            let customer = Customer::new(&record.customer_name).map_err(|_| {
                StoreError::Corruption(format!("reservation {} has no customer name", record.id))
            })?;
            reservations.push(Reservation::new(
                record.id,
                customer,
                *table,
                record.date,
                record.time,
            ));
        }
        Ok(ReservationRegistry::rebuild(reservations))
    }

    /// Book a table for `customer_name`'s party
    ///
    /// # Errors
    ///
    /// `InvalidInput`, `NoTableAvailable` or `Store`; see
    /// [`Allocator::create_reservation`].
    pub fn create_reservation(
        &self,
        customer_name: &str,
        party_size: u32,
        date: NaiveDate,
        time: SlotTime,
    ) -> Result<Reservation> {
        let customer = Customer::new(customer_name)?;
        let reservation = self
            .allocator
            .create_reservation(&customer, party_size, date, time)?;

        if let Err(e) = self.audit.record(&reservation) {
            warn!(
                reservation_id = %reservation.id(),
                error = %e,
                "Audit record failed; reservation kept"
            );
        }
        Ok(reservation)
    }

    /// Live reservation by id
    pub fn get_reservation_by_id(&self, id: ReservationId) -> Option<Reservation> {
        self.registry.get(id)
    }

    /// Cancel a reservation; false if it was not live
    pub fn cancel_reservation(&self, id: ReservationId) -> Result<bool> {
        self.allocator.cancel_reservation(id)
    }

    /// Free times of every table on `date`
    pub fn available_slots(&self, date: NaiveDate) -> Result<SlotReport> {
        let tables = self
            .catalog
            .iter()
            .map(|table| -> Result<TableSlots> {
                Ok(TableSlots {
                    table: *table,
                    available: self.availability.available_times(table, date)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(SlotReport { date, tables })
    }

    /// Human-readable availability for `date`
    pub fn show_available_slots(&self, date: NaiveDate) -> Result<String> {
        Ok(self.available_slots(date)?.to_string())
    }

    /// Tables in catalog order
    pub fn tables(&self) -> &[Table] {
        self.catalog.tables()
    }

    /// Configured bookable times
    pub fn slots(&self) -> &SlotCatalog {
        self.availability.slots()
    }

    /// Every live reservation, ordered by id
    pub fn reservations(&self) -> Vec<Reservation> {
        self.registry.all()
    }
}

impl std::fmt::Debug for ReservationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationService")
            .field("tables", &self.catalog.len())
            .field("slots", &self.availability.slots().len())
            .field("reservations", &self.registry.len())
            .finish()
    }
}
