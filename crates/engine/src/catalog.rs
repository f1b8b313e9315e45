//! Table catalog
//!
//! Loaded once from the store at startup and read-only afterwards. The load
//! order (ascending table id) is the catalog order the allocator scans in.

use tablebook_core::{ReservationStore, Result, Table, TableId};
use tracing::debug;

/// Immutable, ordered set of bookable tables
#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    tables: Vec<Table>,
}

impl TableCatalog {
    /// Load every table from the store
    ///
    /// # Errors
    ///
    /// Propagates the store failure; a service cannot start without its
    /// table inventory.
    pub fn load<S: ReservationStore + ?Sized>(store: &S) -> Result<Self> {
        let tables = store.list_tables()?;
        debug!(tables = tables.len(), "Loaded table catalog");
        Ok(TableCatalog { tables })
    }

    /// Build a catalog directly, keeping the given order
    pub fn from_tables(tables: Vec<Table>) -> Self {
        TableCatalog { tables }
    }

    /// Tables in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// Tables as a slice
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Look up a table by id
    pub fn get(&self, id: TableId) -> Option<&Table> {
        self.tables.iter().find(|t| t.id() == id)
    }

    /// Largest capacity in the catalog, 0 if empty
    pub fn max_capacity(&self) -> u32 {
        self.tables.iter().map(Table::capacity).max().unwrap_or(0)
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the catalog has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
