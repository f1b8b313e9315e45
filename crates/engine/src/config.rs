//! Service configuration via `tablebook.toml`
//!
//! On first open, a default `tablebook.toml` is created in the data
//! directory. To change settings, edit the file and restart.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tablebook_core::{Error, Result, SlotCatalog, DEFAULT_SLOTS};
use tablebook_durability::DurabilityMode;

/// Config file name placed in the data directory.
pub const CONFIG_FILE_NAME: &str = "tablebook.toml";

/// Default audit log file name, relative to the data directory.
pub const DEFAULT_AUDIT_LOG: &str = "reservation_log.txt";

/// Configuration loaded from `tablebook.toml`.
///
/// # Example
///
/// ```toml
/// slots = ["12:00", "13:00", "14:00", "15:00", "16:00"]
/// durability = "strict"
/// audit_log = "reservation_log.txt"
/// tables = [4, 4, 8]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingConfig {
    /// Bookable times, `HH:MM`, in the order they are offered.
    #[serde(default = "default_slots")]
    pub slots: Vec<String>,
    /// Durability mode: `"strict"` or `"buffered"`.
    #[serde(default = "default_durability_str")]
    pub durability: String,
    /// Audit log file relative to the data directory; empty disables it.
    #[serde(default = "default_audit_log")]
    pub audit_log: String,
    /// Capacities used to seed the catalog when the store has no tables.
    #[serde(default = "default_tables")]
    pub tables: Vec<u32>,
}

fn default_slots() -> Vec<String> {
    DEFAULT_SLOTS.iter().map(|s| s.to_string()).collect()
}

fn default_durability_str() -> String {
    "strict".to_string()
}

fn default_audit_log() -> String {
    DEFAULT_AUDIT_LOG.to_string()
}

fn default_tables() -> Vec<u32> {
    vec![4, 8]
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slots: default_slots(),
            durability: default_durability_str(),
            audit_log: default_audit_log(),
            tables: default_tables(),
        }
    }
}

impl BookingConfig {
    /// Parse the slot list into a `SlotCatalog`.
    ///
    /// # Errors
    ///
    /// Returns `Config` if a slot is malformed, repeated, or the list is empty.
    pub fn slot_catalog(&self) -> Result<SlotCatalog> {
        SlotCatalog::parse(&self.slots)
            .map_err(|e| Error::config(format!("invalid slots in {}: {}", CONFIG_FILE_NAME, e)))
    }

    /// Parse the durability string into a `DurabilityMode`.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the string is not `"strict"` or `"buffered"`.
    pub fn durability_mode(&self) -> Result<DurabilityMode> {
        self.durability
            .parse()
            .map_err(|e| Error::config(format!("{} in {}", e, CONFIG_FILE_NAME)))
    }

    /// Absolute audit log path, if auditing to a file is enabled.
    pub fn audit_path(&self, data_dir: &Path) -> Option<PathBuf> {
        let name = self.audit_log.trim();
        (!name.is_empty()).then(|| data_dir.join(name))
    }

    /// Check every field eagerly.
    pub fn validate(&self) -> Result<()> {
        self.slot_catalog()?;
        self.durability_mode()?;
        if let Some(capacity) = self.tables.iter().find(|&&c| c == 0) {
            return Err(Error::config(format!(
                "table capacity {} in {} must be positive",
                capacity, CONFIG_FILE_NAME
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Tablebook configuration
#
# Bookable times, in the order they are offered.
slots = ["12:00", "13:00", "14:00", "15:00", "16:00"]

# Durability mode: "strict" (default) or "buffered"
#   "strict"   = fsync every write, zero data loss
#   "buffered" = flush to the OS only, a machine crash may lose recent writes
durability = "strict"

# Audit log, relative to the data directory. Empty string disables it.
audit_log = "reservation_log.txt"

# Table capacities used to seed an empty store, in catalog order.
# Smaller tables first: allocation is first-fit in this order.
tables = [4, 8]
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: BookingConfig = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Load `tablebook.toml` from `data_dir`, creating it first if missing.
    pub fn load_or_init(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let path = data_dir.join(CONFIG_FILE_NAME);
        Self::write_default_if_missing(&path)?;
        Self::from_file(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_strict_with_five_slots() {
        let config = BookingConfig::default();
        assert_eq!(config.durability_mode().unwrap(), DurabilityMode::Strict);
        assert_eq!(config.slot_catalog().unwrap().len(), 5);
        assert_eq!(config.tables, vec![4, 8]);
    }

    #[test]
    fn default_toml_matches_default_struct() {
        let parsed: BookingConfig = toml::from_str(BookingConfig::default_toml()).unwrap();
        assert_eq!(parsed, BookingConfig::default());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: BookingConfig = toml::from_str("durability = \"buffered\"").unwrap();
        assert_eq!(config.durability_mode().unwrap(), DurabilityMode::Buffered);
        assert_eq!(config.slots, default_slots());
    }

    #[test]
    fn custom_slots() {
        let config: BookingConfig = toml::from_str("slots = [\"18:00\", \"19:30\"]").unwrap();
        let catalog = config.slot_catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("19:30".parse().unwrap()));
    }

    #[test]
    fn bad_values_rejected() {
        let bad_slot: BookingConfig = toml::from_str("slots = [\"lunch\"]").unwrap();
        assert!(matches!(bad_slot.validate(), Err(Error::Config(_))));

        let bad_mode: BookingConfig = toml::from_str("durability = \"always\"").unwrap();
        assert!(matches!(bad_mode.validate(), Err(Error::Config(_))));

        let bad_table: BookingConfig = toml::from_str("tables = [4, 0]").unwrap();
        assert!(matches!(bad_table.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn empty_audit_log_disables_file() {
        let dir = TempDir::new().unwrap();
        let config: BookingConfig = toml::from_str("audit_log = \"\"").unwrap();
        assert!(config.audit_path(dir.path()).is_none());
        let default = BookingConfig::default();
        assert_eq!(
            default.audit_path(dir.path()).unwrap(),
            dir.path().join(DEFAULT_AUDIT_LOG)
        );
    }

    #[test]
    fn load_or_init_creates_file() {
        let dir = TempDir::new().unwrap();
        let config = BookingConfig::load_or_init(dir.path()).unwrap();
        assert_eq!(config, BookingConfig::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "slots = [\"11:00\"]\ntables = [2, 6]\n",
        )
        .unwrap();
        let edited = BookingConfig::load_or_init(dir.path()).unwrap();
        assert_eq!(edited.tables, vec![2, 6]);
        assert_eq!(edited.slots, vec!["11:00".to_string()]);
    }

    #[test]
    fn unparsable_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "slots = 12").unwrap();
        assert!(matches!(
            BookingConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }
}
