//! Durability modes

use std::fmt;
use std::str::FromStr;

/// Controls when appended records are forced to disk
///
/// # Modes
///
/// - `Strict` - fsync after every record (DEFAULT)
/// - `Buffered` - flush to the OS after every record, no fsync; a machine
///   crash may lose the most recent records, a process crash does not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    /// fsync after every record
    #[default]
    Strict,
    /// flush only
    Buffered,
}

impl DurabilityMode {
    /// Whether each append must be fsynced
    pub fn requires_fsync(&self) -> bool {
        matches!(self, DurabilityMode::Strict)
    }
}

impl FromStr for DurabilityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(DurabilityMode::Strict),
            "buffered" => Ok(DurabilityMode::Buffered),
            other => Err(format!(
                "invalid durability mode '{}', expected \"strict\" or \"buffered\"",
                other
            )),
        }
    }
}

impl fmt::Display for DurabilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurabilityMode::Strict => write!(f, "strict"),
            DurabilityMode::Buffered => write!(f, "buffered"),
        }
    }
}
