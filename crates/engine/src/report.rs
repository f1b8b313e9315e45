//! Available-slot report
//!
//! What `show_available_slots` renders: for one date, every catalog table
//! with its free times.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use tablebook_core::{SlotTime, Table};

/// Free times of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSlots {
    /// The table
    pub table: Table,
    /// Free times in catalog order
    pub available: Vec<SlotTime>,
}

/// Free times of every table on a date, in catalog order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotReport {
    /// Reported date
    pub date: NaiveDate,
    /// One entry per catalog table
    pub tables: Vec<TableSlots>,
}

impl SlotReport {
    /// Free times for one table, if it is in the report
    pub fn for_table(&self, table: &Table) -> Option<&[SlotTime]> {
        self.tables
            .iter()
            .find(|entry| entry.table.id() == table.id())
            .map(|entry| entry.available.as_slice())
    }

    /// Total free (table, time) pairs
    pub fn free_slots(&self) -> usize {
        self.tables.iter().map(|entry| entry.available.len()).sum()
    }
}

impl fmt::Display for SlotReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Available slots on {}:", self.date)?;
        for entry in &self.tables {
            writeln!(
                f,
                "Table ID {} (seats {}) - Available Times:",
                entry.table.id(),
                entry.table.capacity()
            )?;
            if entry.available.is_empty() {
                writeln!(f, "  No available slots for this table on {}", self.date)?;
            }
            for time in &entry.available {
                writeln!(f, "  {}", time)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablebook_core::TableId;

    #[test]
    fn test_render() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let report = SlotReport {
            date,
            tables: vec![
                TableSlots {
                    table: Table::small(TableId(1)),
                    available: vec!["12:00".parse().unwrap(), "14:00".parse().unwrap()],
                },
                TableSlots {
                    table: Table::large(TableId(2)),
                    available: vec![],
                },
            ],
        };
        let expected = "\
Available slots on 2025-05-01:
Table ID 1 (seats 4) - Available Times:
  12:00
  14:00
Table ID 2 (seats 8) - Available Times:
  No available slots for this table on 2025-05-01
";
        assert_eq!(report.to_string(), expected);
        assert_eq!(report.free_slots(), 2);
        assert_eq!(
            report.for_table(&Table::large(TableId(2))).unwrap().len(),
            0
        );
    }
}
