//! Bookable time slots
//!
//! A `SlotTime` is a wall-clock time of day at minute precision, written
//! `HH:MM`. The `SlotCatalog` is the configured, ordered set of times a
//! table can be booked at on any given date.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Slot times used when no configuration overrides them
pub const DEFAULT_SLOTS: [&str; 5] = ["12:00", "13:00", "14:00", "15:00", "16:00"];

const SLOT_FORMAT: &str = "%H:%M";

/// A bookable time of day (minute precision)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(NaiveTime);

impl SlotTime {
    /// Build from hour and minute
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(SlotTime)
    }

    /// Hour of day (0-23)
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Minute of hour (0-59)
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

impl FromStr for SlotTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), SLOT_FORMAT)
            .map(SlotTime)
            .map_err(|_| Error::invalid_input(format!("invalid time '{}', expected HH:MM", s)))
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(SLOT_FORMAT))
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Ordered, duplicate-free, non-empty set of bookable times
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalog {
    times: Vec<SlotTime>,
}

impl SlotCatalog {
    /// Create a catalog from times in the order they should be offered
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the list is empty or repeats a time.
    pub fn new(times: Vec<SlotTime>) -> Result<Self, Error> {
        if times.is_empty() {
            return Err(Error::invalid_input("slot catalog must not be empty"));
        }
        for (i, time) in times.iter().enumerate() {
            if times[..i].contains(time) {
                return Err(Error::invalid_input(format!("duplicate slot time {}", time)));
            }
        }
        Ok(SlotCatalog { times })
    }

    /// Parse `HH:MM` strings into a catalog
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, Error> {
        let times = raw
            .iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<SlotTime>, _>>()?;
        Self::new(times)
    }

    /// Whether `time` is bookable
    pub fn contains(&self, time: SlotTime) -> bool {
        self.times.contains(&time)
    }

    /// Times in catalog order
    pub fn iter(&self) -> impl Iterator<Item = SlotTime> + '_ {
        self.times.iter().copied()
    }

    /// Times as a slice
    pub fn as_slice(&self) -> &[SlotTime] {
        &self.times
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false for a constructed catalog
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

impl Default for SlotCatalog {
    fn default() -> Self {
        let times = DEFAULT_SLOTS
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        SlotCatalog { times }
    }
}
