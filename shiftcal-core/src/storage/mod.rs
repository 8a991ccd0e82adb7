//! Persistence of shift types and month schedules.
//!
//! Everything lives in a flat key-value store of JSON strings:
//! - `shiftTypes` holds the template list
//! - `scheduledShifts_YYYY-MM` holds one month's date → assignment map
//!
//! Stored values that fail to parse are never surfaced as errors. They are
//! logged and read as absent, so the caller falls back to defaults.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::constants::{MONTH_KEY_PREFIX, SHIFT_TYPES_KEY};
use crate::error::{ShiftError, ShiftResult};
use crate::month::YearMonth;
use crate::schedule::Assignment;
use crate::shift_type::ShiftType;

/// Date string → assignment, ordered by date.
pub type MonthEntries = BTreeMap<String, Assignment>;

/// An opaque string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> ShiftResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> ShiftResult<()>;
    fn remove(&mut self, key: &str) -> ShiftResult<()>;
    fn keys(&self) -> ShiftResult<Vec<String>>;
}

/// Typed access to the key-value store.
pub struct Storage {
    store: Box<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Storage {
            store: Box::new(store),
        }
    }

    /// Storage backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// The stored shift types, or None when nothing usable is stored.
    pub fn load_shift_types(&self) -> ShiftResult<Option<Vec<ShiftType>>> {
        self.read_json(SHIFT_TYPES_KEY)
    }

    pub fn save_shift_types(&mut self, types: &[ShiftType]) -> ShiftResult<()> {
        self.write_json(SHIFT_TYPES_KEY, &types)
    }

    /// Read a month's entries. Each entry is parsed on its own: one that is
    /// not an assignment object is logged and skipped, the rest are kept.
    pub fn load_month(&self, month: YearMonth) -> ShiftResult<MonthEntries> {
        let key = month.storage_key();
        let raw: BTreeMap<String, serde_json::Value> =
            self.read_json(&key)?.unwrap_or_default();

        let entries = raw
            .into_iter()
            .filter_map(|(date, value)| {
                match serde_json::from_value::<Assignment>(value) {
                    Ok(assignment) => Some((date, assignment)),
                    Err(e) => {
                        warn!(key = %key, date = %date, "Skipping unreadable entry: {e}");
                        None
                    }
                }
            })
            .collect();

        Ok(entries)
    }

    /// Write a month's entries. An empty month removes its key.
    pub fn save_month(&mut self, month: YearMonth, entries: &MonthEntries) -> ShiftResult<()> {
        let key = month.storage_key();
        if entries.is_empty() {
            debug!(key = %key, "Removing empty month");
            return self.store.remove(&key);
        }
        self.write_json(&key, entries)
    }

    /// Every month that has a stored schedule, in calendar order.
    pub fn stored_months(&self) -> ShiftResult<Vec<YearMonth>> {
        let mut months: Vec<YearMonth> = self
            .store
            .keys()?
            .iter()
            .filter(|key| key.starts_with(MONTH_KEY_PREFIX))
            .filter_map(|key| {
                let month = YearMonth::from_storage_key(key);
                if month.is_none() {
                    warn!(key = %key, "Ignoring schedule key with unreadable month");
                }
                month
            })
            .collect();

        months.sort();
        Ok(months)
    }

    /// Remove every month schedule and the shift type list.
    /// Returns the number of keys removed.
    pub fn clear_all(&mut self) -> ShiftResult<usize> {
        let mut removed = 0;

        for key in self.store.keys()? {
            if key.starts_with(MONTH_KEY_PREFIX) || key == SHIFT_TYPES_KEY {
                self.store.remove(&key)?;
                debug!(key = %key, "Removed");
                removed += 1;
            }
        }

        Ok(removed)
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> ShiftResult<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };

        match parse_stored(key, &raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("{e}. Falling back to defaults.");
                Ok(None)
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> ShiftResult<()> {
        let json =
            serde_json::to_string(value).map_err(|e| ShiftError::Serialization(e.to_string()))?;
        debug!(key = %key, bytes = json.len(), "Persisting");
        self.store.set(key, &json)
    }
}

fn parse_stored<T: DeserializeOwned>(key: &str, raw: &str) -> ShiftResult<T> {
    serde_json::from_str(raw).map_err(|e| ShiftError::MalformedPersistedData {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shift_type::default_shift_types;

    fn march() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    #[test]
    fn missing_keys_read_as_absent() {
        let storage = Storage::in_memory();
        assert!(storage.load_shift_types().unwrap().is_none());
        assert!(storage.load_month(march()).unwrap().is_empty());
    }

    #[test]
    fn shift_types_round_trip() {
        let mut storage = Storage::in_memory();
        storage.save_shift_types(&default_shift_types()).unwrap();
        assert_eq!(
            storage.load_shift_types().unwrap(),
            Some(default_shift_types())
        );
    }

    #[test]
    fn malformed_shift_types_fall_back() {
        let mut store = MemoryStore::default();
        store.set(SHIFT_TYPES_KEY, "{\"label\": \"not an array\"}").unwrap();
        let storage = Storage::new(store);
        assert!(storage.load_shift_types().unwrap().is_none());

        let mut store = MemoryStore::default();
        store.set(SHIFT_TYPES_KEY, "not json at all").unwrap();
        let storage = Storage::new(store);
        assert!(storage.load_shift_types().unwrap().is_none());
    }

    #[test]
    fn malformed_month_reads_empty() {
        let mut store = MemoryStore::default();
        store.set(&march().storage_key(), "[1, 2, 3]").unwrap();
        let storage = Storage::new(store);
        assert!(storage.load_month(march()).unwrap().is_empty());
    }

    #[test]
    fn unreadable_entries_do_not_hide_their_neighbours() {
        let mut store = MemoryStore::default();
        store
            .set(
                &march().storage_key(),
                r##"{
                    "2024-03-01": {"label": "Day", "color": "#add8e6", "startTime": "08:00", "endTime": "16:00"},
                    "2024-03-02": null,
                    "2024-03-03": "Night",
                    "2024-03-04": 7
                }"##,
            )
            .unwrap();
        let storage = Storage::new(store);

        let entries = storage.load_month(march()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries["2024-03-01"].label, "Day");
    }

    #[test]
    fn empty_month_removes_key() {
        let mut storage = Storage::in_memory();
        let mut entries = MonthEntries::new();
        entries.insert(
            "2024-03-15".into(),
            Assignment::from(&default_shift_types()[0]),
        );
        storage.save_month(march(), &entries).unwrap();
        assert_eq!(storage.stored_months().unwrap(), vec![march()]);

        storage.save_month(march(), &MonthEntries::new()).unwrap();
        assert!(storage.stored_months().unwrap().is_empty());
    }

    #[test]
    fn clear_all_only_touches_own_keys() {
        let mut store = MemoryStore::default();
        store.set("unrelated", "keep me").unwrap();
        let mut storage = Storage::new(store);

        storage.save_shift_types(&default_shift_types()).unwrap();
        let mut entries = MonthEntries::new();
        entries.insert(
            "2024-03-15".into(),
            Assignment::from(&default_shift_types()[0]),
        );
        storage.save_month(march(), &entries).unwrap();
        storage.save_month(march().next(), &entries).unwrap();

        assert_eq!(storage.clear_all().unwrap(), 3);
        assert!(storage.load_shift_types().unwrap().is_none());
        assert!(storage.stored_months().unwrap().is_empty());
        assert_eq!(
            storage.store.get("unrelated").unwrap().as_deref(),
            Some("keep me")
        );
    }
}
