//! Shifts placed on calendar days, one month at a time.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ShiftError, ShiftResult};
use crate::month::{YearMonth, parse_date};
use crate::shift_type::ShiftType;
use crate::storage::{MonthEntries, Storage};

/// A shift placed on a date. This is a copy of the template's fields at
/// placement time; later edits to the template do not reach it.
///
/// Fields default to empty when missing from stored data so that the
/// exporter can skip incomplete entries instead of failing to load them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assignment {
    pub label: String,
    pub color: String,
    pub start_time: String,
    pub end_time: String,
}

impl Assignment {
    /// Whether the fields required for export are present.
    pub fn is_complete(&self) -> bool {
        !self.label.is_empty() && !self.start_time.is_empty() && !self.end_time.is_empty()
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end_time < self.start_time
    }

    pub fn display_label(&self) -> String {
        format!("{} ({}-{})", self.label, self.start_time, self.end_time)
    }
}

impl From<&ShiftType> for Assignment {
    fn from(shift_type: &ShiftType) -> Self {
        Assignment {
            label: shift_type.label.clone(),
            color: shift_type.color.clone(),
            start_time: shift_type.start_time.clone(),
            end_time: shift_type.end_time.clone(),
        }
    }
}

/// The assignments of the visible month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSchedule {
    month: YearMonth,
    entries: MonthEntries,
}

impl MonthSchedule {
    pub fn empty(month: YearMonth) -> Self {
        MonthSchedule {
            month,
            entries: MonthEntries::new(),
        }
    }

    /// Read a month from storage. Entries stored under the month's key but
    /// dated outside it are dropped.
    pub fn load(storage: &Storage, month: YearMonth) -> ShiftResult<Self> {
        let mut entries = storage.load_month(month)?;

        entries.retain(|date, _| {
            let belongs = parse_date(date).is_some_and(|d| month.contains(d));
            if !belongs {
                warn!(month = %month, date = %date, "Dropping entry outside its month");
            }
            belongs
        });

        debug!(month = %month, count = entries.len(), "Loaded month");
        Ok(MonthSchedule { month, entries })
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    pub fn entries(&self) -> &MonthEntries {
        &self.entries
    }

    pub fn get(&self, date: &str) -> Option<&Assignment> {
        self.entries.get(date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Assign `assignment` to `date`, replacing whatever was there.
    pub fn place(
        &mut self,
        storage: &mut Storage,
        date: &str,
        assignment: Assignment,
    ) -> ShiftResult<()> {
        let day = parse_date(date).ok_or_else(|| {
            ShiftError::Validation(format!("Invalid date '{date}'. Expected YYYY-MM-DD"))
        })?;

        if !self.month.contains(day) {
            return Err(ShiftError::Validation(format!(
                "{date} is not in {}",
                self.month
            )));
        }

        let mut entries = self.entries.clone();
        entries.insert(date.to_string(), assignment);
        self.commit(storage, entries)
    }

    /// Clear `date`. Returns the removed assignment, if there was one.
    pub fn remove(&mut self, storage: &mut Storage, date: &str) -> ShiftResult<Option<Assignment>> {
        if !self.entries.contains_key(date) {
            return Ok(None);
        }

        let mut entries = self.entries.clone();
        let removed = entries.remove(date);
        self.commit(storage, entries)?;
        Ok(removed)
    }

    /// Drop the in-memory entries without touching storage.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    fn commit(&mut self, storage: &mut Storage, entries: MonthEntries) -> ShiftResult<()> {
        storage.save_month(self.month, &entries)?;
        self.entries = entries;
        Ok(())
    }
}

/// Every stored assignment across all months. Later months win if two
/// months claim the same date.
pub fn export_all(storage: &Storage) -> ShiftResult<MonthEntries> {
    let mut all = MonthEntries::new();

    for month in storage.stored_months()? {
        let entries = storage.load_month(month)?;
        debug!(month = %month, count = entries.len(), "Collected month for export");
        all.extend(entries);
    }

    debug!(total = all.len(), "Collected all stored shifts");
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shift_type::default_shift_types;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn march() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    fn day_shift() -> Assignment {
        Assignment::from(&default_shift_types()[0])
    }

    fn night_shift() -> Assignment {
        Assignment::from(&default_shift_types()[1])
    }

    #[test]
    fn place_is_idempotent() {
        let mut storage = Storage::in_memory();
        let mut schedule = MonthSchedule::load(&storage, march()).unwrap();

        schedule.place(&mut storage, "2024-03-15", day_shift()).unwrap();
        schedule.place(&mut storage, "2024-03-15", day_shift()).unwrap();

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.get("2024-03-15"), Some(&day_shift()));
    }

    #[test]
    fn place_overwrites() {
        let mut storage = Storage::in_memory();
        let mut schedule = MonthSchedule::load(&storage, march()).unwrap();

        schedule.place(&mut storage, "2024-03-15", day_shift()).unwrap();
        schedule.place(&mut storage, "2024-03-15", night_shift()).unwrap();

        assert_eq!(schedule.get("2024-03-15"), Some(&night_shift()));
        let reloaded = MonthSchedule::load(&storage, march()).unwrap();
        assert_eq!(reloaded, schedule);
    }

    #[test]
    fn place_rejects_other_months_and_bad_dates() {
        let mut storage = Storage::in_memory();
        let mut schedule = MonthSchedule::load(&storage, march()).unwrap();

        assert!(matches!(
            schedule.place(&mut storage, "2024-04-01", day_shift()),
            Err(ShiftError::Validation(_))
        ));
        assert!(matches!(
            schedule.place(&mut storage, "15/03/2024", day_shift()),
            Err(ShiftError::Validation(_))
        ));
        assert!(schedule.is_empty());
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut storage = Storage::in_memory();
        let mut schedule = MonthSchedule::load(&storage, march()).unwrap();
        assert_eq!(schedule.remove(&mut storage, "2024-03-01").unwrap(), None);

        schedule.place(&mut storage, "2024-03-01", day_shift()).unwrap();
        assert_eq!(
            schedule.remove(&mut storage, "2024-03-01").unwrap(),
            Some(day_shift())
        );
        assert!(MonthSchedule::load(&storage, march()).unwrap().is_empty());
    }

    #[test]
    fn snapshot_survives_template_changes() {
        let mut storage = Storage::in_memory();
        let mut schedule = MonthSchedule::load(&storage, march()).unwrap();

        let mut template = default_shift_types().remove(0);
        schedule
            .place(&mut storage, "2024-03-15", Assignment::from(&template))
            .unwrap();
        template.start_time = "09:00".into();

        assert_eq!(schedule.get("2024-03-15").unwrap().start_time, "08:00");
    }

    #[test]
    fn load_drops_foreign_dates() {
        let mut store = MemoryStore::default();
        store
            .set(
                &march().storage_key(),
                r##"{"2024-03-02":{"label":"Day","color":"#add8e6","startTime":"08:00","endTime":"16:00"},
                    "2024-04-02":{"label":"Day","color":"#add8e6","startTime":"08:00","endTime":"16:00"}}"##,
            )
            .unwrap();
        let storage = Storage::new(store);

        let schedule = MonthSchedule::load(&storage, march()).unwrap();
        assert_eq!(schedule.len(), 1);
        assert!(schedule.get("2024-03-02").is_some());
    }

    #[test]
    fn incomplete_entries_load_with_empty_fields() {
        let mut store = MemoryStore::default();
        store
            .set(&march().storage_key(), r#"{"2024-03-02":{"label":"Day"}}"#)
            .unwrap();
        let storage = Storage::new(store);

        let schedule = MonthSchedule::load(&storage, march()).unwrap();
        let entry = schedule.get("2024-03-02").unwrap();
        assert!(!entry.is_complete());
    }

    #[test]
    fn placing_next_to_a_null_entry_keeps_stored_shifts() {
        let mut store = MemoryStore::default();
        store
            .set(
                &march().storage_key(),
                r##"{"2024-03-01":{"label":"Day","color":"#add8e6","startTime":"08:00","endTime":"16:00"},
                    "2024-03-02":null}"##,
            )
            .unwrap();
        let mut storage = Storage::new(store);

        let mut schedule = MonthSchedule::load(&storage, march()).unwrap();
        assert_eq!(schedule.len(), 1);

        schedule.place(&mut storage, "2024-03-05", night_shift()).unwrap();

        let reloaded = MonthSchedule::load(&storage, march()).unwrap();
        assert_eq!(reloaded.get("2024-03-01"), Some(&day_shift()));
        assert_eq!(reloaded.get("2024-03-05"), Some(&night_shift()));
        assert_eq!(export_all(&storage).unwrap().len(), 2);
    }

    #[test]
    fn export_all_unions_months() {
        let mut storage = Storage::in_memory();

        let mut feb = MonthSchedule::load(&storage, march().prev()).unwrap();
        feb.place(&mut storage, "2024-02-29", night_shift()).unwrap();
        let mut mar = MonthSchedule::load(&storage, march()).unwrap();
        mar.place(&mut storage, "2024-03-01", day_shift()).unwrap();

        let all = export_all(&storage).unwrap();
        let dates: Vec<&str> = all.keys().map(String::as_str).collect();
        assert_eq!(dates, vec!["2024-02-29", "2024-03-01"]);
    }
}
