//! The ordered list of shift type templates.

use tracing::debug;

use crate::error::{ShiftError, ShiftResult};
use crate::shift_type::{ShiftType, ShiftTypePatch, default_shift_types};
use crate::storage::Storage;

/// Shift types in insertion order. Labels are unique, compared
/// case-insensitively.
///
/// Every mutation persists the new list before committing it in memory,
/// so a failed write leaves the registry unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftTypeRegistry {
    types: Vec<ShiftType>,
}

impl Default for ShiftTypeRegistry {
    fn default() -> Self {
        ShiftTypeRegistry {
            types: default_shift_types(),
        }
    }
}

impl ShiftTypeRegistry {
    /// Load the stored list, seeding the defaults when none is stored.
    pub fn load(storage: &Storage) -> ShiftResult<Self> {
        match storage.load_shift_types()? {
            Some(types) => Ok(ShiftTypeRegistry { types }),
            None => {
                debug!("No stored shift types, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn list(&self) -> &[ShiftType] {
        &self.types
    }

    /// Exact-label lookup.
    pub fn get(&self, label: &str) -> Option<&ShiftType> {
        self.types.iter().find(|t| t.label == label)
    }

    pub fn add(&mut self, storage: &mut Storage, mut shift_type: ShiftType) -> ShiftResult<()> {
        shift_type.validate()?;

        if self.types.iter().any(|t| t.has_label(&shift_type.label)) {
            return Err(ShiftError::DuplicateLabel(shift_type.label));
        }

        let mut types = self.types.clone();
        types.push(shift_type);
        self.commit(storage, types)
    }

    /// Edit color and times of the type labelled exactly `label`.
    /// Returns the updated type.
    pub fn update(
        &mut self,
        storage: &mut Storage,
        label: &str,
        patch: ShiftTypePatch,
    ) -> ShiftResult<ShiftType> {
        let index = self.index_of(label)?;

        let mut types = self.types.clone();
        types[index].apply(patch)?;
        let updated = types[index].clone();

        self.commit(storage, types)?;
        Ok(updated)
    }

    /// Returns the removed type.
    pub fn delete(&mut self, storage: &mut Storage, label: &str) -> ShiftResult<ShiftType> {
        let index = self.index_of(label)?;

        let mut types = self.types.clone();
        let removed = types.remove(index);

        self.commit(storage, types)?;
        Ok(removed)
    }

    /// Back to the built-in templates, in memory only. The next mutation
    /// persists them.
    pub fn reset_to_defaults(&mut self) {
        self.types = default_shift_types();
    }

    fn index_of(&self, label: &str) -> ShiftResult<usize> {
        self.types
            .iter()
            .position(|t| t.label == label)
            .ok_or_else(|| ShiftError::NotFound(label.to_string()))
    }

    fn commit(&mut self, storage: &mut Storage, types: Vec<ShiftType>) -> ShiftResult<()> {
        storage.save_shift_types(&types)?;
        self.types = types;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShiftResult;
    use crate::storage::KeyValueStore;

    fn setup() -> (Storage, ShiftTypeRegistry) {
        let storage = Storage::in_memory();
        let registry = ShiftTypeRegistry::load(&storage).unwrap();
        (storage, registry)
    }

    fn labels(registry: &ShiftTypeRegistry) -> Vec<&str> {
        registry.list().iter().map(|t| t.label.as_str()).collect()
    }

    #[test]
    fn seeds_defaults_on_first_run() {
        let (_, registry) = setup();
        assert_eq!(labels(&registry), vec!["Day", "Night", "Back"]);
    }

    #[test]
    fn add_appends_and_persists() {
        let (mut storage, mut registry) = setup();
        registry
            .add(&mut storage, ShiftType::new("Early", "#ffcc00", "06:00", "14:00"))
            .unwrap();

        assert_eq!(labels(&registry), vec!["Day", "Night", "Back", "Early"]);
        let matches = registry
            .list()
            .iter()
            .filter(|t| t.has_label("early"))
            .count();
        assert_eq!(matches, 1);

        let reloaded = ShiftTypeRegistry::load(&storage).unwrap();
        assert_eq!(reloaded, registry);
    }

    #[test]
    fn add_rejects_case_insensitive_duplicates() {
        let (mut storage, mut registry) = setup();
        let err = registry
            .add(&mut storage, ShiftType::new("nIGHT", "#000000", "21:00", "05:00"))
            .unwrap_err();
        assert!(matches!(err, ShiftError::DuplicateLabel(label) if label == "nIGHT"));
        assert_eq!(registry.list().len(), 3);
    }

    #[test]
    fn add_rejects_missing_fields() {
        let (mut storage, mut registry) = setup();
        let err = registry
            .add(&mut storage, ShiftType::new("Late", "#000000", "", "22:00"))
            .unwrap_err();
        assert!(matches!(err, ShiftError::Validation(_)));
        assert!(storage.load_shift_types().unwrap().is_none());
    }

    #[test]
    fn update_changes_times_but_not_label() {
        let (mut storage, mut registry) = setup();
        let updated = registry
            .update(
                &mut storage,
                "Day",
                ShiftTypePatch {
                    start_time: Some("07:00".into()),
                    color: Some("#ffffff".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.label, "Day");
        assert_eq!(updated.start_time, "07:00");
        assert_eq!(updated.end_time, "16:00");
        assert_eq!(registry.get("Day"), Some(&updated));
    }

    #[test]
    fn update_and_delete_report_missing_labels() {
        let (mut storage, mut registry) = setup();
        assert!(matches!(
            registry.update(&mut storage, "Swing", ShiftTypePatch::default()),
            Err(ShiftError::NotFound(_))
        ));
        // Lookup for edits and deletes is exact
        assert!(matches!(
            registry.delete(&mut storage, "day"),
            Err(ShiftError::NotFound(_))
        ));
    }

    #[test]
    fn delete_removes_entry() {
        let (mut storage, mut registry) = setup();
        let removed = registry.delete(&mut storage, "Night").unwrap();
        assert_eq!(removed.label, "Night");
        assert_eq!(labels(&registry), vec!["Day", "Back"]);
        assert!(registry.get("Night").is_none());
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> ShiftResult<Option<String>> {
            Ok(None)
        }
        fn set(&mut self, _key: &str, _value: &str) -> ShiftResult<()> {
            Err(ShiftError::Storage("disk full".into()))
        }
        fn remove(&mut self, _key: &str) -> ShiftResult<()> {
            Ok(())
        }
        fn keys(&self) -> ShiftResult<Vec<String>> {
            Ok(vec![])
        }
    }

    #[test]
    fn failed_write_leaves_registry_unchanged() {
        let mut storage = Storage::new(FailingStore);
        let mut registry = ShiftTypeRegistry::load(&storage).unwrap();

        let result = registry.add(&mut storage, ShiftType::new("Early", "#ffcc00", "06:00", "14:00"));
        assert!(matches!(result, Err(ShiftError::Storage(_))));
        assert_eq!(labels(&registry), vec!["Day", "Night", "Back"]);

        assert!(registry.delete(&mut storage, "Day").is_err());
        assert!(registry.get("Day").is_some());
    }
}
