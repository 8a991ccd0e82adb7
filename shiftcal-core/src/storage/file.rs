//! Directory-backed key-value store: one `<key>.json` file per key.

use std::path::PathBuf;

use super::KeyValueStore;
use crate::error::{ShiftError, ShiftResult};

const EXTENSION: &str = "json";

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> ShiftResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    fn path_for(&self, key: &str) -> ShiftResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ShiftError::Storage(format!("Invalid storage key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> ShiftResult<Option<String>> {
        let path = self.path_for(key)?;

        if path.exists() {
            Ok(Some(std::fs::read_to_string(&path)?))
        } else {
            Ok(None)
        }
    }

    fn set(&mut self, key: &str, value: &str) -> ShiftResult<()> {
        let path = self.path_for(key)?;
        let temp = path.with_extension(format!("{EXTENSION}.tmp"));

        std::fs::write(&temp, value)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ShiftResult<()> {
        let path = self.path_for(key)?;

        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> ShiftResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.dir)?;

        let mut keys: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == EXTENSION))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(String::from)
            })
            .collect();

        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("shiftTypes").unwrap(), None);
        store.set("shiftTypes", "[]").unwrap();
        assert_eq!(store.get("shiftTypes").unwrap().as_deref(), Some("[]"));

        store.remove("shiftTypes").unwrap();
        assert_eq!(store.get("shiftTypes").unwrap(), None);
        // Removing twice is fine
        store.remove("shiftTypes").unwrap();
    }

    #[test]
    fn keys_skip_temp_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set("scheduledShifts_2024-03", "{}").unwrap();
        store.set("shiftTypes", "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        std::fs::write(dir.path().join("shiftTypes.json.tmp"), "[").unwrap();

        assert_eq!(
            store.keys().unwrap(),
            vec!["scheduledShifts_2024-03".to_string(), "shiftTypes".to_string()]
        );
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.set("shiftTypes", "[1]").unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("shiftTypes").unwrap().as_deref(), Some("[1]"));
    }
}
