use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed key the cart snapshot is stored under.
pub const STORAGE_KEY: &str = "@GoMarketplace:products";

/// Key-value storage collaborator backing the cart store.
///
/// Mirrors a device storage API: string keys, string values, a missing key
/// reads back as `None`.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), String>;
}

/// Device storage backed by a single JSON object file.
///
/// Keys map to string values inside one object; every `set_item` rewrites
/// the whole file.
pub struct FileStorage {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl FileStorage {
    /// Opens the storage file, creating an empty store when the file does
    /// not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| e.to_string())?;
            match serde_json::from_str::<Value>(&contents) {
                Ok(Value::Object(map)) => map,
                Ok(_) => return Err("Invalid storage file - expected a JSON object".to_string()),
                Err(e) => return Err(format!("Invalid storage file - {}", e)),
            }
        } else {
            Map::new()
        };

        Ok(Self { path, entries })
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self
            .entries
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.entries
            .insert(key.to_string(), Value::String(value.to_string()));

        match serde_json::to_string_pretty(&Value::Object(self.entries.clone())) {
            Ok(json) => fs::write(&self.path, json).map_err(|e| e.to_string()),
            Err(e) => Err(format!("Serialization failed: {}", e)),
        }
    }
}

/// In-process storage with no backing file. Used in tests and as the
/// fallback when the storage file is unusable.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let storage = FileStorage::open(&path).unwrap();

        assert_eq!(storage.get_item(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut storage = FileStorage::open(&path).unwrap();

        storage.set_item(STORAGE_KEY, "[]").unwrap();

        assert_eq!(storage.get_item(STORAGE_KEY).unwrap().unwrap(), "[]");
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        {
            let mut storage = FileStorage::open(&path).unwrap();
            storage.set_item(STORAGE_KEY, "[{\"id\":\"a\"}]").unwrap();
        }

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(
            reopened.get_item(STORAGE_KEY).unwrap().unwrap(),
            "[{\"id\":\"a\"}]"
        );
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        assert!(FileStorage::open(&path).is_err());
    }

    #[test]
    fn test_open_rejects_non_object_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "[1,2,3]").unwrap();

        assert!(FileStorage::open(&path).is_err());
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::default();

        assert_eq!(storage.get_item("missing").unwrap(), None);

        storage.set_item("key", "value").unwrap();
        assert_eq!(storage.get_item("key").unwrap().unwrap(), "value");
    }
}
