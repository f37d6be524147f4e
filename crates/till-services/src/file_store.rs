//! JSON file customer store
//!
//! The whole directory lives in one JSON object mapping id → `{name, contact}`.
//! Reads and writes always cover the full file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use till_core::{
    models::{CustomerDetails, CustomerId, CustomerMap},
    traits::CustomerStore,
    AppError, AppResult,
};
use tracing::{debug, warn};

/// Customer store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CustomerStore for JsonFileStore {
    fn load(&self) -> AppResult<CustomerMap> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No customer store at {}, starting empty", self.path.display());
                return Ok(CustomerMap::new());
            }
            Err(e) => return Err(AppError::Io(format!("{}: {}", self.path.display(), e))),
        };

        let entries: BTreeMap<String, CustomerDetails> = serde_json::from_str(&raw)
            .map_err(|e| AppError::CorruptStore(format!("{}: {}", self.path.display(), e)))?;

        let mut customers = CustomerMap::new();
        for (key, details) in entries {
            match CustomerId::parse(&key) {
                Ok(id) => {
                    customers.insert(id, details);
                }
                Err(_) => warn!("Skipping stored customer with invalid id '{}'", key),
            }
        }

        Ok(customers)
    }

    fn save(&self, customers: &CustomerMap) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(customers)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("customers.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_reads_reference_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("customers.json");
        fs::write(&path, r#"{"1234": {"name": "Amina", "contact": "0711000000"}}"#).unwrap();

        let customers = JsonFileStore::new(&path).load().unwrap();
        let details = &customers[&CustomerId::parse("1234").unwrap()];
        assert_eq!(details.name, "Amina");
        assert_eq!(details.contact, "0711000000");
    }

    #[test]
    fn test_malformed_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("customers.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, AppError::CorruptStore(_)));
    }

    #[test]
    fn test_invalid_ids_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("customers.json");
        fs::write(
            &path,
            r#"{"abc": {"name": "X", "contact": "1"}, "2468": {"name": "Y", "contact": "2"}}"#,
        )
        .unwrap();

        let customers = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(customers.len(), 1);
    }

    #[test]
    fn test_save_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("customers.json"));

        let mut customers = CustomerMap::new();
        customers.insert(
            CustomerId::parse("1111").unwrap(),
            CustomerDetails {
                name: "A".to_string(),
                contact: "1".to_string(),
            },
        );
        store.save(&customers).unwrap();

        customers.clear();
        customers.insert(
            CustomerId::parse("2222").unwrap(),
            CustomerDetails {
                name: "B".to_string(),
                contact: "2".to_string(),
            },
        );
        store.save(&customers).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, customers);
    }
}
