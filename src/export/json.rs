//! JSON import/export module for scheduler snapshots and item catalogs.
//! Also provides a directory-of-files `StateStore` for hosts without SQLite.

use crate::error::Result;
use crate::models::{Catalog, Snapshot};
use crate::store::StateStore;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes a snapshot to `path` as pretty-printed JSON.
pub fn export_snapshot_to_path(snapshot: &Snapshot, path: impl AsRef<Path>) -> Result<()> {
    let json_string = serde_json::to_string_pretty(snapshot)?;
    fs::write(path.as_ref(), json_string)?;
    info!(path = %path.as_ref().display(), records = snapshot.records.len(), "exported snapshot");
    Ok(())
}

/// Reads a snapshot document from `path`.
/// The document is returned undecoded so that `Scheduler::import_value` can
/// default whatever is missing. Fails only if the file is unreadable or not JSON.
pub fn import_snapshot(path: impl AsRef<Path>) -> Result<Value> {
    let contents = fs::read_to_string(path.as_ref())?;
    let value = serde_json::from_str(&contents)?;
    info!(path = %path.as_ref().display(), "read snapshot");
    Ok(value)
}

/// Loads and validates an item catalog.
pub fn import_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let contents = fs::read_to_string(path.as_ref())?;
    let catalog: Catalog = serde_json::from_str(&contents)?;
    catalog.validate()?;
    info!(
        path = %path.as_ref().display(),
        topics = catalog.topics.len(),
        items = catalog.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Keeps each user's snapshot in `{dir}/{user_id}.json`.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{user_id}.json"))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, user_id: &str) -> Result<Option<Value>> {
        match fs::read_to_string(self.path_for(user_id)) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, user_id: &str, snapshot: &Snapshot) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        export_snapshot_to_path(snapshot, self.path_for(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::Error;
    use crate::models::Scheduler;
    use crate::store::{persist, restore};
    use chrono::{TimeZone, Utc};

    fn create_test_scheduler() -> Scheduler<ManualClock> {
        let mut scheduler = Scheduler::with_clock(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        ));
        scheduler.record_answer("Articles:0", true).unwrap();
        scheduler.record_answer("Articles:1", false).unwrap();
        scheduler
    }

    #[test]
    fn test_export_and_import_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("srs.json");
        let original = create_test_scheduler();

        export_snapshot_to_path(&original.export(), &path).unwrap();
        let value = import_snapshot(&path).unwrap();

        let mut imported = Scheduler::with_clock(original.clock().clone());
        imported.import_value(&value);
        assert_eq!(imported.export(), original.export());
        assert_eq!(imported.get_topic_stats(), original.get_topic_stats());
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_snapshot("nonexistent_file_xyz123.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_import_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(import_snapshot(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_import_catalog() {
        let json_content = r#"{
  "topics": [
    {
      "name": "Weather",
      "items": [
        {"prompt": "It's sunny", "answer": "C'è il sole"},
        {"prompt": "It's raining", "answer": "Piove", "explanation": "Piovere is impersonal."}
      ]
    }
  ]
}"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, json_content).unwrap();

        let catalog = import_catalog(&path).unwrap();
        assert_eq!(catalog.item_ids(), vec!["Weather:0", "Weather:1"]);
        assert!(catalog.check_answer("Weather:1", "piove").unwrap());
    }

    #[test]
    fn test_import_catalog_rejects_bad_topic_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"{"topics": [{"name": "a:b", "items": []}]}"#).unwrap();

        assert!(matches!(import_catalog(&path), Err(Error::InvalidTopicName(_))));
    }

    #[test]
    fn test_json_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("progress"));
        let original = create_test_scheduler();

        assert!(store.load("anna").unwrap().is_none());
        persist(&original, &store, "anna").unwrap();
        assert!(dir.path().join("progress").join("anna.json").exists());

        let mut restored = Scheduler::with_clock(original.clock().clone());
        assert!(restore(&mut restored, &store, "anna").unwrap());
        assert_eq!(restored.get_stats(), original.get_stats());
    }
}
