use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::calendar::DateKey;
use crate::models::{migrate, Entry};

/// Marker set once the device's local-only entries have been uploaded to
/// the remote store. Guards the bulk migration so it runs at most once.
pub const MARKER_REMOTE_MIGRATED: &str = "remote_migrated";
/// First-run welcome note shown by the CLI.
pub const MARKER_WELCOME_SHOWN: &str = "welcome_shown";

/// On-disk shape of the entry blob. Entries are kept raw here; migration
/// runs on read so any vintage of stored shape loads.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Blob {
    #[serde(default)]
    entries: BTreeMap<String, Value>,
}

/// Device-scoped store: one JSON blob holding every entry, plus a small
/// key→value marker file beside it.
pub struct LocalStore {
    blob_path: PathBuf,
    meta_path: PathBuf,
}

impl LocalStore {
    pub fn new(data_dir: PathBuf) -> LocalStore {
        LocalStore {
            blob_path: data_dir.join("entries.json"),
            meta_path: data_dir.join("meta.json"),
        }
    }

    /// Read and migrate every stored entry. A missing or corrupt blob is
    /// treated as no data, never as a fatal error.
    pub fn load_entries(&self) -> BTreeMap<DateKey, Entry> {
        let raw = match fs::read_to_string(&self.blob_path) {
            Ok(raw) => raw,
            Err(_) => return BTreeMap::new(),
        };
        let blob: Blob = match serde_json::from_str(&raw) {
            Ok(blob) => blob,
            Err(e) => {
                log::warn!("Unreadable entry blob, starting empty: {}", e);
                return BTreeMap::new();
            }
        };

        let mut entries = BTreeMap::new();
        for (key, value) in blob.entries {
            let Ok(date) = key.parse::<DateKey>() else {
                log::warn!("Dropping entry under bad date key '{}'", key);
                continue;
            };
            if let Some(entry) = migrate(Some(value)) {
                entries.insert(date, entry);
            }
        }
        entries
    }

    /// Persist the full collection synchronously.
    pub fn save_entries(&self, entries: &BTreeMap<DateKey, Entry>) -> Result<()> {
        if let Some(parent) = self.blob_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let blob = Blob {
            entries: entries
                .iter()
                .map(|(k, e)| {
                    let value = serde_json::to_value(e).unwrap_or(Value::Null);
                    (k.to_string(), value)
                })
                .collect(),
        };
        let raw = serde_json::to_string(&blob).context("Serializing entry blob")?;
        fs::write(&self.blob_path, raw)
            .with_context(|| format!("Writing {:?}", self.blob_path))?;
        Ok(())
    }

    fn read_meta(&self) -> BTreeMap<String, String> {
        fs::read_to_string(&self.meta_path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn marker(&self, key: &str) -> bool {
        self.read_meta().get(key).map(String::as_str) == Some("1")
    }

    pub fn set_marker(&self, key: &str) -> Result<()> {
        if let Some(parent) = self.meta_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut meta = self.read_meta();
        meta.insert(key.to_string(), "1".to_string());
        let raw = serde_json::to_string(&meta).context("Serializing markers")?;
        fs::write(&self.meta_path, raw)
            .with_context(|| format!("Writing {:?}", self.meta_path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, LocalStore) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn missing_blob_loads_empty() {
        let (_dir, store) = store();
        assert!(store.load_entries().is_empty());
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        let (dir, store) = store();
        fs::write(dir.path().join("entries.json"), "{not json").unwrap();
        assert!(store.load_entries().is_empty());
    }

    #[test]
    fn entries_round_trip() {
        let (_dir, store) = store();
        let mut entries = BTreeMap::new();
        let mut e = Entry::empty();
        e.set_quran_pages(Some(7));
        e.note = "surah al-kahf".to_string();
        entries.insert("2025-03-10".parse().unwrap(), e.clone());
        store.save_entries(&entries).unwrap();

        let loaded = store.load_entries();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[&"2025-03-10".parse::<DateKey>().unwrap()], e);
    }

    #[test]
    fn legacy_shapes_migrate_on_load() {
        let (dir, store) = store();
        fs::write(
            dir.path().join("entries.json"),
            r#"{"entries":{"2024-04-01":{"prayer":true}}}"#,
        )
        .unwrap();
        let loaded = store.load_entries();
        let e = &loaded[&"2024-04-01".parse::<DateKey>().unwrap()];
        assert!(e.prayers.all_done());
    }

    #[test]
    fn bad_date_keys_are_dropped() {
        let (dir, store) = store();
        fs::write(
            dir.path().join("entries.json"),
            r#"{"entries":{"yesterday":{"prayer":true},"2024-04-01":{}}}"#,
        )
        .unwrap();
        assert_eq!(store.load_entries().len(), 1);
    }

    #[test]
    fn markers_are_independent_and_sticky() {
        let (_dir, store) = store();
        assert!(!store.marker(MARKER_REMOTE_MIGRATED));
        store.set_marker(MARKER_REMOTE_MIGRATED).unwrap();
        assert!(store.marker(MARKER_REMOTE_MIGRATED));
        assert!(!store.marker(MARKER_WELCOME_SHOWN));
        store.set_marker(MARKER_WELCOME_SHOWN).unwrap();
        assert!(store.marker(MARKER_REMOTE_MIGRATED));
        assert!(store.marker(MARKER_WELCOME_SHOWN));
    }
}
