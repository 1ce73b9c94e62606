//! The persisted event document and its load/save boundary. Saves are
//! write-to-temp-then-rename so a reader never observes a partial document.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{Event, EventTemplate};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot read store at {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store at {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot write store at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store already exists at {path}")]
    AlreadyExists { path: PathBuf },
}

/// The canonical persisted document. `events` is only ever merged into;
/// `tickerTexts` and `templates` are replaced wholesale each cycle. Top-level
/// keys written by other versions survive in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStore {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub ticker_texts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<EventTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Load the document. A missing or invalid file is fatal to the caller;
/// it must never be papered over with a fresh document.
pub fn load(path: &Path) -> Result<EventStore, StoreError> {
    let data = std::fs::read_to_string(path).map_err(|source| StoreError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically replace the document: serialize, write to a temp file in the
/// same directory, then rename over the target.
pub fn save(path: &Path, store: &EventStore) -> Result<(), StoreError> {
    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let data = serde_json::to_string_pretty(store)
        .map_err(std::io::Error::other)
        .map_err(write_err)?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(data.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path)
        .map_err(|e| write_err(std::io::Error::other(e)))?;
    Ok(())
}

/// Create the empty document exactly once; refuses to clobber an existing one.
pub fn init(path: &Path) -> Result<(), StoreError> {
    if path.exists() {
        return Err(StoreError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    save(path, &EventStore::default())
}

/// Copy the current document into `<dir>/backups/<stem>-<timestamp>.json`
/// before a rewrite. Returns the backup path.
pub fn backup(path: &Path, now: DateTime<Utc>) -> Result<PathBuf, StoreError> {
    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path.parent().unwrap_or_else(|| Path::new(".")).join("backups");
    std::fs::create_dir_all(&dir).map_err(write_err)?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("events");
    let target = dir.join(format!("{stem}-{}.json", now.format("%Y%m%d-%H%M%S")));
    std::fs::copy(path, &target).map_err(write_err)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use chrono::TimeZone;

    fn sample_event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            kind: EventKind::Strike,
            country: "israel".into(),
            title: "title".into(),
            desc: "desc".into(),
            location: (32.0, 35.0),
            location_name: "Tel Aviv".into(),
            time: Utc.with_ymd_and_hms(2026, 6, 20, 10, 0, 0).unwrap(),
            source: "@src".into(),
            is_new: false,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");

        let mut store = EventStore::default();
        store.events.push(sample_event("e1"));
        store.ticker_texts.push("⚡ headline".into());

        save(&path, &store).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn unknown_top_level_keys_survive_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            r#"{"events": [], "tickerTexts": [], "news": [{"id": "n1"}], "languages": ["en"]}"#,
        )
        .unwrap();

        let mut store = load(&path).unwrap();
        assert_eq!(store.extra["news"][0]["id"], "n1");

        store.events.push(sample_event("e1"));
        save(&path, &store).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["news"][0]["id"], "n1");
        assert_eq!(raw["languages"][0], "en");
        assert_eq!(raw["events"][0]["id"], "e1");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, StoreError::Unreadable { .. }));
    }

    #[test]
    fn invalid_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "{ truncated").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn init_refuses_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        init(&path).unwrap();
        assert!(load(&path).unwrap().events.is_empty());
        assert!(matches!(
            init(&path),
            Err(StoreError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn save_leaves_no_temp_debris() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        save(&path, &EventStore::default()).unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("events.json")]);
    }

    #[test]
    fn backup_copies_current_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        init(&path).unwrap();

        let now = Utc.with_ymd_and_hms(2026, 6, 20, 10, 0, 0).unwrap();
        let target = backup(&path, now).unwrap();
        assert!(target.ends_with("backups/events-20260620-100000.json"));
        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            std::fs::read_to_string(&path).unwrap()
        );
    }
}
