//! Persist the download history as pretty JSON next to the downloads.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::HistoryRecord;
use crate::error::PersistenceError;

/// Location of the history file.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// History file directly under the download directory.
    pub fn in_dir(download_dir: &Path, file_name: &str) -> Self {
        Self::new(download_dir.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the history. A missing, unreadable or corrupt file yields an empty record.
    pub fn load(&self) -> HistoryRecord {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("no download history at {}, starting fresh", self.path.display());
                return HistoryRecord::new();
            }
            Err(e) => {
                tracing::error!("cannot read download history {}: {}; starting fresh", self.path.display(), e);
                return HistoryRecord::new();
            }
        };
        match serde_json::from_slice::<HistoryRecord>(&bytes) {
            Ok(record) => {
                tracing::debug!(files = record.total(), "loaded download history");
                record
            }
            Err(e) => {
                tracing::error!("error reading history file {}: {}; starting fresh", self.path.display(), e);
                HistoryRecord::new()
            }
        }
    }

    /// Writes the full record atomically: temp file in the same directory, fsync, rename.
    pub fn save(&self, record: &HistoryRecord) -> Result<(), PersistenceError> {
        let mut json = serde_json::to_string_pretty(record)?;
        json.push('\n');

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let io_err = |source: std::io::Error| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };
        fs::create_dir_all(parent).map_err(io_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::history::HistoryEntry;

    fn sample() -> HistoryRecord {
        let mut h = HistoryRecord::new();
        h.record(
            Category::Nba,
            "NBA1107.TXT",
            HistoryEntry {
                downloaded_at: "2025-11-07T06:00:00Z".into(),
                url: "http://www.kostats.com/NBA_Subscription/NBA1107.TXT".into(),
                sha256: Some("ab".repeat(32)),
                bytes: Some(2048),
            },
        );
        h.record(Category::Cbk, "CBK1.TXT", HistoryEntry::default());
        h
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path(), "download_history.json");
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path(), "download_history.json");
        fs::write(store.path(), b"{ not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::in_dir(&dir.path().join("nested"), "download_history.json");
        let h = sample();
        store.save(&h).unwrap();
        assert_eq!(store.load(), h);
    }

    #[test]
    fn save_of_fresh_load_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path(), "download_history.json");
        store.save(&sample()).unwrap();
        let before = fs::read(store.path()).unwrap();
        store.save(&store.load()).unwrap();
        let after = fs::read(store.path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::in_dir(dir.path(), "download_history.json");
        store.save(&sample()).unwrap();
        store.save(&sample()).unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("download_history.json")]);
    }

    #[test]
    fn save_into_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, b"x").unwrap();
        let store = HistoryStore::in_dir(&blocker, "download_history.json");
        assert!(matches!(store.save(&sample()), Err(PersistenceError::Io { .. })));
    }
}
