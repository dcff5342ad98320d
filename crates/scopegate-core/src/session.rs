//! Persisted unlock flag.
//!
//! A single boolean under a fixed key: set when the gate is satisfied
//! (organically or via bypass), read once at mount to decide whether the
//! gate should be skipped entirely. Missing or malformed state always reads
//! as "not yet unlocked" — a broken flag file can lock a visitor out of
//! nothing worse than two seconds of hovering.
//!
//! # Storage Format
//!
//! One JSON file, `unlocked.json`, inside the store directory:
//!
//! ```json
//! { "version": 1, "unlocked": true, "marked_at_unix": 1754400000 }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Directory name used under the system temp dir by the default store.
pub const STORE_DIR_NAME: &str = "scopegate";

/// Flag file name — the fixed key.
pub const FLAG_FILE: &str = "unlocked.json";

const RECORD_VERSION: u32 = 1;

/// On-disk record behind the flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockRecord {
    pub version: u32,
    pub unlocked: bool,
    pub marked_at_unix: u64,
}

/// Reads and writes the unlock flag in one directory.
#[derive(Debug, Clone)]
pub struct UnlockStore {
    dir: PathBuf,
}

impl UnlockStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform temp dir: the flag survives reruns in the
    /// same session but not a reboot.
    pub fn at_default() -> Self {
        Self::new(std::env::temp_dir().join(STORE_DIR_NAME))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn flag_path(&self) -> PathBuf {
        self.dir.join(FLAG_FILE)
    }

    /// Whether a previous run satisfied the gate. Any read or parse failure
    /// reads as `false`.
    pub fn is_unlocked(&self) -> bool {
        let Ok(contents) = fs::read_to_string(self.flag_path()) else {
            return false;
        };
        match serde_json::from_str::<UnlockRecord>(&contents) {
            Ok(record) => record.unlocked,
            Err(e) => {
                log::debug!("ignoring malformed unlock flag: {e}");
                false
            }
        }
    }

    /// Persist the flag. Called on organic unlock and on bypass.
    pub fn mark_unlocked(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let record = UnlockRecord {
            version: RECORD_VERSION,
            unlocked: true,
            marked_at_unix: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        };
        let contents = serde_json::to_string_pretty(&record)?;
        fs::write(self.flag_path(), contents)
    }

    /// Remove the flag. Missing flag is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(self.flag_path()) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in_tempdir() -> (tempfile::TempDir, UnlockStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = UnlockStore::new(dir.path().join("store"));
        (dir, store)
    }

    #[test]
    fn missing_flag_reads_as_locked() {
        let (_guard, store) = store_in_tempdir();
        assert!(!store.is_unlocked());
    }

    #[test]
    fn mark_then_read_roundtrip() {
        let (_guard, store) = store_in_tempdir();
        store.mark_unlocked().expect("mark");
        assert!(store.is_unlocked());

        // Record on disk is a well-formed current-version document.
        let contents = fs::read_to_string(store.dir().join(FLAG_FILE)).unwrap();
        let record: UnlockRecord = serde_json::from_str(&contents).unwrap();
        assert_eq!(record.version, RECORD_VERSION);
        assert!(record.unlocked);
    }

    #[test]
    fn malformed_flag_reads_as_locked() {
        let (_guard, store) = store_in_tempdir();
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.dir().join(FLAG_FILE), "{ not json").unwrap();
        assert!(!store.is_unlocked());
    }

    #[test]
    fn explicit_false_record_reads_as_locked() {
        let (_guard, store) = store_in_tempdir();
        fs::create_dir_all(store.dir()).unwrap();
        let contents = r#"{ "version": 1, "unlocked": false, "marked_at_unix": 0 }"#;
        fs::write(store.dir().join(FLAG_FILE), contents).unwrap();
        assert!(!store.is_unlocked());
    }

    #[test]
    fn clear_removes_the_flag() {
        let (_guard, store) = store_in_tempdir();
        store.mark_unlocked().unwrap();
        assert!(store.is_unlocked());
        store.clear().unwrap();
        assert!(!store.is_unlocked());
    }

    #[test]
    fn clear_is_idempotent() {
        let (_guard, store) = store_in_tempdir();
        store.clear().expect("clearing a missing flag is fine");
        store.clear().expect("twice too");
    }

    #[test]
    fn mark_is_idempotent() {
        let (_guard, store) = store_in_tempdir();
        store.mark_unlocked().unwrap();
        store.mark_unlocked().unwrap();
        assert!(store.is_unlocked());
    }
}
