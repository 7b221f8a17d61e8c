//! File-backed progress store.

use crate::{CursorStore, StoreError};
use fslock::LockFile;
use simprov_types::{NetworkParameters, ProvisioningState, SequenceNumber};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Provisioning progress persisted in a TOML state file.
pub struct ProgressStore {
    path: PathBuf,
    state: ProvisioningState,
    /// Cursor value last written to disk (or read at load).
    persisted: SequenceNumber,
    /// Held until the store is dropped.
    _lock: LockFile,
}

impl ProgressStore {
    /// Lock and load the state file at `path`.
    ///
    /// A missing or empty file yields a fresh state (`next_write_number = 1`).
    /// The file itself is not created until the first `save()`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let lock = acquire_lock(&path)?;
        let state = read_state(&path)?;

        info!(
            path = %path.display(),
            next_write_number = state.next_write_number.get(),
            "Loaded provisioning state"
        );

        Ok(Self {
            persisted: state.next_write_number,
            path,
            state,
            _lock: lock,
        })
    }

    /// Path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record the batch's network parameters. Persisted by the next `save()`.
    pub fn set_network(&mut self, network: NetworkParameters) {
        self.state.network = Some(network);
    }

    /// Cursor value currently on disk.
    pub fn persisted_write_number(&self) -> SequenceNumber {
        self.persisted
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CursorStore for ProgressStore {
    fn state(&self) -> &ProvisioningState {
        &self.state
    }

    fn advance(&mut self) {
        self.state.advance();
        debug!(
            next_write_number = self.state.next_write_number.get(),
            "Advanced cursor"
        );
    }

    fn save(&mut self) -> Result<(), StoreError> {
        debug_assert!(
            self.state.next_write_number >= self.persisted,
            "cursor must never move backwards"
        );

        let text =
            toml::to_string(&self.state).map_err(|e| StoreError::Encode(e.to_string()))?;

        let dir = parent_dir(&self.path);
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(text.as_bytes())
            .map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        // Make the rename itself durable.
        #[cfg(unix)]
        File::open(dir)
            .and_then(|d| d.sync_all())
            .map_err(|e| self.io_error(e))?;

        self.persisted = self.state.next_write_number;
        debug!(
            path = %self.path.display(),
            next_write_number = self.persisted.get(),
            "Saved provisioning state"
        );
        Ok(())
    }
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("path", &self.path)
            .field("state", &self.state)
            .field("persisted", &self.persisted)
            .finish_non_exhaustive()
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// `<state file>.lock` next to the state file.
fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

fn acquire_lock(path: &Path) -> Result<LockFile, StoreError> {
    let lock_path = lock_path(path);
    let io_error = |source| StoreError::Io {
        path: lock_path.clone(),
        source,
    };

    let mut lock = LockFile::open(&lock_path).map_err(io_error)?;
    if !lock.try_lock().map_err(io_error)? {
        return Err(StoreError::ConcurrentRun {
            path: path.to_path_buf(),
            lock_path,
        });
    }
    Ok(lock)
}

fn read_state(path: &Path) -> Result<ProvisioningState, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No state file, starting fresh");
            return Ok(ProvisioningState::fresh());
        }
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            return Err(StoreError::CorruptState {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if text.trim().is_empty() {
        debug!(path = %path.display(), "Empty state file, starting fresh");
        return Ok(ProvisioningState::fresh());
    }

    let state: ProvisioningState =
        toml::from_str(&text).map_err(|e| StoreError::CorruptState {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !state.next_write_number.is_valid() {
        return Err(StoreError::CorruptState {
            path: path.to_path_buf(),
            reason: "next_write_number must be at least 1".to_string(),
        });
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simprov_test_helpers::{state_file_text, test_network};
    use tracing_test::traced_test;

    fn state_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("batch.state")
    }

    #[traced_test]
    #[test]
    fn test_missing_file_is_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::load(state_path(&dir)).unwrap();

        assert_eq!(store.next_write_number(), SequenceNumber(1));
        assert!(store.state().network.is_none());
        assert!(!state_path(&dir).exists());
    }

    #[test]
    fn test_empty_file_is_fresh() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(state_path(&dir), "  \n").unwrap();

        let store = ProgressStore::load(state_path(&dir)).unwrap();
        assert_eq!(store.next_write_number(), SequenceNumber(1));
    }

    #[test]
    fn test_resume_from_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(state_path(&dir), state_file_text(SequenceNumber(7))).unwrap();

        let store = ProgressStore::load(state_path(&dir)).unwrap();
        assert_eq!(store.next_write_number(), SequenceNumber(7));
        assert_eq!(store.state().network, Some(test_network()));
    }

    #[test]
    fn test_corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();

        for contents in [
            "next_write_number = \"three\"\n",
            "this is not toml",
            "next_write_number = 0\n",
            "[network]\nname = \"x\"\n",
        ] {
            fs::write(state_path(&dir), contents).unwrap();
            match ProgressStore::load(state_path(&dir)) {
                Err(StoreError::CorruptState { path, .. }) => {
                    assert_eq!(path, state_path(&dir));
                }
                other => panic!("expected CorruptState for {:?}, got {:?}", contents, other),
            }
        }
    }

    #[test]
    fn test_advance_does_not_persist() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = ProgressStore::load(state_path(&dir)).unwrap();
            store.advance();
            assert_eq!(store.next_write_number(), SequenceNumber(2));
            assert_eq!(store.persisted_write_number(), SequenceNumber(1));
            // Dropped without save: simulates a crash between advance and save.
        }

        let store = ProgressStore::load(state_path(&dir)).unwrap();
        assert_eq!(store.next_write_number(), SequenceNumber(1));
    }

    #[traced_test]
    #[test]
    fn test_save_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = ProgressStore::load(state_path(&dir)).unwrap();
            store.set_network(test_network());
            store.advance();
            store.save().unwrap();
            store.advance();
            store.save().unwrap();
            assert_eq!(store.persisted_write_number(), SequenceNumber(3));
        }

        let text = fs::read_to_string(state_path(&dir)).unwrap();
        assert!(text.starts_with("next_write_number = 3\n"), "{}", text);
        assert!(text.contains("[network]"), "{}", text);
        assert!(logs_contain("Saved provisioning state"));

        let store = ProgressStore::load(state_path(&dir)).unwrap();
        assert_eq!(store.next_write_number(), SequenceNumber(3));
        assert_eq!(store.state().network, Some(test_network()));
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProgressStore::load(state_path(&dir)).unwrap();
        store.advance();
        store.save().unwrap();

        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["batch.state", "batch.state.lock"]);
    }

    #[test]
    fn test_second_store_on_same_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let _first = ProgressStore::load(state_path(&dir)).unwrap();

        match ProgressStore::load(state_path(&dir)) {
            Err(StoreError::ConcurrentRun { path, lock_path }) => {
                assert_eq!(path, state_path(&dir));
                assert_eq!(lock_path, dir.path().join("batch.state.lock"));
            }
            other => panic!("expected ConcurrentRun, got {:?}", other),
        }
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        drop(ProgressStore::load(state_path(&dir)).unwrap());
        assert!(ProgressStore::load(state_path(&dir)).is_ok());
    }
}
