//! In-memory progress store for simulation and testing.

use crate::{CursorStore, StoreError};
use simprov_types::ProvisioningState;

/// A [`CursorStore`] that "persists" to a field.
///
/// `persisted()` plays the role of the file on disk: it only changes on a
/// successful `save()`. Saves can be made to fail to exercise the
/// crash window between `advance()` and `save()`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: ProvisioningState,
    persisted: ProvisioningState,
    saves: usize,
    fail_saves: bool,
}

impl MemoryStore {
    /// Create a store whose "disk" already holds `state`.
    pub fn new(state: ProvisioningState) -> Self {
        Self {
            persisted: state.clone(),
            state,
            saves: 0,
            fail_saves: false,
        }
    }

    /// Make every subsequent `save()` fail (or succeed again).
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// State as of the last successful save.
    pub fn persisted(&self) -> &ProvisioningState {
        &self.persisted
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Simulate a process restart: in-memory state is lost, the persisted
    /// state is reloaded.
    pub fn restart(&self) -> Self {
        Self::new(self.persisted.clone())
    }
}

impl CursorStore for MemoryStore {
    fn state(&self) -> &ProvisioningState {
        &self.state
    }

    fn advance(&mut self) {
        self.state.advance();
    }

    fn save(&mut self) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Unavailable("save disabled".to_string()));
        }
        self.persisted = self.state.clone();
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simprov_types::SequenceNumber;

    #[test]
    fn test_restart_loses_unsaved_advance() {
        let mut store = MemoryStore::default();
        store.advance();
        store.save().unwrap();
        store.advance();

        let restarted = store.restart();
        assert_eq!(restarted.next_write_number(), SequenceNumber(2));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_failed_save_keeps_persisted_state() {
        let mut store = MemoryStore::default();
        store.set_fail_saves(true);
        store.advance();

        assert!(matches!(store.save(), Err(StoreError::Unavailable(_))));
        assert_eq!(store.persisted().next_write_number, SequenceNumber(1));
    }
}
