//! Durable provisioning progress.
//!
//! The state file records `next_write_number` (and the batch's network
//! parameters) as TOML, so it can be inspected and repaired by hand:
//!
//! ```toml
//! next_write_number = 3
//!
//! [network]
//! name = "Test Network"
//! smsp = "+15551234567"
//! mcc = 1
//! mnc = 1
//! ```
//!
//! # Durability
//!
//! - `advance()` only moves the in-memory cursor. Nothing reaches disk until
//!   `save()`.
//! - `save()` writes a temp file in the same directory, fsyncs it and renames
//!   it over the state file. A crash leaves either the old or the new file.
//! - An advisory lock on `<state file>.lock` is held for the lifetime of the
//!   store. A second run against the same file fails with
//!   [`StoreError::ConcurrentRun`].

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::ProgressStore;
pub use memory::MemoryStore;

use simprov_types::{ProvisioningState, SequenceNumber};

/// The provisioning cursor as seen by the controller.
pub trait CursorStore {
    /// Current in-memory state.
    fn state(&self) -> &ProvisioningState;

    /// Next record to be written.
    fn next_write_number(&self) -> SequenceNumber {
        self.state().next_write_number
    }

    /// Move the in-memory cursor forward by one. Does not persist.
    fn advance(&mut self);

    /// Persist the in-memory state.
    fn save(&mut self) -> Result<(), StoreError>;
}
