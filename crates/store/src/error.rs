//! Error types for the progress store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or saving provisioning progress.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The state file exists but cannot be parsed. Needs manual repair.
    #[error("state file {} is corrupt: {reason}", .path.display())]
    CorruptState { path: PathBuf, reason: String },

    /// Another run holds the state file lock.
    #[error("state file {} is in use by another run (lock {} is held)", .path.display(), .lock_path.display())]
    ConcurrentRun { path: PathBuf, lock_path: PathBuf },

    #[error("state file {} I/O error: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state could not be serialized.
    #[error("cannot encode state: {0}")]
    Encode(String),

    /// The backing storage refused the write.
    #[error("state storage unavailable: {0}")]
    Unavailable(String),
}
