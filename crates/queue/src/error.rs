//! Error types for the parameter queue.

use simprov_types::SequenceNumber;
use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or reading the parameter queue.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The parameter source could not be opened.
    #[error("cannot read parameter source {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be parsed into the four required fields.
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// Two rows share a sequence number.
    #[error("duplicate sequence number {sequence_number} on line {line} (first defined on line {first_line})")]
    DuplicateKey {
        sequence_number: SequenceNumber,
        line: u64,
        first_line: u64,
    },

    /// The cursor asked for a record the source does not contain.
    ///
    /// The batch is larger than its identity pool. Never retried.
    #[error("parameter queue exhausted: no record for {requested} ({available} records loaded)")]
    ExhaustedQueue {
        requested: SequenceNumber,
        available: usize,
    },
}
