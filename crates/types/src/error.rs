//! Field validation errors.

use thiserror::Error;

/// A single identity field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field was present but empty.
    #[error("{field} is empty")]
    Empty { field: &'static str },

    /// The field contains characters outside its alphabet.
    #[error("{field} must contain only decimal digits, got {value:?}")]
    NotDecimal { field: &'static str, value: String },

    /// The field has the wrong number of digits.
    #[error("{field} must be {min}..={max} digits long, got {len}")]
    BadLength {
        field: &'static str,
        min: usize,
        max: usize,
        len: usize,
    },

    /// Key material is not valid hex of the expected size.
    #[error("ki must be {expected} hex characters: {reason}")]
    BadKey { expected: usize, reason: String },

    /// Sequence numbers start at 1.
    #[error("sequence number must be a positive integer, got {0:?}")]
    BadSequenceNumber(String),
}
