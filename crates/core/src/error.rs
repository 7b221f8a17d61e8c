//! Error types for card collaborators.

use crate::StatusWord;
use thiserror::Error;

/// Errors raised by a card reader.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The operator cancelled while the reader was waiting for a card.
    #[error("cancelled by operator")]
    Cancelled,

    /// No card is present in the reader.
    #[error("no card in reader")]
    NoCard,
}

/// Errors raised by a card session.
#[derive(Debug, Error)]
pub enum CardError {
    #[error(transparent)]
    Reader(#[from] ReaderError),

    /// Writing one of the fields failed. The card may be partially written.
    #[error("programming {field} failed: {reason}")]
    ProgramFailed { field: &'static str, reason: String },

    /// The card answered with an unexpected status word.
    #[error("card rejected {command} with status {status}")]
    Rejected {
        command: &'static str,
        status: StatusWord,
    },
}

/// Errors building the registry or resolving a card type against it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown card type {name:?} (known types: {})", .known.join(", "))]
    UnknownCardType { name: String, known: Vec<String> },

    #[error("card type {name:?} registered twice")]
    DuplicateCardType { name: String },
}
