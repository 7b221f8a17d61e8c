//! Error types for the provisioning controller.

use crate::Phase;
use simprov_core::{CardError, ReaderError, RegistryError};
use simprov_queue::QueueError;
use simprov_store::StoreError;
use simprov_types::SequenceNumber;
use thiserror::Error;

/// Errors that abort a provisioning run.
///
/// `slot` is the sequence number that the card was (or would have been)
/// assigned: the cursor at the time of the failure.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// The reader failed while waiting for a card.
    #[error("card reader failed while waiting for card {slot}: {source}")]
    Reader {
        slot: SequenceNumber,
        #[source]
        source: ReaderError,
    },

    /// The configured card type is not registered.
    #[error(transparent)]
    UnknownCardType(#[from] RegistryError),

    /// No registered card type recognised the inserted card.
    #[error("no known card type matches the inserted card (slot {slot})")]
    DetectionFailed { slot: SequenceNumber },

    /// A card operation outside erase/program failed.
    #[error("card error while {phase} (slot {slot}): {source}")]
    Card {
        phase: Phase,
        slot: SequenceNumber,
        #[source]
        source: CardError,
    },

    /// The card rejected the erase. Its content is now indeterminate.
    #[error("erasing card for {slot} failed: {source}")]
    EraseFailed {
        slot: SequenceNumber,
        #[source]
        source: CardError,
    },

    /// Programming failed. The cursor was not advanced.
    #[error("programming {slot} failed: {source}")]
    ProgramFailed {
        slot: SequenceNumber,
        #[source]
        source: CardError,
    },

    /// The identity record could not be resolved (the batch is larger than
    /// its parameter source).
    #[error(transparent)]
    Allocation(#[from] QueueError),

    /// The card was programmed but the cursor could not be saved.
    #[error("{slot} was written to the card but progress could not be saved: {source}")]
    Persist {
        slot: SequenceNumber,
        #[source]
        source: StoreError,
    },
}

impl ProvisioningError {
    /// The queue ran out of identity records.
    pub fn is_exhausted(&self) -> bool {
        matches!(
            self,
            ProvisioningError::Allocation(QueueError::ExhaustedQueue { .. })
        )
    }
}
