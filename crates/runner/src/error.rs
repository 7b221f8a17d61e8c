//! Error types for the runner.

use simprov_controller::ProvisioningError;
use simprov_core::RegistryError;
use simprov_queue::QueueError;
use simprov_store::StoreError;
use thiserror::Error;

/// Errors that stop `simprov-prog`.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// A required flag was not given.
    #[error("missing required option {0}")]
    MissingOption(&'static str),

    #[error(transparent)]
    CardType(#[from] RegistryError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Fresh state file and not all network parameters given.
    #[error("no network parameters in state file; required: {}", .missing.join(", "))]
    MissingNetwork { missing: Vec<&'static str> },

    /// A network flag disagrees with the parameters already recorded for
    /// this batch.
    #[error("{flag} {given} does not match {stored} recorded in the state file")]
    NetworkMismatch {
        flag: &'static str,
        stored: String,
        given: String,
    },

    /// The selected reader has no driver in this build.
    #[error("unsupported reader: {0}")]
    UnsupportedReader(String),

    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),
}
