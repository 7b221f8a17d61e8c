//! Core types for simprov card provisioning.
//!
//! Everything in here is plain data: identity records read from the
//! parameter source, the shared network parameters, the merged payload
//! written to a card and the persisted provisioning cursor.

mod error;
mod identifiers;
mod identity;
mod network;
mod payload;
mod state;

pub use error::FieldError;
pub use identifiers::SequenceNumber;
pub use identity::{Iccid, IdentityRecord, Imsi, Ki, KI_LEN};
pub use network::NetworkParameters;
pub use payload::CardPayload;
pub use state::ProvisioningState;
