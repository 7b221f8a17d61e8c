//! Parameter queue for card provisioning.
//!
//! Holds every identity record of a batch, keyed by sequence number. The
//! queue itself imposes no order and tracks no consumption; records are
//! handed out in cursor order by the controller.
//!
//! The parameter source is CSV without a header, one card per row:
//!
//! ```text
//! sequence_number,iccid,imsi,ki
//! 1,8988211000000000018,001010000000001,000102030405060708090a0b0c0d0e0f
//! ```

mod error;
mod queue;

pub use error::QueueError;
pub use queue::ParameterQueue;
