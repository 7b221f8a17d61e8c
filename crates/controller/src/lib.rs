//! Card provisioning controller.
//!
//! Drives one card at a time through an explicit state machine:
//!
//! ```text
//!        ┌──────────────────────────────────────────────────────────┐
//!        ▼                                                          │
//! WaitingForCard ─► Detecting ─► (Erasing) ─► Allocating ─► Programming ─► Committed
//!        │              │            │            │              │
//!        └──────────────┴────────────┴─── any ────┴──────────────┴──► Aborted
//! ```
//!
//! - `Allocating` reads the cursor and resolves the identity record. It never
//!   moves the cursor.
//! - The cursor is advanced and saved only in `Committed`, which is entered
//!   after the card reports a successful program and left before the next
//!   card is allocated. A crash
//!   between programming and saving re-offers the same record to the next
//!   card; a record is never handed to two cards.
//! - Detection failures are tolerated in batch mode (the card is skipped
//!   without consuming a record). Everything else aborts, unless
//!   `retry_failed_cards` asks for erase/program failures to be retried on a
//!   new card.
//!
//! The controller performs no output itself. Operator-facing messages are
//! delivered as [`Notice`]s to a callback.

mod config;
mod controller;
mod error;
mod notice;
mod phase;

pub use config::ControllerConfig;
pub use controller::{ProvisioningController, RunSummary};
pub use error::ProvisioningError;
pub use notice::Notice;
pub use phase::Phase;
