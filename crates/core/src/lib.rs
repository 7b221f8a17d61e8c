//! Collaborator contracts consumed by the provisioning controller.
//!
//! The controller never talks to hardware itself. It drives three seams:
//!
//! - [`CardReader`] - the physical transport (serial or PC/SC reader). Blocks
//!   until a card is present and exchanges [`Apdu`]s with it.
//! - [`CardSession`] - one card bound to a card-type driver. Knows how to
//!   reset, erase and program that card type.
//! - [`CardRegistry`] - the fixed, priority-ordered set of [`CardDriver`]s,
//!   used for autodetection and lookup by name.
//!
//! Sessions do not own the reader; every operation borrows it, so a session
//! can be discarded after each card without tearing down the transport.

mod apdu;
mod card;
mod error;
mod reader;
mod registry;
mod selection;

pub use apdu::{Apdu, ApduResponse, StatusWord};
pub use card::{CardDriver, CardSession};
pub use error::{CardError, ReaderError, RegistryError};
pub use reader::CardReader;
pub use registry::CardRegistry;
pub use selection::CardTypeSelection;
