//! Emulated card reader and card type.
//!
//! Software stand-ins for the transport and the card command set, so a full
//! provisioning batch can run (and be tested) without a reader attached.
//!
//! - [`EmulatedReader`] presents a scripted sequence of cards, one per
//!   `wait_for_card`, and reports cancellation when it runs out.
//! - [`EmulatedCard`] answers a tiny APDU set (SELECT, READ BINARY,
//!   UPDATE BINARY, ERASE, STATUS) over a flat file map. Cards can be
//!   scripted to reject erase, reset (STATUS) or programming.
//! - [`EmulatedDriver`] is the matching card-type driver; it recognises a
//!   card by its ATR.

mod card;
mod driver;
mod reader;

pub use card::{files, ins, EmulatedCard, EMULATED_ATR};
pub use driver::{EmulatedDriver, EmulatedSession, EMULATED_CARD_TYPE};
pub use reader::EmulatedReader;

use simprov_core::{CardRegistry, RegistryError};

/// Registry containing only the emulated card type.
pub fn emulated_registry() -> Result<CardRegistry, RegistryError> {
    CardRegistry::new().with_driver(EmulatedDriver::new())
}
