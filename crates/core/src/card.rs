//! Card-type driver and session contracts.

use crate::{CardError, CardReader};
use simprov_types::CardPayload;

/// One inserted card bound to a card-type driver.
///
/// A session is created per card and dropped once that card is finished.
/// It carries no state from one card to the next.
pub trait CardSession {
    /// Name of the card type this session drives.
    fn card_type(&self) -> &str;

    /// Re-initialise communication after detection or erase.
    fn reset(&mut self, reader: &mut dyn CardReader) -> Result<(), CardError>;

    /// Wipe prior identity data.
    ///
    /// Fails with [`CardError::Rejected`] when the card refuses the command.
    fn erase(&mut self, reader: &mut dyn CardReader) -> Result<(), CardError>;

    /// Write every field of `payload`.
    ///
    /// Success is all-or-nothing from the caller's point of view: if any
    /// field fails the whole call fails, even if earlier fields were written.
    fn program(
        &mut self,
        reader: &mut dyn CardReader,
        payload: &CardPayload,
    ) -> Result<(), CardError>;
}

/// A supported card type.
pub trait CardDriver {
    /// Unique name, as accepted by `--type`.
    fn name(&self) -> &str;

    /// Probe the inserted card.
    ///
    /// Returns a bound session when the card is of this type, `None`
    /// otherwise. Probing must not change card content.
    fn autodetect(
        &self,
        reader: &mut dyn CardReader,
    ) -> Result<Option<Box<dyn CardSession>>, CardError>;

    /// Bind a session without probing, for an explicitly configured type.
    fn bind(&self) -> Box<dyn CardSession>;
}
