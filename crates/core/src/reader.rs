//! Card reader (transport) contract.

use crate::{Apdu, ApduResponse, ReaderError};

/// A smart-card reader.
///
/// Implementations wrap the physical transport. The provisioning loop is
/// single-threaded, so a reader is only ever used by one caller at a time.
pub trait CardReader {
    /// Block until a card is present.
    ///
    /// With `new_card_only` set, a card that is still inserted from the
    /// previous iteration does not count: the call waits for it to be
    /// removed and a different card to be inserted.
    ///
    /// Returns [`ReaderError::Cancelled`] if the operator cancels the wait.
    /// This is the only supported cancellation point.
    fn wait_for_card(&mut self, new_card_only: bool) -> Result<(), ReaderError>;

    /// Answer-to-reset of the inserted card.
    fn atr(&mut self) -> Result<Vec<u8>, ReaderError>;

    /// Exchange one command with the inserted card.
    fn transmit(&mut self, apdu: &Apdu) -> Result<ApduResponse, ReaderError>;
}

impl<R: CardReader + ?Sized> CardReader for &mut R {
    fn wait_for_card(&mut self, new_card_only: bool) -> Result<(), ReaderError> {
        (**self).wait_for_card(new_card_only)
    }

    fn atr(&mut self) -> Result<Vec<u8>, ReaderError> {
        (**self).atr()
    }

    fn transmit(&mut self, apdu: &Apdu) -> Result<ApduResponse, ReaderError> {
        (**self).transmit(apdu)
    }
}

impl<R: CardReader + ?Sized> CardReader for Box<R> {
    fn wait_for_card(&mut self, new_card_only: bool) -> Result<(), ReaderError> {
        (**self).wait_for_card(new_card_only)
    }

    fn atr(&mut self) -> Result<Vec<u8>, ReaderError> {
        (**self).atr()
    }

    fn transmit(&mut self, apdu: &Apdu) -> Result<ApduResponse, ReaderError> {
        (**self).transmit(apdu)
    }
}
