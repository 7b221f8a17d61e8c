//! A reader that presents scripted cards.

use crate::EmulatedCard;
use simprov_core::{Apdu, ApduResponse, CardReader, ReaderError};
use std::collections::VecDeque;
use tracing::debug;

/// Emulated card reader.
///
/// Each `wait_for_card` that needs a new card removes the inserted card and
/// inserts the next scripted one. Once the script is exhausted the wait
/// reports [`ReaderError::Cancelled`], as an operator stopping the batch
/// would.
#[derive(Debug, Default)]
pub struct EmulatedReader {
    pending: VecDeque<EmulatedCard>,
    inserted: Option<EmulatedCard>,
    removed: Vec<EmulatedCard>,
    insertions: usize,
}

impl EmulatedReader {
    /// Reader that will present `cards` in order.
    pub fn new(cards: impl IntoIterator<Item = EmulatedCard>) -> Self {
        Self {
            pending: cards.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Reader that will present `count` blank cards.
    pub fn with_blank_cards(count: usize) -> Self {
        Self::new(std::iter::repeat_with(EmulatedCard::blank).take(count))
    }

    /// The card currently in the reader.
    pub fn inserted(&self) -> Option<&EmulatedCard> {
        self.inserted.as_ref()
    }

    /// Every card presented so far, in insertion order.
    pub fn presented(&self) -> impl Iterator<Item = &EmulatedCard> {
        self.removed.iter().chain(self.inserted.as_ref())
    }

    /// Number of cards inserted so far.
    pub fn insertions(&self) -> usize {
        self.insertions
    }

    fn card(&mut self) -> Result<&mut EmulatedCard, ReaderError> {
        self.inserted.as_mut().ok_or(ReaderError::NoCard)
    }
}

impl CardReader for EmulatedReader {
    fn wait_for_card(&mut self, new_card_only: bool) -> Result<(), ReaderError> {
        if !new_card_only && self.inserted.is_some() {
            return Ok(());
        }

        if let Some(card) = self.inserted.take() {
            self.removed.push(card);
        }

        match self.pending.pop_front() {
            Some(card) => {
                self.insertions += 1;
                debug!(insertion = self.insertions, "Emulated card inserted");
                self.inserted = Some(card);
                Ok(())
            }
            None => Err(ReaderError::Cancelled),
        }
    }

    fn atr(&mut self) -> Result<Vec<u8>, ReaderError> {
        Ok(self.card()?.atr().to_vec())
    }

    fn transmit(&mut self, apdu: &Apdu) -> Result<ApduResponse, ReaderError> {
        Ok(self.card()?.process(apdu))
    }
}
