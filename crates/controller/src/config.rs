//! Configuration for the provisioning controller.

use simprov_core::CardTypeSelection;

/// Run policy for the provisioning controller.
#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    /// How the card type of each inserted card is chosen.
    pub card_type: CardTypeSelection,

    /// Erase every card before programming it.
    pub erase: bool,

    /// Unattended mode.
    ///
    /// A card that no driver recognises is skipped (the operator is asked
    /// for another card) instead of aborting the run.
    pub batch_mode: bool,

    /// Retry erase and program failures on a new card.
    ///
    /// The failed card keeps no identity: the same record is offered to the
    /// next card. When disabled these failures abort the run.
    pub retry_failed_cards: bool,
}

impl ControllerConfig {
    /// Set the card type selection.
    pub fn with_card_type(mut self, card_type: CardTypeSelection) -> Self {
        self.card_type = card_type;
        self
    }

    /// Erase cards before programming.
    pub fn with_erase(mut self, erase: bool) -> Self {
        self.erase = erase;
        self
    }

    /// Enable or disable batch (unattended) mode.
    pub fn with_batch_mode(mut self, batch_mode: bool) -> Self {
        self.batch_mode = batch_mode;
        self
    }

    /// Retry failed cards instead of aborting.
    pub fn with_retry_failed_cards(mut self, retry: bool) -> Self {
        self.retry_failed_cards = retry;
        self
    }
}
