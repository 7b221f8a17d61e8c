//! Controller phases.

use std::fmt;

/// Where the controller is in the per-card cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Blocked until a card is in the reader.
    WaitingForCard,
    /// Resolving the card type of the inserted card.
    Detecting,
    /// Wiping the inserted card (only when erase is requested).
    Erasing,
    /// Resolving the identity record at the cursor.
    Allocating,
    /// Writing the payload to the card.
    Programming,
    /// The card reported a successful program. Leaving this phase advances
    /// the cursor and saves it, then reports the card as written.
    Committed,
    /// Terminal. No further state is mutated.
    Aborted,
}

impl Phase {
    /// Get a human-readable name for this phase.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::WaitingForCard => "WaitingForCard",
            Phase::Detecting => "Detecting",
            Phase::Erasing => "Erasing",
            Phase::Allocating => "Allocating",
            Phase::Programming => "Programming",
            Phase::Committed => "Committed",
            Phase::Aborted => "Aborted",
        }
    }

    /// Check if this is the terminal phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Aborted)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
