//! Operator-facing notices emitted by the controller.

use simprov_types::{CardPayload, SequenceNumber};
use std::fmt;

/// Something the operator should be told about.
///
/// `Display` renders the line (or block) printed to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// About to block for a card.
    InsertCard { new_card_only: bool },

    /// The inserted card was bound to a card type.
    CardTypeResolved { card_type: String, detected: bool },

    /// No card type matched; batch mode asks for another card.
    DetectionFailed,

    /// Erasing the inserted card.
    Formatting,

    /// Payload allocated for the inserted card.
    Allocated(CardPayload),

    /// Writing the payload.
    Programming { sequence_number: SequenceNumber },

    /// Card written and progress saved.
    CardWritten {
        sequence_number: SequenceNumber,
        next_write_number: SequenceNumber,
    },

    /// A card failed and will be retried with a new card.
    CardFailed {
        sequence_number: SequenceNumber,
        reason: String,
    },

    /// The operator cancelled while waiting for a card.
    Stopped,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InsertCard {
                new_card_only: false,
            } => f.write_str("Insert card now (or CTRL-C to cancel)"),
            Notice::InsertCard {
                new_card_only: true,
            } => f.write_str("Insert next card now (or CTRL-C to cancel)"),
            Notice::CardTypeResolved {
                card_type,
                detected: true,
            } => write!(f, "Autodetected card type: {}", card_type),
            Notice::CardTypeResolved {
                card_type,
                detected: false,
            } => write!(f, "Using card type: {}", card_type),
            Notice::DetectionFailed => {
                f.write_str("Card type detection failed, insert another card")
            }
            Notice::Formatting => f.write_str("Formatting ..."),
            // Block already ends with a newline.
            Notice::Allocated(payload) => write!(f, "{}", payload.to_string().trim_end()),
            Notice::Programming { .. } => f.write_str("Programming ..."),
            Notice::CardWritten {
                sequence_number,
                next_write_number,
            } => write!(
                f,
                "Card written ! ({}, next {})",
                sequence_number, next_write_number
            ),
            Notice::CardFailed {
                sequence_number,
                reason,
            } => write!(
                f,
                "Card failed ({}), {} will be retried on a new card",
                reason, sequence_number
            ),
            Notice::Stopped => f.write_str("Stopped."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_lines() {
        assert_eq!(
            Notice::InsertCard {
                new_card_only: false
            }
            .to_string(),
            "Insert card now (or CTRL-C to cancel)"
        );
        assert_eq!(Notice::Formatting.to_string(), "Formatting ...");
        assert_eq!(
            Notice::CardWritten {
                sequence_number: SequenceNumber(4),
                next_write_number: SequenceNumber(5),
            }
            .to_string(),
            "Card written ! (#4, next #5)"
        );
    }
}
