//! The persisted provisioning cursor.

use crate::{NetworkParameters, SequenceNumber};
use serde::{Deserialize, Serialize};

/// Persisted provisioning progress.
///
/// `next_write_number` is the single source of truth for how many cards of
/// the batch have been written: records `1..next_write_number` are consumed.
/// It never decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningState {
    /// Next record to be written.
    pub next_write_number: SequenceNumber,

    /// Network parameters of the batch, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkParameters>,
}

impl ProvisioningState {
    /// State of a batch that has not written any card yet.
    pub fn fresh() -> Self {
        Self {
            next_write_number: SequenceNumber::FIRST,
            network: None,
        }
    }

    /// State resuming at a given sequence number.
    pub fn resume_at(next_write_number: SequenceNumber) -> Self {
        Self {
            next_write_number,
            network: None,
        }
    }

    /// Attach network parameters.
    pub fn with_network(mut self, network: NetworkParameters) -> Self {
        self.network = Some(network);
        self
    }

    /// Move the cursor past the record that was just written.
    pub fn advance(&mut self) {
        self.next_write_number = self.next_write_number.next();
    }
}

impl Default for ProvisioningState {
    fn default() -> Self {
        Self::fresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let state = ProvisioningState::fresh();
        assert_eq!(state.next_write_number, SequenceNumber(1));
        assert!(state.network.is_none());
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut state = ProvisioningState::resume_at(SequenceNumber(4));
        state.advance();
        state.advance();
        assert_eq!(state.next_write_number, SequenceNumber(6));
    }

    #[test]
    fn test_toml_layout() {
        let state = ProvisioningState::resume_at(SequenceNumber(3))
            .with_network(NetworkParameters::new("Test Network", "+15551234567", 1, 1));
        let text = toml::to_string(&state).unwrap();
        assert!(text.starts_with("next_write_number = 3\n"));
        assert!(text.contains("[network]"));

        let parsed: ProvisioningState = toml::from_str("next_write_number = 9\n").unwrap();
        assert_eq!(parsed, ProvisioningState::resume_at(SequenceNumber(9)));
    }
}
