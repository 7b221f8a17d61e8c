//! Domain-specific identifier types.

use crate::FieldError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card sequence number: the allocation key of an identity record.
///
/// Sequence numbers are 1-based. The provisioning cursor holds the next
/// sequence number to be written.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    /// First sequence number of every batch.
    pub const FIRST: Self = SequenceNumber(1);

    /// Get the next sequence number.
    pub fn next(self) -> Self {
        SequenceNumber(self.0 + 1)
    }

    /// Get the raw value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Check that this is a usable (non-zero) sequence number.
    pub fn is_valid(self) -> bool {
        self.0 >= 1
    }
}

impl Default for SequenceNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl FromStr for SequenceNumber {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u64>() {
            Ok(n) if n >= 1 => Ok(SequenceNumber(n)),
            _ => Err(FieldError::BadSequenceNumber(s.to_string())),
        }
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sequence_number() {
        assert_eq!("7".parse::<SequenceNumber>(), Ok(SequenceNumber(7)));
        assert_eq!(" 12 ".parse::<SequenceNumber>(), Ok(SequenceNumber(12)));
        assert!("0".parse::<SequenceNumber>().is_err());
        assert!("-1".parse::<SequenceNumber>().is_err());
        assert!("one".parse::<SequenceNumber>().is_err());
    }

    #[test]
    fn test_next_and_display() {
        assert_eq!(SequenceNumber::FIRST.next(), SequenceNumber(2));
        assert_eq!(SequenceNumber(42).to_string(), "#42");
        assert!(!SequenceNumber(0).is_valid());
    }
}
