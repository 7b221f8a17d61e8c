//! How the card type of an inserted card is chosen.

use std::fmt;
use std::str::FromStr;

/// Card-type selection policy, as given by `--type`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CardTypeSelection {
    /// Probe every registered type, in priority order, for every card.
    #[default]
    Auto,

    /// Probe the first card, then assume the detected type for the rest of
    /// the run.
    AutoOnce,

    /// Assume the named type without probing.
    Named(String),
}

impl FromStr for CardTypeSelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "auto" => CardTypeSelection::Auto,
            "auto_once" => CardTypeSelection::AutoOnce,
            name => CardTypeSelection::Named(name.to_string()),
        })
    }
}

impl fmt::Display for CardTypeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardTypeSelection::Auto => f.write_str("auto"),
            CardTypeSelection::AutoOnce => f.write_str("auto_once"),
            CardTypeSelection::Named(name) => f.write_str(name),
        }
    }
}
