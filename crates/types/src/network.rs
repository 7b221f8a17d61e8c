//! Shared network parameters written to every card in a batch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network-wide (non per-card) parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParameters {
    /// Operator / service provider name.
    pub name: String,

    /// SMS service-center address.
    pub smsp: String,

    /// Mobile country code.
    pub mcc: u16,

    /// Mobile network code.
    pub mnc: u16,
}

impl NetworkParameters {
    pub fn new(name: impl Into<String>, smsp: impl Into<String>, mcc: u16, mnc: u16) -> Self {
        Self {
            name: name.into(),
            smsp: smsp.into(),
            mcc,
            mnc,
        }
    }
}

impl fmt::Display for NetworkParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.name, self.mcc, self.mnc)
    }
}
