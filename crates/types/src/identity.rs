//! Per-card identity parameters.

use crate::{FieldError, SequenceNumber};
use std::fmt;
use std::str::FromStr;

/// Length of a subscriber key in bytes.
pub const KI_LEN: usize = 16;

fn decimal_digits(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FieldError::Empty { field });
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::NotDecimal {
            field,
            value: value.to_string(),
        });
    }
    if !(min..=max).contains(&value.len()) {
        return Err(FieldError::BadLength {
            field,
            min,
            max,
            len: value.len(),
        });
    }
    Ok(value.to_string())
}

/// Integrated circuit card identifier (card serial number).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iccid(String);

impl Iccid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Iccid {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decimal_digits("iccid", s, 18, 20).map(Iccid)
    }
}

impl fmt::Display for Iccid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// International mobile subscriber identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Imsi(String);

impl Imsi {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Imsi {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decimal_digits("imsi", s, 6, 15).map(Imsi)
    }
}

impl fmt::Display for Imsi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subscriber authentication key.
///
/// `Display` renders the full lowercase hex (it is shown to the operator
/// before programming). `Debug` never prints the key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Ki([u8; KI_LEN]);

impl Ki {
    pub fn from_bytes(bytes: [u8; KI_LEN]) -> Self {
        Ki(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KI_LEN] {
        &self.0
    }
}

impl FromStr for Ki {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(FieldError::Empty { field: "ki" });
        }
        let mut bytes = [0u8; KI_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| FieldError::BadKey {
            expected: KI_LEN * 2,
            reason: e.to_string(),
        })?;
        Ok(Ki(bytes))
    }
}

impl fmt::Display for Ki {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Ki {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ki(<redacted>)")
    }
}

/// One card's unique parameters, as read from the parameter source.
///
/// Records are immutable once loaded. Whether a record has been consumed is
/// decided solely by the provisioning cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    /// Allocation key (1-based, unique within a batch).
    pub sequence_number: SequenceNumber,
    pub iccid: Iccid,
    pub imsi: Imsi,
    pub ki: Ki,
}

impl IdentityRecord {
    /// Create a record from already-validated fields.
    pub fn new(sequence_number: SequenceNumber, iccid: Iccid, imsi: Imsi, ki: Ki) -> Self {
        Self {
            sequence_number,
            iccid,
            imsi,
            ki,
        }
    }

    /// Parse a record from its four raw text fields.
    pub fn parse(
        sequence_number: &str,
        iccid: &str,
        imsi: &str,
        ki: &str,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            sequence_number: sequence_number.parse()?,
            iccid: iccid.parse()?,
            imsi: imsi.parse()?,
            ki: ki.parse()?,
        })
    }
}
