//! The merged parameter set written to one card.

use crate::{Iccid, IdentityRecord, Imsi, Ki, NetworkParameters, SequenceNumber};
use std::fmt;

/// Everything a card driver needs to program one card.
///
/// Built during allocation by merging the shared network parameters with
/// the identity record at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPayload {
    /// Record this payload was allocated from.
    pub sequence_number: SequenceNumber,
    pub name: String,
    pub smsp: String,
    pub iccid: Iccid,
    pub mcc: u16,
    pub mnc: u16,
    pub imsi: Imsi,
    pub ki: Ki,
}

impl CardPayload {
    /// Merge network parameters with one identity record.
    pub fn merge(network: &NetworkParameters, record: &IdentityRecord) -> Self {
        Self {
            sequence_number: record.sequence_number,
            name: network.name.clone(),
            smsp: network.smsp.clone(),
            iccid: record.iccid.clone(),
            mcc: network.mcc,
            mnc: network.mnc,
            imsi: record.imsi.clone(),
            ki: record.ki.clone(),
        }
    }
}

/// Operator report block printed before programming.
impl fmt::Display for CardPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generated card parameters :")?;
        writeln!(f, " > Name    : {}", self.name)?;
        writeln!(f, " > SMSP    : {}", self.smsp)?;
        writeln!(f, " > ICCID   : {}", self.iccid)?;
        writeln!(f, " > MCC/MNC : {}/{}", self.mcc, self.mnc)?;
        writeln!(f, " > IMSI    : {}", self.imsi)?;
        writeln!(f, " > Ki      : {}", self.ki)
    }
}
