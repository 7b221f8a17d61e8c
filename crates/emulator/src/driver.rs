//! Card-type driver for emulated cards.

use crate::card::{files, ins};
use crate::EMULATED_ATR;
use simprov_core::{Apdu, CardDriver, CardError, CardReader, CardSession};
use simprov_types::CardPayload;
use tracing::debug;

/// Name of the default emulated card type.
pub const EMULATED_CARD_TYPE: &str = "emulated";

const CLA: u8 = 0xA0;

/// Driver for [`EmulatedCard`](crate::EmulatedCard)s, matched by ATR.
#[derive(Debug, Clone)]
pub struct EmulatedDriver {
    name: String,
    atr: Vec<u8>,
}

impl EmulatedDriver {
    /// The default emulated card type.
    pub fn new() -> Self {
        Self::with_identity(EMULATED_CARD_TYPE, EMULATED_ATR)
    }

    /// A differently named card type matching a different ATR.
    pub fn with_identity(name: impl Into<String>, atr: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            atr: atr.into(),
        }
    }
}

impl Default for EmulatedDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl CardDriver for EmulatedDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn autodetect(
        &self,
        reader: &mut dyn CardReader,
    ) -> Result<Option<Box<dyn CardSession>>, CardError> {
        let atr = reader.atr()?;
        Ok((atr == self.atr).then(|| self.bind()))
    }

    fn bind(&self) -> Box<dyn CardSession> {
        Box::new(EmulatedSession {
            card_type: self.name.clone(),
        })
    }
}

/// Session on one emulated card.
#[derive(Debug)]
pub struct EmulatedSession {
    card_type: String,
}

impl EmulatedSession {
    fn write_file(
        reader: &mut dyn CardReader,
        field: &'static str,
        file: u16,
        content: Vec<u8>,
    ) -> Result<(), CardError> {
        let select = Apdu::new(CLA, ins::SELECT, 0, 0).with_data(file.to_be_bytes());
        let response = reader.transmit(&select)?;
        if !response.is_success() {
            return Err(CardError::ProgramFailed {
                field,
                reason: format!("select {:04X} returned {}", file, response.status),
            });
        }

        let update = Apdu::new(CLA, ins::UPDATE_BINARY, 0, 0).with_data(content);
        let response = reader.transmit(&update)?;
        if !response.is_success() {
            return Err(CardError::ProgramFailed {
                field,
                reason: format!("update {:04X} returned {}", file, response.status),
            });
        }

        debug!(field, file = %format!("{:04X}", file), "Wrote file");
        Ok(())
    }
}

impl CardSession for EmulatedSession {
    fn card_type(&self) -> &str {
        &self.card_type
    }

    fn reset(&mut self, reader: &mut dyn CardReader) -> Result<(), CardError> {
        let response = reader.transmit(&Apdu::new(CLA, ins::STATUS, 0, 0))?;
        if response.is_success() {
            Ok(())
        } else {
            Err(CardError::Rejected {
                command: "status",
                status: response.status,
            })
        }
    }

    fn erase(&mut self, reader: &mut dyn CardReader) -> Result<(), CardError> {
        let response = reader.transmit(&Apdu::new(CLA, ins::ERASE, 0, 0))?;
        if response.is_success() {
            Ok(())
        } else {
            Err(CardError::Rejected {
                command: "erase",
                status: response.status,
            })
        }
    }

    fn program(
        &mut self,
        reader: &mut dyn CardReader,
        payload: &CardPayload,
    ) -> Result<(), CardError> {
        let mut plmn = payload.mcc.to_be_bytes().to_vec();
        plmn.extend_from_slice(&payload.mnc.to_be_bytes());

        let writes: [(&'static str, u16, Vec<u8>); 6] = [
            ("iccid", files::ICCID, payload.iccid.as_str().as_bytes().to_vec()),
            ("imsi", files::IMSI, payload.imsi.as_str().as_bytes().to_vec()),
            ("ki", files::KI, payload.ki.as_bytes().to_vec()),
            ("name", files::SPN, payload.name.as_bytes().to_vec()),
            ("smsp", files::SMSP, payload.smsp.as_bytes().to_vec()),
            ("mcc/mnc", files::PLMN, plmn),
        ];

        for (field, file, content) in writes {
            if content.len() > 255 {
                return Err(CardError::ProgramFailed {
                    field,
                    reason: format!("{} bytes do not fit one record", content.len()),
                });
            }
            Self::write_file(reader, field, file, content)?;
        }
        Ok(())
    }
}
