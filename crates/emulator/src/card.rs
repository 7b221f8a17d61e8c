//! A software card.

use simprov_core::{Apdu, ApduResponse, StatusWord};
use std::collections::BTreeMap;

/// ATR presented by emulated cards unless overridden.
pub const EMULATED_ATR: &[u8] = &[0x3B, 0x9F, 0x95, 0x80, 0x1F, 0xC7, 0x80, 0x31, 0xE0];

/// Instruction bytes understood by the emulated card.
pub mod ins {
    pub const ERASE: u8 = 0x0E;
    pub const SELECT: u8 = 0xA4;
    pub const READ_BINARY: u8 = 0xB0;
    pub const UPDATE_BINARY: u8 = 0xD6;
    pub const STATUS: u8 = 0xF2;
}

/// Elementary files of the emulated card.
pub mod files {
    pub const ICCID: u16 = 0x2FE2;
    pub const IMSI: u16 = 0x6F07;
    pub const KI: u16 = 0x6FF0;
    pub const SPN: u16 = 0x6F46;
    pub const SMSP: u16 = 0x6F42;
    /// MCC and MNC, two big-endian u16s.
    pub const PLMN: u16 = 0x6F30;

    pub const ALL: [u16; 6] = [ICCID, IMSI, KI, SPN, SMSP, PLMN];
}

/// An emulated card: a flat map of file id to content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatedCard {
    atr: Vec<u8>,
    files: BTreeMap<u16, Vec<u8>>,
    selected: Option<u16>,
    reject_erase: bool,
    reject_status: bool,
    reject_update_of: Option<u16>,
    erase_count: usize,
}

impl EmulatedCard {
    /// A blank card with the emulated ATR.
    pub fn blank() -> Self {
        Self {
            atr: EMULATED_ATR.to_vec(),
            files: BTreeMap::new(),
            selected: None,
            reject_erase: false,
            reject_status: false,
            reject_update_of: None,
            erase_count: 0,
        }
    }

    /// A card no registered driver recognises.
    pub fn foreign() -> Self {
        Self::blank().with_atr([0x3B, 0x00])
    }

    pub fn with_atr(mut self, atr: impl Into<Vec<u8>>) -> Self {
        self.atr = atr.into();
        self
    }

    /// Card that already carries an identity from a previous batch.
    pub fn with_file(mut self, file: u16, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(file, content.into());
        self
    }

    /// Card that answers ERASE with "conditions not satisfied".
    pub fn rejecting_erase(mut self) -> Self {
        self.reject_erase = true;
        self
    }

    /// Card that answers STATUS with "conditions not satisfied", so every
    /// reset fails.
    pub fn rejecting_status(mut self) -> Self {
        self.reject_status = true;
        self
    }

    /// Card that refuses to write the Ki. ICCID and IMSI are written first,
    /// so programming fails half way through.
    pub fn rejecting_program(mut self) -> Self {
        self.reject_update_of = Some(files::KI);
        self
    }

    pub fn atr(&self) -> &[u8] {
        &self.atr
    }

    /// Raw content of a file.
    pub fn read(&self, file: u16) -> Option<&[u8]> {
        self.files.get(&file).map(Vec::as_slice)
    }

    fn read_text(&self, file: u16) -> Option<String> {
        self.read(file)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn iccid(&self) -> Option<String> {
        self.read_text(files::ICCID)
    }

    pub fn imsi(&self) -> Option<String> {
        self.read_text(files::IMSI)
    }

    pub fn ki(&self) -> Option<&[u8]> {
        self.read(files::KI)
    }

    /// True once every file holds content.
    pub fn is_programmed(&self) -> bool {
        files::ALL.iter().all(|f| self.files.contains_key(f))
    }

    /// How many times the card was erased.
    pub fn erase_count(&self) -> usize {
        self.erase_count
    }

    /// Execute one command.
    pub fn process(&mut self, apdu: &Apdu) -> ApduResponse {
        match apdu.ins {
            ins::STATUS if self.reject_status => {
                ApduResponse::status(StatusWord::CONDITIONS_NOT_SATISFIED)
            }
            ins::STATUS => ApduResponse::ok(Vec::new()),
            ins::SELECT => {
                let [hi, lo] = apdu.data.as_slice() else {
                    return ApduResponse::status(StatusWord::WRONG_LENGTH);
                };
                let file = u16::from_be_bytes([*hi, *lo]);
                if files::ALL.contains(&file) {
                    self.selected = Some(file);
                    ApduResponse::ok(Vec::new())
                } else {
                    self.selected = None;
                    ApduResponse::status(StatusWord::FILE_NOT_FOUND)
                }
            }
            ins::READ_BINARY => match self.selected {
                Some(file) => ApduResponse::ok(self.files.get(&file).cloned().unwrap_or_default()),
                None => ApduResponse::status(StatusWord::CONDITIONS_NOT_SATISFIED),
            },
            ins::UPDATE_BINARY => match self.selected {
                Some(file) if self.reject_update_of == Some(file) => {
                    ApduResponse::status(StatusWord::SECURITY_NOT_SATISFIED)
                }
                Some(file) => {
                    self.files.insert(file, apdu.data.clone());
                    ApduResponse::ok(Vec::new())
                }
                None => ApduResponse::status(StatusWord::CONDITIONS_NOT_SATISFIED),
            },
            ins::ERASE if self.reject_erase => {
                ApduResponse::status(StatusWord::CONDITIONS_NOT_SATISFIED)
            }
            ins::ERASE => {
                self.files.clear();
                self.selected = None;
                self.erase_count += 1;
                ApduResponse::ok(Vec::new())
            }
            _ => ApduResponse::status(StatusWord::INS_NOT_SUPPORTED),
        }
    }
}

impl Default for EmulatedCard {
    fn default() -> Self {
        Self::blank()
    }
}
