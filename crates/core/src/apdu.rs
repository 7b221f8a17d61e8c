//! Minimal command/response units exchanged with a card.
//!
//! Only the framing lives here. Which commands a card type needs is the
//! business of its driver.

use std::fmt;

/// ISO 7816-4 status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord(pub u16);

impl StatusWord {
    pub const OK: Self = StatusWord(0x9000);
    pub const WRONG_LENGTH: Self = StatusWord(0x6700);
    pub const SECURITY_NOT_SATISFIED: Self = StatusWord(0x6982);
    pub const CONDITIONS_NOT_SATISFIED: Self = StatusWord(0x6985);
    pub const FILE_NOT_FOUND: Self = StatusWord(0x6A82);
    pub const INS_NOT_SUPPORTED: Self = StatusWord(0x6D00);

    /// True for `90 00`.
    pub fn is_success(self) -> bool {
        self == Self::OK
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// A command APDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Apdu {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: Vec<u8>,
    /// Expected response length, if any.
    pub le: Option<u8>,
}

impl Apdu {
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Vec::new(),
            le: None,
        }
    }

    /// Attach command data (short APDU, at most 255 bytes).
    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_le(mut self, le: u8) -> Self {
        self.le = Some(le);
        self
    }
}

/// A response APDU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApduResponse {
    pub data: Vec<u8>,
    pub status: StatusWord,
}

impl ApduResponse {
    pub fn ok(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            status: StatusWord::OK,
        }
    }

    pub fn status(status: StatusWord) -> Self {
        Self {
            data: Vec::new(),
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let apdu = Apdu::new(0xA0, 0xB0, 0, 0).with_data([0x3F, 0x00]).with_le(10);
        assert_eq!(apdu.data, vec![0x3F, 0x00]);
        assert_eq!(apdu.le, Some(10));
        assert!(Apdu::new(0xA0, 0xF2, 0, 0).data.is_empty());
    }

    #[test]
    fn test_status_word() {
        assert!(ApduResponse::ok(Vec::new()).is_success());
        assert!(!ApduResponse::status(StatusWord::FILE_NOT_FOUND).is_success());
        assert_eq!(StatusWord::FILE_NOT_FOUND.to_string(), "6A82");
    }
}
