//! Run configuration.

use simprov_controller::ControllerConfig;
use std::fmt;
use std::path::PathBuf;

use crate::NetworkOverride;

/// Serial device used when no reader is selected.
pub const DEFAULT_SERIAL_DEVICE: &str = "/dev/ttyUSB0";

/// Serial baud rate used when none is given.
pub const DEFAULT_BAUD: u32 = 9600;

/// Which card reader to drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderSelection {
    /// Serial reader.
    Serial { device: PathBuf, baud: u32 },
    /// PC/SC reader by index.
    Pcsc { index: usize },
    /// Built-in emulated reader holding `cards` blank cards.
    Emulated { cards: usize },
}

impl Default for ReaderSelection {
    fn default() -> Self {
        ReaderSelection::Serial {
            device: PathBuf::from(DEFAULT_SERIAL_DEVICE),
            baud: DEFAULT_BAUD,
        }
    }
}

impl fmt::Display for ReaderSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderSelection::Serial { device, baud } => {
                write!(f, "serial reader {} at {} baud", device.display(), baud)
            }
            ReaderSelection::Pcsc { index } => write!(f, "PC/SC reader {}", index),
            ReaderSelection::Emulated { cards } => {
                write!(f, "emulated reader with {} card(s)", cards)
            }
        }
    }
}

/// Everything one `simprov-prog` run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub reader: ReaderSelection,

    /// Progress state file (TOML).
    pub state_path: PathBuf,

    /// Parameter source (CSV).
    pub csv_path: PathBuf,

    pub controller: ControllerConfig,

    /// Network parameters given on the command line.
    pub network: NetworkOverride,
}

impl RunConfig {
    pub fn new(state_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            reader: ReaderSelection::default(),
            state_path: state_path.into(),
            csv_path: csv_path.into(),
            controller: ControllerConfig::default(),
            network: NetworkOverride::default(),
        }
    }

    pub fn with_reader(mut self, reader: ReaderSelection) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_controller(mut self, controller: ControllerConfig) -> Self {
        self.controller = controller;
        self
    }

    pub fn with_network(mut self, network: NetworkOverride) -> Self {
        self.network = network;
        self
    }
}
