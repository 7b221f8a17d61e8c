//! Command-line interface of `simprov-prog`.

use crate::{NetworkOverride, ReaderSelection, RunConfig, RunnerError, DEFAULT_SERIAL_DEVICE};
use clap::Parser;
use simprov_controller::ControllerConfig;
use simprov_core::CardTypeSelection;
use std::path::PathBuf;

/// Card type value that lists the registered types instead of running.
pub const LIST_CARD_TYPES: &str = "list";

#[derive(Parser, Debug)]
#[command(name = "simprov-prog")]
#[command(about = "Program a batch of SIM cards from a list of identity records")]
#[command(version)]
pub struct Cli {
    /// Serial device of the card reader
    #[arg(short = 'd', long, value_name = "DEV", conflicts_with_all = ["pcsc_device", "emulate"])]
    pub device: Option<PathBuf>,

    /// Baud rate of the serial reader
    #[arg(short = 'b', long, default_value_t = crate::DEFAULT_BAUD)]
    pub baud: u32,

    /// Use the PC/SC reader with this index
    #[arg(short = 'p', long, value_name = "INDEX", conflicts_with = "emulate")]
    pub pcsc_device: Option<usize>,

    /// Use the built-in emulated reader holding N blank cards
    #[arg(long, value_name = "N")]
    pub emulate: Option<usize>,

    /// Card type: auto, auto_once, a type name, or "list" to show the types
    #[arg(short = 't', long = "type", default_value = "auto")]
    pub card_type: String,

    /// Erase each card before programming it
    #[arg(short, long)]
    pub erase: bool,

    /// Unattended mode: skip cards whose type cannot be detected
    #[arg(long)]
    pub batch: bool,

    /// Retry failed erase/program on a new card instead of stopping
    #[arg(long)]
    pub retry_failed: bool,

    /// Progress state file
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Parameter source: CSV rows of sequence number, ICCID, IMSI, Ki
    ///
    /// ICCID must be 18-20 decimal digits (no F padding), IMSI 6-15 decimal
    /// digits and Ki exactly 32 hex characters. Any other row fails the
    /// whole load.
    #[arg(long, value_name = "FILE")]
    pub read_csv: Option<PathBuf>,

    /// Network (service provider) name
    #[arg(long)]
    pub network_name: Option<String>,

    /// SMS service-center address
    #[arg(long)]
    pub smsp: Option<String>,

    /// Mobile country code
    #[arg(long)]
    pub mcc: Option<u16>,

    /// Mobile network code
    #[arg(long)]
    pub mnc: Option<u16>,
}

impl Cli {
    /// True when `-t list` was given.
    pub fn lists_card_types(&self) -> bool {
        self.card_type == LIST_CARD_TYPES
    }

    fn reader(&self) -> ReaderSelection {
        if let Some(cards) = self.emulate {
            ReaderSelection::Emulated { cards }
        } else if let Some(index) = self.pcsc_device {
            ReaderSelection::Pcsc { index }
        } else {
            ReaderSelection::Serial {
                device: self
                    .device
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SERIAL_DEVICE)),
                baud: self.baud,
            }
        }
    }

    /// Build the run configuration.
    pub fn into_run_config(self) -> Result<RunConfig, RunnerError> {
        let reader = self.reader();
        let state = self.state.ok_or(RunnerError::MissingOption("--state"))?;
        let csv = self.read_csv.ok_or(RunnerError::MissingOption("--read-csv"))?;

        let card_type: CardTypeSelection = match self.card_type.parse() {
            Ok(selection) => selection,
            Err(never) => match never {},
        };
        let controller = ControllerConfig::default()
            .with_card_type(card_type)
            .with_erase(self.erase)
            .with_batch_mode(self.batch)
            .with_retry_failed_cards(self.retry_failed);

        Ok(RunConfig::new(state, csv)
            .with_reader(reader)
            .with_controller(controller)
            .with_network(NetworkOverride {
                name: self.network_name,
                smsp: self.smsp,
                mcc: self.mcc,
                mnc: self.mnc,
            }))
    }
}
