//! Front end for `simprov-prog`.
//!
//! Turns command-line flags into a [`RunConfig`], performs every startup
//! check (parameter source, card type, state file, network parameters,
//! reader) before the reader is touched, then hands the run to the
//! provisioning controller.

mod cli;
mod config;
mod error;
mod network;
mod run;

pub use cli::{Cli, LIST_CARD_TYPES};
pub use config::{ReaderSelection, RunConfig, DEFAULT_BAUD, DEFAULT_SERIAL_DEVICE};
pub use error::RunnerError;
pub use network::{resolve_network, NetworkOverride};
pub use run::{card_registry, execute, init_tracing, open_reader};
