//! Startup checks and the provisioning run.

use crate::{resolve_network, ReaderSelection, RunConfig, RunnerError};
use simprov_controller::{Notice, ProvisioningController, RunSummary};
use simprov_core::{CardReader, CardRegistry, RegistryError};
use simprov_emulator::{EmulatedDriver, EmulatedReader};
use simprov_queue::ParameterQueue;
use simprov_store::{CursorStore, ProgressStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Log level comes from `RUST_LOG`, defaulting to `info`. Logs go to stderr
/// so operator prompts on stdout stay readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Card types known to this build, in autodetect priority order.
pub fn card_registry() -> Result<CardRegistry, RegistryError> {
    CardRegistry::new().with_driver(EmulatedDriver::new())
}

/// Open the selected reader.
pub fn open_reader(selection: &ReaderSelection) -> Result<Box<dyn CardReader>, RunnerError> {
    match selection {
        ReaderSelection::Emulated { cards } => {
            Ok(Box::new(EmulatedReader::with_blank_cards(*cards)))
        }
        other => Err(RunnerError::UnsupportedReader(format!(
            "{} (only --emulate is available in this build)",
            other
        ))),
    }
}

/// Run one provisioning batch.
///
/// Every startup check happens before the reader is opened:
///
/// 1. the card type must be registered,
/// 2. the parameter source must load,
/// 3. the state file must parse and not be in use,
/// 4. network parameters must resolve.
///
/// On a fresh state file the resolved network parameters are stored, and
/// written out with the first committed card.
pub fn execute(
    config: &RunConfig,
    notify: impl FnMut(&Notice),
) -> Result<RunSummary, RunnerError> {
    let registry = card_registry()?;
    registry.validate(&config.controller.card_type)?;

    let queue = ParameterQueue::load_path(&config.csv_path)?;
    let mut store = ProgressStore::load(&config.state_path)?;

    let stored = store.state().network.clone();
    let network = resolve_network(stored.as_ref(), &config.network)?;
    if stored.is_none() {
        store.set_network(network.clone());
    }

    let reader = open_reader(&config.reader)?;
    info!(
        reader = %config.reader,
        network = %network,
        state = %store.path().display(),
        records = queue.len(),
        "Starting provisioning run"
    );

    let mut controller = ProvisioningController::new(
        config.controller.clone(),
        registry,
        queue,
        network,
        store,
        reader,
    )?;
    Ok(controller.run(notify)?)
}
