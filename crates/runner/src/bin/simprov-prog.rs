//! simprov-prog
//!
//! Programs a batch of SIM cards, one identity record per card, resuming
//! from the progress recorded in the state file.

use anyhow::Context;
use clap::Parser;
use simprov_runner::{card_registry, execute, init_tracing, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.lists_card_types() {
        // No tracing for list - output goes to stdout
        for name in card_registry()?.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    init_tracing();

    let config = cli.into_run_config()?;
    let summary = execute(&config, |notice| println!("{}", notice)).with_context(|| {
        format!(
            "provisioning stopped (state file {})",
            config.state_path.display()
        )
    })?;

    println!("Done: {}", summary);
    Ok(())
}
