mod cli;
mod completion;
mod dispatch;
mod render;


use anyhow::Result;
use clap::Parser;
use oppm_installer::ConfigStore;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    // The configuration location is resolved exactly once, here; every
    // operation below receives the store explicitly.
    let store = ConfigStore::from_env()?;
    dispatch::run_cli(cli, &store)
}
