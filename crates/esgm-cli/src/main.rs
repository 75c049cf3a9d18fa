//! ESGM CLI
//!
//! Entry point for the `esgm` binary.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;

use esgm_cli::{Args, Command, commands, config_handlers, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init();

    let config_path = args.config.as_deref();
    match args.command {
        Command::Serve { host, port } => {
            let config = commands::load_config(config_path, host, port)?;
            commands::serve(config).await?;
        }
        Command::Migrate => {
            let config = commands::load_config(config_path, None, None)?;
            commands::migrate(&config).await?;
        }
        Command::Config { action } => {
            config_handlers::handle_config_command(config_path, action)?;
        }
    }
    Ok(())
}
