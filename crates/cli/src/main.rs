//! # dnstester
//!
//! Command line entry point: one-shot queries, the task worker, the HTTP
//! API and task submission/inspection.

mod bootstrap;
mod cli;
mod commands;
mod di;
mod server;

use bootstrap::{init_logging, load_config};
use clap::Parser;
use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), cli.overrides())?;
    init_logging(&config.logging);
    bootstrap::config::log_config(cli.config.as_deref(), &config);

    match cli.command {
        Command::Query(args) => commands::query::run(args, &config).await,
        Command::Worker(_) => commands::worker::run(&config).await,
        Command::Serve(_) => commands::serve::run(&config).await,
        Command::Submit(args) => commands::submit::run(args, &config).await,
        Command::Status(args) => commands::status::run(args, &config).await,
    }
}
