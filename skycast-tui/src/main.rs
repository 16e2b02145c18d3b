//! Binary crate for the `skycast` terminal dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive credential configuration
//! - The message-driven dashboard loop and its rendering

use clap::Parser;

mod app;
mod cli;
mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
