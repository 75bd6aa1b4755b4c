//! Command-line front end for the retail management backend.
//!
//! Provides commands for:
//! - Listing customers, shops, products and invoices with search, filters,
//!   sorting and paging
//! - Registering customers, shops and products
//! - Admin login and invoice submission
//! - Invoice, quotation and unit conversion arithmetic

mod cli;
mod commands;
mod output;

use clap::Parser;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(base_url = %cli.base_url, "Starting shopdesk");
    let output = commands::run(cli).await?;
    println!("{}", output);
    Ok(())
}
