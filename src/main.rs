//! Endpoint Documenter - Command-line tool for documenting function trigger endpoints.
//!
//! Scans a repository of annotated function sources, extracts every HTTP,
//! timer, Event Grid and Cosmos DB trigger, and renders the result as API
//! client collections.
//!
//! # Usage
//!
//! ```bash
//! endpoint-documenter [OPTIONS] [REPO_PATH]
//! ```
//!
//! # Examples
//!
//! Generate a Bruno collection:
//! ```bash
//! endpoint-documenter ./functions -d bruno -o ./collections/bruno
//! ```
//!
//! Generate every format with a custom host:
//! ```bash
//! endpoint-documenter ./functions -d all -o ./docs --host https://dev.example.test
//! ```

use anyhow::Result;
use clap::Parser;
use endpoint_documenter::cli;
use log::info;

fn main() -> Result<()> {
    // Parse args first so the verbose flag can pick the log level
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Endpoint Documenter {} starting...", env!("CARGO_PKG_VERSION"));

    let args = cli::parse_args_from_parsed(args)?;

    cli::run(args)?;

    info!("Endpoint documentation completed successfully");

    Ok(())
}
