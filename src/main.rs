//! op: run services and stacks of services for local development.
//!
//! This is the main entry point for the `op` CLI. It parses arguments,
//! sets up logging, resolves the process context, dispatches to the command
//! handler, and maps errors to exit codes.

mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod logging;
pub mod services;

#[cfg(test)]
mod test_support;

use cli::Cli;
use config::ConfigStore;
use context::OpContext;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    let result = OpContext::resolve()
        .map(ConfigStore::new)
        .and_then(|store| commands::dispatch(cli.command, &store));

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
