//! Crewl: minimal sequential pipeline runner for LLM-backed research crews.
//!
//! This is the main entry point for the `crewl` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes.

mod cli;
mod commands;
pub mod agent;
pub mod crew;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod prompt;
pub mod runtime;
pub mod settings;
pub mod task;
pub mod tools;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
