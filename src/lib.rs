// Glosario - glossary curation over transcribed Spanish text
//
// Detection classifies every token of a document against the economic and
// Argentine glossaries; unknown terms accumulate in a candidate ledger until
// a curator promotes or discards them.

// Enable coverage attribute on nightly for explicit exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod cli;
pub mod curation;
pub mod detection;
pub mod events;
pub mod glossary;
pub mod storage;
pub mod text;
pub mod transcription;
pub mod turso;
pub mod util;

use clap::Parser;
use std::process::ExitCode;

// Re-export log macros for use throughout the crate
pub use log::{debug, error, info, trace, warn};

/// CLI entry point - parses arguments, runs one command and prints its JSON output.
/// Note: argument parsing exits the process on `--help` and usage errors.
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn run() -> ExitCode {
    let args = cli::CliArgs::parse();
    info!("Running {:?}", args.command);

    match util::run_async(cli::execute(args)) {
        Ok(Ok(output)) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            error!("Command failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
