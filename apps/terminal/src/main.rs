//! # Till Terminal Entry Point
//!
//! Parses flags and hands over to [`till_terminal_lib::run`]. The setup
//! lives in the library so it can be tested.

use std::process::ExitCode;

use clap::Parser;

use till_terminal_lib::error::ErrorCode;
use till_terminal_lib::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match till_terminal_lib::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            match e.code {
                ErrorCode::Config => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
