//! depgraph CLI entry point.
//!
//! Parses arguments, runs the selected command, and renders failures with
//! the typed error context before exiting non-zero.

use anyhow::Result;
use clap::Parser;
use depgraph_cli::cli;
use depgraph_cli::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
