//! Command-line interface for depgraph.
//!
//! Two commands, both synchronous batch runs over an in-memory registry:
//!
//! - `scan` — the full pipeline: discover components under a source root,
//!   extract raw edges, classify, check the acyclicity precondition,
//!   reduce, and write every export artifact.
//! - `render` — re-export from a previously written processed snapshot
//!   without touching the source tree.
//!
//! Each command is its own module with an argument struct and an
//! `execute()` returning `anyhow::Result<()>`; global `--verbose` and
//! `--quiet` flags control the tracing filter (with `RUST_LOG` taking
//! precedence when set).

mod render;
mod scan;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Root command-line parser.
#[derive(Parser)]
#[command(
    name = "depgraph",
    about = "Dependency graph generator for modular C++ library collections",
    version,
    long_about = "Scans a Boost-style source tree, computes a minimal acyclic dependency \
                  graph, and renders package manifests for the packaging system."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output (equivalent to RUST_LOG=debug).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress everything except errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan a source tree and generate all artifacts.
    Scan(scan::ScanCommand),

    /// Re-render export artifacts from a processed snapshot.
    Render(render::RenderCommand),
}

impl Cli {
    /// Initialize logging and dispatch to the selected command.
    pub fn execute(self) -> Result<()> {
        self.init_logging();
        match self.command {
            Commands::Scan(cmd) => cmd.execute(),
            Commands::Render(cmd) => cmd.execute(),
        }
    }

    /// Set up the tracing subscriber. An explicit `RUST_LOG` wins over the
    /// verbosity flags; repeated initialization (in tests) is ignored.
    fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if self.verbose {
            EnvFilter::new("depgraph_cli=debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::new("info")
        };
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scan_with_flags() {
        let cli = Cli::try_parse_from([
            "depgraph",
            "--verbose",
            "scan",
            "--source-dir",
            "/srv/boost/libs",
            "--version-id",
            "1.70.0",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Scan(_)));
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        let result = Cli::try_parse_from([
            "depgraph",
            "-v",
            "-q",
            "scan",
            "--source-dir",
            "x",
            "--version-id",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn render_requires_a_snapshot() {
        assert!(Cli::try_parse_from(["depgraph", "render", "--version-id", "1"]).is_err());
    }
}
