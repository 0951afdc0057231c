//! Error handling for depgraph.
//!
//! Two layers, following the taxonomy in the design:
//!
//! - [`DepgraphError`] — strongly-typed fatal conditions. These abort the
//!   run: an unreadable source root, an unreadable or unparseable revision
//!   mapping file, a broken configuration file, a genuine cycle in the raw
//!   include graph, or an output artifact that cannot be written.
//! - Non-fatal conditions (an unresolved include target, a duplicate
//!   file-to-component mapping, a missing build descriptor, a missing
//!   revision entry) never surface here at all — they are reported through
//!   `tracing::warn!` at the point of detection and processing continues
//!   with a degraded edge set.
//!
//! [`ErrorContext`] wraps a fatal error with a user-facing suggestion for
//! the CLI; [`user_friendly_error`] attaches the right suggestion per
//! variant. Inside the graph algorithms no errors are used for control
//! flow: absence of a containing relationship is a normal boolean outcome.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Fatal error conditions for depgraph operations.
#[derive(Error, Debug)]
pub enum DepgraphError {
    /// Source root directory missing or not a directory.
    #[error("source directory not found or not readable: {path}")]
    RootDirNotFound {
        /// Path that was checked.
        path: String,
    },

    /// Revision mapping file could not be read.
    #[error("failed to read revisions file {path}: {source}")]
    RevisionsRead {
        /// Path of the revisions file.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Revision mapping file is not line-oriented `<path> <commit>` pairs.
    #[error("malformed revisions file {path}: dangling entry '{token}'")]
    RevisionsParse {
        /// Path of the revisions file.
        path: String,
        /// The token with no matching commit.
        token: String,
    },

    /// Configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        /// Path of the config file.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::config::RunConfig`].
    #[error("invalid config file {path}: {reason}")]
    ConfigParse {
        /// Path of the config file.
        path: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The raw include graph contains a genuine multi-node cycle, which
    /// leaves transitive reduction without a defined result.
    #[error("circular include dependency detected: {cycle}")]
    CircularIncludes {
        /// The offending path, components joined by `->`.
        cycle: String,
    },

    /// Snapshot file could not be read or parsed.
    #[error("failed to load snapshot {path}: {reason}")]
    SnapshotLoad {
        /// Path of the snapshot file.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// A configured scan pattern failed to compile.
    #[error("invalid scan pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Generic I/O failure (typically while writing output artifacts).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A fatal error paired with user-facing help for CLI display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error.
    pub error: anyhow::Error,
    /// Actionable suggestion shown below the error message.
    pub suggestion: Option<String>,
}

impl ErrorContext {
    /// Wrap an error with no suggestion.
    #[must_use]
    pub fn new(error: anyhow::Error) -> Self {
        Self { error, suggestion: None }
    }

    /// Attach a suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Print the error (and suggestion, if any) to stderr with color.
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.error);
        for cause in self.error.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".yellow(), cause);
        }
        if let Some(suggestion) = &self.suggestion {
            eprintln!("{} {}", "hint:".cyan().bold(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nhint: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with a per-variant
/// suggestion where one is useful.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let suggestion = match error.downcast_ref::<DepgraphError>() {
        Some(DepgraphError::RootDirNotFound { .. }) => Some(
            "pass the collection's source root with --source-dir; it should contain one \
             subdirectory per component"
                .to_string(),
        ),
        Some(DepgraphError::RevisionsRead { .. } | DepgraphError::RevisionsParse { .. }) => Some(
            "the revisions file is line-oriented '<path> <commit>' pairs; generate it with \
             'git submodule status' or pass an explicit path with --commits"
                .to_string(),
        ),
        Some(DepgraphError::CircularIncludes { .. }) => Some(
            "two components include each other's headers; the raw include graph must be \
             acyclic before reduction — fix the headers or exclude one component"
                .to_string(),
        ),
        Some(DepgraphError::ConfigParse { .. }) => {
            Some("see the documented keys in the sample depgraph.toml".to_string())
        }
        _ => None,
    };
    ErrorContext { error, suggestion }
}
