//! The `render` command: re-export from a processed snapshot.
//!
//! Rendering starts from the classified, reduced state a previous scan
//! wrote to `processed.json`, so manifests can be regenerated (with a
//! changed config, insertions file, or revision map) without rescanning
//! the source tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::config::RunConfig;
use crate::export::dot::{DotEdges, write_dot};
use crate::export::manifest::ManifestExporter;
use crate::export::{script, snapshot};
use crate::revisions::RevisionMap;

/// Re-render export artifacts from a processed snapshot.
#[derive(Args)]
pub struct RenderCommand {
    /// Processed snapshot written by a previous scan.
    #[arg(long)]
    snapshot: PathBuf,

    /// Release identifier stamped into manifests; also names the default
    /// revisions file (`<id>.commits`).
    #[arg(long)]
    version_id: String,

    /// Revisions file; when absent, `<version-id>.commits` is used if it
    /// exists, else manifests carry empty commits.
    #[arg(long)]
    commits: Option<PathBuf>,

    /// Output directory for every artifact.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// TOML file overriding the built-in collection conventions.
    #[arg(long)]
    config: Option<PathBuf>,

    /// YAML file of manifest fragments merged into the projects map.
    #[arg(long)]
    inserts: Option<PathBuf>,

    /// Also write the build-script dependency listing.
    #[arg(long)]
    emit_script: bool,
}

impl RenderCommand {
    /// Restore the registry and write the export artifacts.
    pub fn execute(self) -> Result<()> {
        let config = RunConfig::load(self.config.as_deref()).context("loading configuration")?;

        let revisions = match &self.commits {
            Some(path) => RevisionMap::load(path)
                .with_context(|| format!("loading revisions from {}", path.display()))?,
            None => {
                let default = PathBuf::from(format!("{}.commits", self.version_id));
                if default.is_file() {
                    RevisionMap::load(&default).with_context(|| {
                        format!("loading revisions from {}", default.display())
                    })?
                } else {
                    RevisionMap::empty()
                }
            }
        };

        let registry = snapshot::read(&self.snapshot).context("loading snapshot")?;
        info!(components = registry.len(), "snapshot restored");

        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("creating output directory {}", self.out_dir.display()))?;

        write_dot(&registry, DotEdges::Build, &self.out_dir.join("processed.dot"))?;

        let mut exporter =
            ManifestExporter::new(&registry, &config, &revisions, &self.version_id);
        if let Some(inserts) = &self.inserts {
            exporter = exporter
                .with_inserts(inserts)
                .with_context(|| format!("loading insertions from {}", inserts.display()))?;
        }
        exporter.write(&self.out_dir).context("writing manifests")?;

        if self.emit_script {
            script::write_script(&registry, &config, &self.out_dir)
                .context("writing build-script listing")?;
        }

        info!("render complete");
        Ok(())
    }
}
