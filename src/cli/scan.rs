//! The `scan` command: full pipeline from source tree to export artifacts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::config::RunConfig;
use crate::export::dot::{DotEdges, write_dot};
use crate::export::manifest::ManifestExporter;
use crate::export::{script, snapshot};
use crate::graph;
use crate::registry::Registry;
use crate::revisions::RevisionMap;
use crate::scanner;

/// Scan a source tree and generate all artifacts.
#[derive(Args)]
pub struct ScanCommand {
    /// Root directory of the collection's sources (one subdirectory per
    /// component).
    #[arg(short = 'd', long)]
    source_dir: PathBuf,

    /// Release identifier stamped into manifests; also names the default
    /// revisions file (`<id>.commits`).
    #[arg(long)]
    version_id: String,

    /// Revisions file overriding the default `<version-id>.commits`.
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

impl ScanCommand {
    /// Run the pipeline: discover → extract → classify → cycle check →
    /// reduce → export.
    pub fn execute(self) -> Result<()> {
        let config = RunConfig::load(self.config.as_deref()).context("loading configuration")?;

        let commits_path =
            self.commits.unwrap_or_else(|| PathBuf::from(format!("{}.commits", self.version_id)));
        let revisions = RevisionMap::load(&commits_path)
            .with_context(|| format!("loading revisions from {}", commits_path.display()))?;
        info!(revisions = revisions.len(), "revision map loaded");

        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("creating output directory {}", self.out_dir.display()))?;

        let mut registry = Registry::new();
        scanner::scan_tree(&mut registry, &config, &self.source_dir)
            .context("scanning source tree")?;
        info!(components = registry.len(), "discovery complete");

        snapshot::write_raw(&registry, &self.out_dir.join("initial.json"))?;
        write_dot(&registry, DotEdges::RawIncludes, &self.out_dir.join("initial.dot"))?;

        graph::process(&mut registry, &config)?;

        snapshot::write_processed(&registry, &self.out_dir.join("processed.json"))?;
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

        info!("scan complete");
        Ok(())
    }
}
