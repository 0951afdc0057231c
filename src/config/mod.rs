//! Run configuration.
//!
//! A [`RunConfig`] captures everything about a run that is domain knowledge
//! rather than something derivable from scanning: the include prefix the
//! collection's headers use, the grouping-namespace directory, repository
//! URL conventions, the irregular display-name cases, and the manually
//! declared extra build dependencies (e.g. a component whose compiled
//! sources need another's at link time beyond what its build descriptor
//! states).
//!
//! Defaults match the Boost collection the tool was written for. Any field
//! can be overridden from a TOML file (`--config`), so none of this is
//! hard-coded into the pipeline.
//!
//! ```toml
//! include-prefix = "boost"
//! url-base = "https://github.com/boostorg"
//!
//! [extra-build-deps]
//! thread = ["date_time"]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::DepgraphError;

/// Configuration for one scan/render run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RunConfig {
    /// Path prefix that identifies the collection's own headers inside
    /// include statements (`#include <boost/...>`).
    pub include_prefix: String,
    /// Immediate subdirectory of the root whose children are treated as
    /// top-level components; its own placeholder entry is discarded.
    pub namespace_dir: String,
    /// Base URL for per-component source repositories.
    pub url_base: String,
    /// Root of the generated package namespace in exported manifests.
    pub root_project: String,
    /// Prefix for generated preprocessor definitions of built components.
    pub definition_prefix: String,
    /// Manually declared additional build dependencies, keyed by display
    /// name. Folded into build edges during classification.
    pub extra_build_deps: BTreeMap<String, BTreeSet<String>>,
    /// Irregular canonical-name → display-name cases that the generic
    /// namespace-stripping rule does not cover.
    pub display_aliases: BTreeMap<String, String>,
    /// Irregular canonical-name → repository-slug cases.
    pub url_aliases: BTreeMap<String, String>,
    /// Display names whose manifest source stanza is inherited from another
    /// component (e.g. `log_setup` ships from `log`'s repository).
    pub source_aliases: BTreeMap<String, String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            include_prefix: "boost".to_string(),
            namespace_dir: "numeric".to_string(),
            url_base: "https://github.com/boostorg".to_string(),
            root_project: "pvt.cppan.demo.boost".to_string(),
            definition_prefix: "BOOST_".to_string(),
            extra_build_deps: BTreeMap::from([(
                "thread".to_string(),
                BTreeSet::from(["date_time".to_string()]),
            )]),
            display_aliases: BTreeMap::from([(
                "numeric/conversion".to_string(),
                "numeric".to_string(),
            )]),
            url_aliases: BTreeMap::from([
                ("numeric/conversion".to_string(), "numeric_conversion".to_string()),
                ("numeric/ublas".to_string(), "ublas".to_string()),
                ("numeric/odeint".to_string(), "odeint".to_string()),
                ("numeric/interval".to_string(), "interval".to_string()),
            ]),
            source_aliases: BTreeMap::from([("log_setup".to_string(), "log".to_string())]),
        }
    }
}

impl RunConfig {
    /// Load configuration, applying the TOML file at `path` over the
    /// defaults when given.
    pub fn load(path: Option<&Path>) -> Result<Self, DepgraphError> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| {
                    DepgraphError::ConfigRead { path: path.display().to_string(), source }
                })?;
                toml::from_str(&text).map_err(|source| DepgraphError::ConfigParse {
                    path: path.display().to_string(),
                    reason: source.to_string(),
                })
            }
        }
    }

    /// Display name for a canonical component name.
    ///
    /// Applies the irregular-case table first, then the generic rule that
    /// strips the grouping-namespace qualifier.
    #[must_use]
    pub fn display_name(&self, canonical: &str) -> String {
        if let Some(alias) = self.display_aliases.get(canonical) {
            return alias.clone();
        }
        let prefix = format!("{}/", self.namespace_dir);
        canonical.strip_prefix(&prefix).unwrap_or(canonical).to_string()
    }

    /// Source repository URL for a canonical component name.
    #[must_use]
    pub fn repo_url(&self, canonical: &str) -> String {
        let slug = self.url_aliases.get(canonical).map_or(canonical, String::as_str);
        format!("{}/{}", self.url_base, slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_irregular_numeric_cases() {
        let config = RunConfig::default();
        assert_eq!(config.display_name("numeric/conversion"), "numeric");
        assert_eq!(config.display_name("numeric/ublas"), "ublas");
        assert_eq!(config.display_name("numeric/odeint"), "odeint");
        assert_eq!(config.display_name("filesystem"), "filesystem");

        assert_eq!(
            config.repo_url("numeric/conversion"),
            "https://github.com/boostorg/numeric_conversion"
        );
        assert_eq!(config.repo_url("thread"), "https://github.com/boostorg/thread");
    }

    #[test]
    fn default_extra_build_deps_declare_thread_needs_date_time() {
        let config = RunConfig::default();
        assert!(config.extra_build_deps["thread"].contains("date_time"));
    }

    #[test]
    fn toml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depgraph.toml");
        std::fs::write(
            &path,
            r#"
include-prefix = "acme"
url-base = "https://git.example.com/acme"

[extra-build-deps]
net = ["io", "timers"]
"#,
        )
        .unwrap();

        let config = RunConfig::load(Some(&path)).unwrap();
        assert_eq!(config.include_prefix, "acme");
        assert_eq!(config.repo_url("net"), "https://git.example.com/acme/net");
        assert_eq!(config.extra_build_deps["net"].len(), 2);
        // Unset fields keep their defaults.
        assert_eq!(config.namespace_dir, "numeric");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("depgraph.toml");
        std::fs::write(&path, "no-such-key = 1\n").unwrap();
        assert!(RunConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(RunConfig::load(Some(Path::new("/nonexistent/depgraph.toml"))).is_err());
    }
}
