//! Pinned-revision lookup.
//!
//! The exporters stamp each component's manifest with the commit the
//! collection release pins for it. The mapping comes from a line-oriented
//! file of whitespace-separated `<path> <commit>` pairs, one per component,
//! where each path carries the collection's `libs/` prefix:
//!
//! ```text
//! libs/align 5ad4dfa526a0ca70dd2178b3894d0ee9d72621d2
//! libs/any aba1d90d5a5e69d5ac1e37edef4ffd5c6e48ec66
//! ```
//!
//! An unreadable or malformed file aborts the run. A component with no
//! entry is only a warning at export time — the manifest is still written,
//! with an empty commit.

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::DepgraphError;

const PATH_PREFIX: &str = "libs/";

/// Component-directory → pinned-commit mapping.
#[derive(Debug, Clone, Default)]
pub struct RevisionMap {
    commits: BTreeMap<String, String>,
}

impl RevisionMap {
    /// An empty map, for runs that render without revision metadata.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and parse a revisions file.
    ///
    /// Tokens are consumed in pairs across line boundaries, so wrapped
    /// lines parse the same as the canonical one-pair-per-line layout. A
    /// dangling path token with no commit is a parse error.
    pub fn load(path: &Path) -> Result<Self, DepgraphError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            DepgraphError::RevisionsRead { path: path.display().to_string(), source }
        })?;

        let mut commits = BTreeMap::new();
        let mut tokens = text.split_whitespace();
        while let Some(lib) = tokens.next() {
            let Some(commit) = tokens.next() else {
                return Err(DepgraphError::RevisionsParse {
                    path: path.display().to_string(),
                    token: lib.to_string(),
                });
            };
            let dir = lib.strip_prefix(PATH_PREFIX).unwrap_or(lib);
            commits.insert(dir.to_string(), commit.to_string());
        }
        Ok(Self { commits })
    }

    /// Pinned commit for a component directory (canonical name), if any.
    #[must_use]
    pub fn commit_for(&self, dir: &str) -> Option<&str> {
        self.commits.get(dir).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Whether the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.70.0.commits");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn parses_pairs_and_strips_prefix() {
        let (_dir, path) = write_temp(
            "libs/align 5ad4dfa526a0ca70dd2178b3894d0ee9d72621d2\n\
             libs/numeric/ublas aba1d90d5a5e69d5ac1e37edef4ffd5c6e48ec66\n",
        );
        let map = RevisionMap::load(&path).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.commit_for("align"), Some("5ad4dfa526a0ca70dd2178b3894d0ee9d72621d2"));
        assert!(map.commit_for("numeric/ublas").is_some());
        assert_eq!(map.commit_for("missing"), None);
    }

    #[test]
    fn dangling_token_is_fatal() {
        let (_dir, path) = write_temp("libs/align abc123\nlibs/any\n");
        let err = RevisionMap::load(&path).unwrap_err();
        assert!(matches!(err, DepgraphError::RevisionsParse { .. }));
    }

    #[test]
    fn unreadable_file_is_fatal() {
        let err = RevisionMap::load(Path::new("/nonexistent/x.commits")).unwrap_err();
        assert!(matches!(err, DepgraphError::RevisionsRead { .. }));
    }

    #[test]
    fn empty_file_is_an_empty_map() {
        let (_dir, path) = write_temp("");
        assert!(RevisionMap::load(&path).unwrap().is_empty());
    }
}
