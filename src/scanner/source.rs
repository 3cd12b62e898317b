//! Repository Sources
//!
//! The fetch layer the orchestrator talks to. Network clients own retries and
//! backoff; the orchestrator only sees typed [`SourceError`]s.

use crate::artifact::TreeEntry;
use crate::scanner::error::{ScanError, SourceError, SourceResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A flat tree listing at one ref
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoTree {
    /// Tree identity
    pub sha: String,
    /// Set when the remote cut the listing short
    #[serde(default)]
    pub truncated: bool,
    #[serde(rename = "tree")]
    pub entries: Vec<TreeEntry>,
}

impl RepoTree {
    pub fn new<S: Into<String>>(sha: S, entries: Vec<TreeEntry>) -> Self {
        Self {
            sha: sha.into(),
            truncated: false,
            entries,
        }
    }
}

/// Remote repository access used by a scan
#[async_trait]
pub trait RepositorySource: Send + Sync {
    /// Recursive tree listing at `git_ref`
    async fn fetch_tree(&self, owner: &str, repo: &str, git_ref: &str) -> SourceResult<RepoTree>;

    /// The repository's actual default branch
    async fn default_branch(&self, owner: &str, repo: &str) -> SourceResult<String>;

    /// Commit identity `git_ref` currently points at
    async fn resolve_commit(&self, owner: &str, repo: &str, git_ref: &str)
        -> SourceResult<String>;
}

#[derive(Debug, Deserialize)]
struct TreeFile {
    #[serde(flatten)]
    tree: RepoTree,
    #[serde(default)]
    commit: Option<String>,
    #[serde(default)]
    default_branch: Option<String>,
}

/// A tree listing saved to disk
///
/// Accepts the GitHub git-trees response shape plus two optional top-level
/// fields, `commit` and `default_branch`. Every ref resolves to the same
/// listing.
#[derive(Debug, Clone)]
pub struct JsonTreeSource {
    tree: RepoTree,
    commit: Option<String>,
    default_branch: Option<String>,
}

impl JsonTreeSource {
    pub fn new(tree: RepoTree) -> Self {
        Self {
            tree,
            commit: None,
            default_branch: None,
        }
    }

    pub fn with_commit<S: Into<String>>(mut self, commit: S) -> Self {
        self.commit = Some(commit.into());
        self
    }

    pub fn with_default_branch<S: Into<String>>(mut self, branch: S) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: TreeFile = serde_json::from_str(json)?;
        Ok(Self {
            tree: file.tree,
            commit: file.commit,
            default_branch: file.default_branch,
        })
    }

    pub async fn from_file(path: &Path) -> Result<Self, ScanError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ScanError::unreadable(path, &e))?;
        let source = Self::from_json(&contents).map_err(|e| ScanError::unparsable(path, &e))?;
        log::debug!(
            "Loaded tree {} with {} entries from {}",
            source.tree.sha,
            source.tree.entries.len(),
            path.display()
        );
        Ok(source)
    }

    pub fn tree(&self) -> &RepoTree {
        &self.tree
    }
}

#[async_trait]
impl RepositorySource for JsonTreeSource {
    async fn fetch_tree(&self, _owner: &str, _repo: &str, _git_ref: &str) -> SourceResult<RepoTree> {
        Ok(self.tree.clone())
    }

    async fn default_branch(&self, owner: &str, repo: &str) -> SourceResult<String> {
        self.default_branch
            .clone()
            .ok_or_else(|| SourceError::not_found(format!("default branch of {}/{}", owner, repo)))
    }

    async fn resolve_commit(&self, owner: &str, repo: &str, git_ref: &str) -> SourceResult<String> {
        self.commit.clone().ok_or_else(|| {
            SourceError::not_found(format!("commit for {}/{}@{}", owner, repo, git_ref))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::TreeEntryType;

    const LISTING: &str = r#"{
        "sha": "9fb037999f264ba9a7fc6274d15fa3ae2ab98312",
        "url": "https://api.github.com/repos/acme/tools/git/trees/9fb0379",
        "truncated": false,
        "commit": "7638417db6d59f3c431d3e1f261cc637155684cd",
        "tree": [
            {"path": "skills", "mode": "040000", "type": "tree", "sha": "a1"},
            {"path": "skills/canvas/SKILL.md", "mode": "100644", "type": "blob", "sha": "b1", "size": 30}
        ]
    }"#;

    #[test]
    fn test_parses_github_tree_listing() {
        let source = JsonTreeSource::from_json(LISTING).unwrap();
        let tree = source.tree();
        assert_eq!(tree.sha, "9fb037999f264ba9a7fc6274d15fa3ae2ab98312");
        assert_eq!(tree.entries.len(), 2);
        assert_eq!(tree.entries[0].entry_type, TreeEntryType::Tree);
        assert_eq!(tree.entries[1].size, Some(30));
    }

    #[tokio::test]
    async fn test_commit_and_default_branch_lookup() {
        let source = JsonTreeSource::from_json(LISTING).unwrap();
        assert_eq!(
            source.resolve_commit("acme", "tools", "main").await.unwrap(),
            "7638417db6d59f3c431d3e1f261cc637155684cd"
        );
        assert!(source
            .default_branch("acme", "tools")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let error = JsonTreeSource::from_file(&path).await.unwrap_err();
        assert!(error.to_string().contains("tree.json"));

        let missing = JsonTreeSource::from_file(&dir.path().join("absent.json")).await;
        assert!(matches!(missing, Err(ScanError::Input { .. })));
    }
}
