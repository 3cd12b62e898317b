//! Common test utilities and helpers
//!
//! An in-memory repository host plus tree fixtures, built only on the public
//! library surface.

#![allow(dead_code)]

use async_trait::async_trait;
use reposcout::artifact::{DetectedArtifact, TreeEntry};
use reposcout::diff::CatalogRow;
use reposcout::scanner::{RepoTree, RepositorySource, SourceError, SourceResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// Repository host keyed by `owner/repo`, each with per-ref trees
#[derive(Default)]
pub struct InMemorySource {
    repos: Mutex<HashMap<String, Repo>>,
}

#[derive(Default, Clone)]
struct Repo {
    default_branch: String,
    trees: HashMap<String, RepoTree>,
    failure: Option<SourceError>,
}

fn key(owner: &str, repo: &str) -> String {
    format!("{}/{}", owner, repo)
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `tree` at `git_ref`; the first published ref becomes the default branch
    pub fn publish(&self, owner: &str, repo: &str, git_ref: &str, tree: RepoTree) {
        let mut repos = self.repos.lock().unwrap();
        let entry = repos.entry(key(owner, repo)).or_default();
        if entry.default_branch.is_empty() {
            entry.default_branch = git_ref.to_string();
        }
        entry.trees.insert(git_ref.to_string(), tree);
    }

    pub fn fail(&self, owner: &str, repo: &str, error: SourceError) {
        let mut repos = self.repos.lock().unwrap();
        repos.entry(key(owner, repo)).or_default().failure = Some(error);
    }

    fn repo(&self, owner: &str, repo: &str) -> SourceResult<Repo> {
        let repos = self.repos.lock().unwrap();
        let found = repos
            .get(&key(owner, repo))
            .cloned()
            .ok_or_else(|| SourceError::not_found(format!("repository {}/{}", owner, repo)))?;
        match &found.failure {
            Some(error) => Err(error.clone()),
            None => Ok(found),
        }
    }
}

#[async_trait]
impl RepositorySource for InMemorySource {
    async fn fetch_tree(&self, owner: &str, repo: &str, git_ref: &str) -> SourceResult<RepoTree> {
        self.repo(owner, repo)?
            .trees
            .remove(git_ref)
            .ok_or_else(|| SourceError::not_found(format!("ref '{}'", git_ref)))
    }

    async fn default_branch(&self, owner: &str, repo: &str) -> SourceResult<String> {
        Ok(self.repo(owner, repo)?.default_branch)
    }

    async fn resolve_commit(&self, owner: &str, repo: &str, git_ref: &str) -> SourceResult<String> {
        let tree = self.fetch_tree(owner, repo, git_ref).await?;
        Ok(format!("commit-{}", tree.sha))
    }
}

/// Tree whose blob shas are derived from file contents
pub fn tree(sha: &str, files: &[(&str, &str)]) -> RepoTree {
    RepoTree::new(
        sha,
        files
            .iter()
            .map(|(path, content)| TreeEntry::blob(*path, format!("blob-{}", content)))
            .collect(),
    )
}

/// Catalog rows as a caller would persist them after a scan
pub fn catalog_rows(artifacts: &[DetectedArtifact]) -> Vec<CatalogRow> {
    artifacts
        .iter()
        .enumerate()
        .map(|(index, artifact)| CatalogRow {
            id: format!("row-{}", index + 1),
            upstream_url: artifact.upstream_url.clone(),
            detected_sha: artifact.detected_sha.clone(),
            detected_version: artifact.detected_version.clone(),
            artifact_type: artifact.artifact_type,
            name: artifact.name.clone(),
            path: artifact.path.clone(),
        })
        .collect()
}
