//! Test helpers for scanner unit tests
//!
//! Separate from the integration helpers in tests/common/ because unit tests
//! can reach crate-private items such as `MockTimeProvider`.

use crate::artifact::TreeEntry;
use crate::config::ScanConfig;
use crate::core::time::MockTimeProvider;
use crate::scanner::error::{SourceError, SourceResult};
use crate::scanner::orchestrator::ArtifactScanner;
use crate::scanner::source::{RepoTree, RepositorySource};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// 2023-11-14T22:13:20Z
pub const FIXED_EPOCH_SECS: u64 = 1_700_000_000;

/// In-memory repository with per-ref trees and failure injection
#[derive(Default)]
pub struct FakeSource {
    trees: HashMap<String, RepoTree>,
    commits: HashMap<String, String>,
    default_branch: String,
    failure: Option<SourceError>,
    fetched: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            default_branch: "main".to_string(),
            ..Default::default()
        }
    }

    pub fn with_tree(mut self, git_ref: &str, tree: RepoTree) -> Self {
        self.commits
            .insert(git_ref.to_string(), format!("commit-{}", git_ref));
        self.trees.insert(git_ref.to_string(), tree);
        self
    }

    pub fn with_default_branch(mut self, branch: &str) -> Self {
        self.default_branch = branch.to_string();
        self
    }

    pub fn without_commits(mut self) -> Self {
        self.commits.clear();
        self
    }

    pub fn failing_with(mut self, error: SourceError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Refs requested from `fetch_tree`, in call order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositorySource for FakeSource {
    async fn fetch_tree(&self, _owner: &str, _repo: &str, git_ref: &str) -> SourceResult<RepoTree> {
        self.fetched.lock().unwrap().push(git_ref.to_string());
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.trees
            .get(git_ref)
            .cloned()
            .ok_or_else(|| SourceError::not_found(format!("ref '{}'", git_ref)))
    }

    async fn default_branch(&self, _owner: &str, _repo: &str) -> SourceResult<String> {
        Ok(self.default_branch.clone())
    }

    async fn resolve_commit(&self, _owner: &str, _repo: &str, git_ref: &str) -> SourceResult<String> {
        self.commits
            .get(git_ref)
            .cloned()
            .ok_or_else(|| SourceError::not_found(format!("commit for '{}'", git_ref)))
    }
}

/// Blob entries whose sha is derived from `content`
pub fn blobs(files: &[(&str, &str)]) -> Vec<TreeEntry> {
    files
        .iter()
        .map(|(path, content)| TreeEntry::blob(*path, format!("blob-{}", content)))
        .collect()
}

pub fn tree(sha: &str, files: &[(&str, &str)]) -> RepoTree {
    RepoTree::new(sha, blobs(files))
}

pub fn fixed_clock() -> Arc<MockTimeProvider> {
    Arc::new(MockTimeProvider::at(
        SystemTime::UNIX_EPOCH + Duration::from_secs(FIXED_EPOCH_SECS),
    ))
}

pub fn scanner(source: Arc<FakeSource>) -> ArtifactScanner {
    scanner_with_config(source, ScanConfig::default())
}

pub fn scanner_with_config(source: Arc<FakeSource>, config: ScanConfig) -> ArtifactScanner {
    ArtifactScanner::builder(source)
        .with_config(config)
        .with_time_provider(fixed_clock())
        .build()
}
