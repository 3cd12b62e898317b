//! Scanner Types
//!
//! Request and result records for one scan of one repository.

use crate::artifact::DetectedArtifact;
use crate::detection::ManualMappings;
use crate::diff::{CatalogRow, DiffResult};
use crate::planner::CloneTarget;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use strum_macros::Display;

/// What to scan, plus the caller's prior state for this source
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub owner: String,
    pub repo: String,
    /// Ref to scan; `None` uses the configured default ref with branch fallback
    pub git_ref: Option<String>,
    /// Only paths at or below this prefix are scanned
    pub root_hint: Option<String>,
    /// Content hashes already catalogued from other sources
    pub existing_hashes: Option<HashSet<String>>,
    /// Catalog rows from the previous scan of this source
    pub prior_catalog: Option<Vec<CatalogRow>>,
    /// Clone target stored by the previous scan of this source
    pub cached_target: Option<CloneTarget>,
    /// Replaces the configured manual mappings for this scan
    pub manual_mappings: Option<ManualMappings>,
    /// File contents keyed by path, enabling frontmatter type detection
    pub contents: Option<HashMap<String, String>>,
}

impl ScanRequest {
    pub fn new<O: Into<String>, R: Into<String>>(owner: O, repo: R) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            ..Default::default()
        }
    }

    pub fn with_ref<S: Into<String>>(mut self, git_ref: S) -> Self {
        self.git_ref = Some(git_ref.into());
        self
    }

    pub fn with_root_hint<S: Into<String>>(mut self, root_hint: S) -> Self {
        self.root_hint = Some(root_hint.into());
        self
    }

    pub fn with_existing_hashes(mut self, hashes: HashSet<String>) -> Self {
        self.existing_hashes = Some(hashes);
        self
    }

    pub fn with_prior_catalog(mut self, rows: Vec<CatalogRow>) -> Self {
        self.prior_catalog = Some(rows);
        self
    }

    pub fn with_cached_target(mut self, target: CloneTarget) -> Self {
        self.cached_target = Some(target);
        self
    }

    pub fn with_manual_mappings(mut self, mappings: ManualMappings) -> Self {
        self.manual_mappings = Some(mappings);
        self
    }

    pub fn with_contents(mut self, contents: HashMap<String, String>) -> Self {
        self.contents = Some(contents);
        self
    }

    /// `owner/repo` label used in log lines
    pub fn source_label(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScanStatus {
    Success,
    Error,
}

/// Aggregate outcome of one scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub status: ScanStatus,
    pub owner: String,
    pub repo: String,
    /// Ref the tree was actually fetched at
    pub git_ref: Option<String>,
    pub commit_sha: Option<String>,
    pub tree_sha: Option<String>,
    /// Kept artifacts followed by excluded ones
    pub artifacts: Vec<DetectedArtifact>,
    pub total_detected: usize,
    pub total_unique: usize,
    pub duplicates_within_source: usize,
    pub duplicates_cross_source: usize,
    pub new_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<DiffResult>,
    pub clone_target: Option<CloneTarget>,
    /// The tree identity matched the cached clone target; detection was skipped
    #[serde(default)]
    pub tree_unchanged: bool,
    /// The listing was cut short by the remote or by the path cap
    #[serde(default)]
    pub truncated: bool,
    pub scan_duration_ms: u64,
    pub errors: Vec<String>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanResult {
    /// Empty successful result for `request`
    pub fn started(request: &ScanRequest, scanned_at: DateTime<Utc>) -> Self {
        Self {
            status: ScanStatus::Success,
            owner: request.owner.clone(),
            repo: request.repo.clone(),
            git_ref: None,
            commit_sha: None,
            tree_sha: None,
            artifacts: Vec::new(),
            total_detected: 0,
            total_unique: 0,
            duplicates_within_source: 0,
            duplicates_cross_source: 0,
            new_count: 0,
            diff: None,
            clone_target: None,
            tree_unchanged: false,
            truncated: false,
            scan_duration_ms: 0,
            errors: Vec::new(),
            scanned_at,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ScanStatus::Success
    }

    pub fn kept(&self) -> impl Iterator<Item = &DetectedArtifact> {
        self.artifacts.iter().filter(|a| !a.is_excluded())
    }

    pub fn excluded(&self) -> impl Iterator<Item = &DetectedArtifact> {
        self.artifacts.iter().filter(|a| a.is_excluded())
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates_within_source + self.duplicates_cross_source
    }
}
