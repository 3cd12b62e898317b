//! Clone Target Planning
//!
//! A [`CloneTarget`] records how the next scan of a repository should fetch
//! content, and which tree it was computed against so an unchanged tree can
//! skip re-indexing entirely.

use crate::artifact::DetectedArtifact;
use crate::planner::error::PlannerResult;
use crate::planner::patterns::{common_root, directory_patterns, manifest_patterns};
use crate::planner::strategy::{select_strategy, CloneStrategy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Persisted fetch plan for one repository tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneTarget {
    pub strategy: CloneStrategy,
    pub sparse_patterns: Vec<String>,
    pub artifacts_root: Option<String>,
    pub artifact_paths: Vec<String>,
    /// Identity of the tree the plan was computed against
    pub tree_sha: String,
    pub computed_at: DateTime<Utc>,
}

impl CloneTarget {
    pub fn to_json(&self) -> PlannerResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> PlannerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builds clone targets, honouring an optional configured strategy
#[derive(Debug, Clone, Default)]
pub struct ClonePlanner {
    strategy_override: Option<CloneStrategy>,
}

impl ClonePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy_override(mut self, strategy: Option<CloneStrategy>) -> Self {
        self.strategy_override = strategy;
        self
    }

    /// Plan the fetch for `artifacts` found in the tree `tree_sha`
    ///
    /// `known_paths` is the set of file paths in the tree; when given,
    /// manifest patterns only name files that exist.
    pub fn plan(
        &self,
        artifacts: &[DetectedArtifact],
        tree_sha: &str,
        known_paths: Option<&HashSet<String>>,
        computed_at: DateTime<Utc>,
    ) -> CloneTarget {
        let artifact_paths: Vec<String> = artifacts.iter().map(|a| a.path.clone()).collect();
        let artifacts_root = common_root(artifact_paths.as_slice());

        let mut strategy = if artifacts.is_empty() {
            CloneStrategy::Api
        } else {
            self.strategy_override
                .unwrap_or_else(|| select_strategy(artifacts.len(), artifacts_root.is_some()))
        };

        let sparse_patterns = match strategy {
            CloneStrategy::Api => Vec::new(),
            CloneStrategy::SparseManifest => manifest_patterns(artifacts, known_paths),
            CloneStrategy::SparseDirectory => {
                directory_patterns(artifacts, artifacts_root.as_deref(), known_paths)
            }
        };
        if strategy != CloneStrategy::Api && sparse_patterns.is_empty() {
            log::warn!(
                "No sparse patterns for {} artifacts under {}; falling back to api",
                artifacts.len(),
                strategy
            );
            strategy = CloneStrategy::Api;
        }

        log::debug!(
            "Clone target for tree {}: {} with {} pattern(s)",
            tree_sha,
            strategy,
            sparse_patterns.len()
        );
        CloneTarget {
            strategy,
            sparse_patterns,
            artifacts_root,
            artifact_paths,
            tree_sha: tree_sha.to_string(),
            computed_at,
        }
    }
}

/// True unless a cached plan exists for exactly this tree
pub fn should_reindex(cached: Option<&CloneTarget>, current_tree_sha: &str) -> bool {
    match cached {
        Some(target) => target.tree_sha != current_tree_sha,
        None => true,
    }
}

/// Artifacts whose path was not part of the cached plan
pub fn changed_artifacts<'a>(
    cached: Option<&CloneTarget>,
    current: &'a [DetectedArtifact],
) -> Vec<&'a DetectedArtifact> {
    let Some(target) = cached else {
        return current.iter().collect();
    };
    let known: HashSet<&str> = target.artifact_paths.iter().map(String::as_str).collect();
    current
        .iter()
        .filter(|a| !known.contains(a.path.as_str()))
        .collect()
}
