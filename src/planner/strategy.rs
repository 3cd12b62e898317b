//! Fetch Strategy Selection

use crate::planner::error::{PlannerError, PlannerResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// Below this many artifacts, per-file API reads beat any checkout
pub const API_MAX_ARTIFACTS: usize = 2;
/// Up to this many artifacts, fetching only manifests is cheapest
pub const SPARSE_MANIFEST_MAX_ARTIFACTS: usize = 20;

/// How the next scan should fetch repository content
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CloneStrategy {
    /// No clone; read individual files through the API
    Api,
    /// Sparse checkout of one manifest file per artifact
    SparseManifest,
    /// Sparse checkout of whole artifact directories
    SparseDirectory,
}

impl CloneStrategy {
    /// Parse a configured strategy name, rejecting unknown values
    pub fn parse(value: &str) -> PlannerResult<Self> {
        Self::from_str(value.trim()).map_err(|_| PlannerError::InvalidStrategy {
            value: value.to_string(),
        })
    }
}

/// Choose a strategy from the artifact count and layout
///
/// Large sets without a shared root fall back to manifests; a broad clone is
/// never selected.
pub fn select_strategy(artifact_count: usize, has_common_root: bool) -> CloneStrategy {
    match artifact_count {
        0..=API_MAX_ARTIFACTS => CloneStrategy::Api,
        n if n <= SPARSE_MANIFEST_MAX_ARTIFACTS => CloneStrategy::SparseManifest,
        _ if has_common_root => CloneStrategy::SparseDirectory,
        _ => CloneStrategy::SparseManifest,
    }
}
