//! Catalog Diff Types

use crate::artifact::{ArtifactType, DetectedArtifact};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Classification of one artifact between two scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChangeType {
    New,
    Updated,
    Removed,
    Unchanged,
}

/// A previously recorded catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub id: String,
    pub upstream_url: String,
    #[serde(default)]
    pub detected_sha: Option<String>,
    #[serde(default)]
    pub detected_version: Option<String>,
    pub artifact_type: ArtifactType,
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub change_type: ChangeType,
    /// Join key between prior and fresh artifacts
    pub upstream_url: String,
    pub artifact_type: ArtifactType,
    pub name: String,
    pub path: String,
    pub old_sha: Option<String>,
    pub new_sha: Option<String>,
    pub old_version: Option<String>,
    pub new_version: Option<String>,
    /// Catalog id of the prior entry (updated, removed, unchanged)
    pub existing_entry_id: Option<String>,
    /// Fresh artifact to persist (new, updated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DetectedArtifact>,
}

/// Persistence-ready view of a diff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffProjection {
    pub new: Vec<DetectedArtifact>,
    pub updated: Vec<(String, DetectedArtifact)>,
    pub removed: Vec<String>,
    pub unchanged: Vec<String>,
}

/// Four-way classification of a fresh scan against a prior catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub new: Vec<DiffEntry>,
    pub updated: Vec<DiffEntry>,
    pub removed: Vec<DiffEntry>,
    pub unchanged: Vec<DiffEntry>,
}

impl DiffResult {
    pub fn new_count(&self) -> usize {
        self.new.len()
    }

    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }

    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn unchanged_count(&self) -> usize {
        self.unchanged.len()
    }

    pub fn total(&self) -> usize {
        self.new.len() + self.updated.len() + self.removed.len() + self.unchanged.len()
    }

    pub fn has_changes(&self) -> bool {
        !(self.new.is_empty() && self.updated.is_empty() && self.removed.is_empty())
    }

    /// Split into insert, update, delete and untouched lists for persistence
    pub fn projection(&self) -> DiffProjection {
        let ids = |entries: &[DiffEntry]| -> Vec<String> {
            entries
                .iter()
                .filter_map(|e| e.existing_entry_id.clone())
                .collect()
        };
        DiffProjection {
            new: self.new.iter().filter_map(|e| e.data.clone()).collect(),
            updated: self
                .updated
                .iter()
                .filter_map(|e| Some((e.existing_entry_id.clone()?, e.data.clone()?)))
                .collect(),
            removed: ids(&self.removed),
            unchanged: ids(&self.unchanged),
        }
    }
}
