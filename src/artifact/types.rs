//! Artifact Types
//!
//! Shared data model for everything a scan produces: artifact kinds, tree
//! listing entries, per-signal score breakdowns and the detected artifact
//! record itself.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Kind of reusable capability an artifact packages
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum ArtifactType {
    #[strum(to_string = "skill")]
    Skill,
    #[strum(to_string = "command")]
    Command,
    #[strum(to_string = "agent")]
    Agent,
    #[strum(to_string = "hook")]
    Hook,
    #[serde(alias = "mcp", alias = "mcp-server")]
    #[strum(to_string = "mcp_server", serialize = "mcp", serialize = "mcp-server")]
    McpServer,
}

impl ArtifactType {
    /// Types that are conventionally shipped as a single file inside a container
    pub fn is_single_file_kind(self) -> bool {
        matches!(
            self,
            ArtifactType::Command | ArtifactType::Agent | ArtifactType::Hook
        )
    }
}

/// Kind of entry in a remote tree listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryType {
    Blob,
    Tree,
    Symlink,
    /// Submodule pointer; never hashed or detected
    Commit,
}

/// One entry of a flat repository tree listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: TreeEntryType,
    pub sha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl TreeEntry {
    pub fn blob<P: Into<String>, S: Into<String>>(path: P, sha: S) -> Self {
        Self {
            path: path.into(),
            entry_type: TreeEntryType::Blob,
            sha: sha.into(),
            size: None,
        }
    }

    /// Blob and symlink entries carry file identity; trees and submodules do not
    pub fn is_file_like(&self) -> bool {
        matches!(self.entry_type, TreeEntryType::Blob | TreeEntryType::Symlink)
    }
}

/// Why an artifact was excluded from the kept set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExcludedReason {
    DuplicateWithinSource,
    DuplicateCrossSource,
    UserManual,
}

/// Per-signal contributions to a heuristic score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalScores {
    pub dir_name: i32,
    pub manifest: i32,
    pub extensions: i32,
    pub parent_hint: i32,
    pub frontmatter_candidate: i32,
    pub container_hint: i32,
    pub frontmatter_type: i32,
    pub depth_penalty: i32,
    /// Subtracted from the normalized confidence, not from the raw score
    pub flat_structure_penalty: i32,
}

impl SignalScores {
    /// Additive total before normalization, floored at zero
    pub fn raw_total(&self) -> i32 {
        let positive = self.dir_name
            + self.manifest
            + self.extensions
            + self.parent_hint
            + self.frontmatter_candidate
            + self.container_hint
            + self.frontmatter_type;
        (positive - self.depth_penalty).max(0)
    }
}

/// Provenance of a manual-mapping override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualMappingProvenance {
    /// Mapped path that matched (the artifact path itself or an ancestor)
    pub mapped_path: String,
    /// Segments between the mapped path and the artifact (0 = exact)
    pub depth: usize,
}

/// Fixed set of optional annotations carried by an artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub match_reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_mapping: Option<ManualMappingProvenance>,
    #[serde(default)]
    pub excluded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_reason: Option<ExcludedReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// A classified artifact found in a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedArtifact {
    pub artifact_type: ArtifactType,
    pub name: String,
    /// Repository-relative path (forward slashes, no leading slash)
    pub path: String,
    /// Unique join key across scans
    pub upstream_url: String,
    pub confidence_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_version: Option<String>,
    pub raw_score: i32,
    pub signals: SignalScores,
    /// True when the artifact is a single file rather than a directory
    #[serde(default)]
    pub single_file: bool,
    #[serde(default)]
    pub metadata: ArtifactMetadata,
}

impl DetectedArtifact {
    pub fn content_hash(&self) -> Option<&str> {
        self.metadata.content_hash.as_deref()
    }

    pub fn is_manual(&self) -> bool {
        self.metadata.manual_mapping.is_some()
    }

    pub fn is_excluded(&self) -> bool {
        self.metadata.excluded
    }

    /// Mark this artifact excluded for the given reason
    pub fn exclude(&mut self, reason: ExcludedReason, duplicate_of: Option<String>) {
        self.metadata.excluded = true;
        self.metadata.excluded_reason = Some(reason);
        self.metadata.duplicate_of = duplicate_of;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_artifact_type_parses_aliases() {
        assert_eq!(ArtifactType::from_str("skill").unwrap(), ArtifactType::Skill);
        assert_eq!(ArtifactType::from_str("SKILL").unwrap(), ArtifactType::Skill);
        assert_eq!(
            ArtifactType::from_str("mcp").unwrap(),
            ArtifactType::McpServer
        );
        assert_eq!(
            ArtifactType::from_str("mcp-server").unwrap(),
            ArtifactType::McpServer
        );
        assert!(ArtifactType::from_str("plugin").is_err());
    }

    #[test]
    fn test_artifact_type_display_matches_serde() {
        assert_eq!(ArtifactType::McpServer.to_string(), "mcp_server");
        let json = serde_json::to_string(&ArtifactType::McpServer).unwrap();
        assert_eq!(json, "\"mcp_server\"");
    }

    #[test]
    fn test_tree_entry_deserializes_github_listing() {
        let json = r#"{"path":"skills/a/SKILL.md","type":"blob","sha":"abc","size":12}"#;
        let entry: TreeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.entry_type, TreeEntryType::Blob);
        assert_eq!(entry.size, Some(12));
        assert!(entry.is_file_like());
    }

    #[test]
    fn test_raw_total_floors_at_zero() {
        let signals = SignalScores {
            extensions: 1,
            depth_penalty: 6,
            ..Default::default()
        };
        assert_eq!(signals.raw_total(), 0);
    }

    #[test]
    fn test_exclude_annotates_metadata() {
        let mut artifact = DetectedArtifact {
            artifact_type: ArtifactType::Skill,
            name: "a".to_string(),
            path: "skills/a".to_string(),
            upstream_url: "u".to_string(),
            confidence_score: 40,
            detected_sha: None,
            detected_version: None,
            raw_score: 48,
            signals: SignalScores::default(),
            single_file: false,
            metadata: ArtifactMetadata::default(),
        };
        artifact.exclude(
            ExcludedReason::DuplicateWithinSource,
            Some("skills/b".to_string()),
        );
        assert!(artifact.is_excluded());
        assert_eq!(artifact.metadata.duplicate_of.as_deref(), Some("skills/b"));
        assert_eq!(
            ExcludedReason::DuplicateWithinSource.to_string(),
            "duplicate_within_source"
        );
    }
}
