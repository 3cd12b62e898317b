//! Manual Mapping Overrides
//!
//! Caller-supplied `path -> type` table. A mapping applies to the mapped path
//! and everything beneath it; lookups walk up the path one segment at a time
//! and return the longest mapped prefix.

use crate::artifact::{ArtifactType, ManualMappingProvenance};
use crate::detection::types::manual_confidence;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Result of resolving a path against the mapping table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualMatch {
    pub artifact_type: ArtifactType,
    pub mapped_path: String,
    /// Segments between the mapped path and the resolved path (0 = exact)
    pub depth: usize,
}

impl ManualMatch {
    pub fn confidence(&self) -> u8 {
        manual_confidence(self.depth)
    }

    pub fn provenance(&self) -> ManualMappingProvenance {
        ManualMappingProvenance {
            mapped_path: self.mapped_path.clone(),
            depth: self.depth,
        }
    }
}

/// Normalize a repository path: forward slashes, no leading `./` or slashes
pub fn normalize_path(path: &str) -> String {
    let forward = path.replace('\\', "/");
    let mut trimmed = forward.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.trim_matches('/').to_string()
}

/// Parent of a normalized path; the root's parent is `None`
pub fn parent_path(path: &str) -> Option<&str> {
    if path.is_empty() {
        return None;
    }
    Some(path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or(""))
}

/// Sorted prefix map of manual mappings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualMappings {
    entries: BTreeMap<String, ArtifactType>,
}

impl ManualMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw `(path, type)` pairs; unrecognised types are dropped with a warning
    pub fn from_pairs<I, P, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, T)>,
        P: AsRef<str>,
        T: AsRef<str>,
    {
        let mut mappings = Self::new();
        for (path, type_name) in pairs {
            match ArtifactType::from_str(type_name.as_ref().trim()) {
                Ok(artifact_type) => mappings.insert(path.as_ref(), artifact_type),
                Err(_) => log::warn!(
                    "Dropping manual mapping '{}': unrecognised artifact type '{}'",
                    path.as_ref(),
                    type_name.as_ref()
                ),
            }
        }
        mappings
    }

    pub fn insert(&mut self, path: &str, artifact_type: ArtifactType) {
        let key = normalize_path(path);
        if key.is_empty() {
            log::warn!("Ignoring manual mapping for the repository root");
            return;
        }
        self.entries.insert(key, artifact_type);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ArtifactType)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Longest mapped prefix of `path` (exact match first, then ancestors)
    pub fn resolve(&self, path: &str) -> Option<ManualMatch> {
        if self.entries.is_empty() {
            return None;
        }
        let normalized = normalize_path(path);
        let mut candidate = normalized.as_str();
        let mut depth = 0usize;
        loop {
            if candidate.is_empty() {
                return None;
            }
            if let Some(artifact_type) = self.entries.get(candidate) {
                return Some(ManualMatch {
                    artifact_type: *artifact_type,
                    mapped_path: candidate.to_string(),
                    depth,
                });
            }
            candidate = parent_path(candidate)?;
            depth += 1;
        }
    }
}
