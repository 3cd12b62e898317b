//! Manifest Metadata Enrichment
//!
//! Optional search metadata attached to detected artifacts. Extraction never
//! affects classification or hashing.

use crate::artifact::{ArtifactType, DetectedArtifact};
use crate::detection::frontmatter::parse_frontmatter;
use crate::detection::layout::split_file_path;
use crate::detection::DetectionConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Descriptive fields read from an artifact's manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Looks up manifest metadata for an artifact
pub trait MetadataExtractor: Send + Sync {
    fn extract(&self, artifact_type: ArtifactType, path: &str) -> Option<ManifestMetadata>;
}

/// Copy extracted metadata onto `artifact`
pub fn enrich(artifact: &mut DetectedArtifact, extractor: &dyn MetadataExtractor) {
    if let Some(found) = extractor.extract(artifact.artifact_type, &artifact.path) {
        artifact.metadata.title = found.title;
        artifact.metadata.description = found.description;
        artifact.metadata.tags = found.tags;
    }
}

/// Reads `name`/`title`, `description` and `tags` from markdown frontmatter
///
/// Single-file artifacts read their own content. Directory artifacts read a
/// markdown manifest found directly inside them, preferring the manifest of
/// their own type.
#[derive(Debug, Clone, Default)]
pub struct FrontmatterMetadataExtractor {
    contents: HashMap<String, String>,
    config: DetectionConfig,
}

impl FrontmatterMetadataExtractor {
    pub fn new(contents: HashMap<String, String>) -> Self {
        Self {
            contents,
            config: DetectionConfig::default(),
        }
    }

    fn manifest_for(&self, artifact_type: ArtifactType, path: &str) -> Option<(&str, &str)> {
        if let Some((file, content)) = self.contents.get_key_value(path) {
            return Some((file.as_str(), content.as_str()));
        }
        self.contents
            .iter()
            .filter_map(|(file, content)| {
                let (dir, name) = split_file_path(file);
                (dir == path && self.config.is_frontmatter_candidate(name)).then(|| {
                    let other_type = self.config.manifest_type(name) != Some(artifact_type);
                    (other_type, file.as_str(), content.as_str())
                })
            })
            .min()
            .map(|(_, file, content)| (file, content))
    }
}

fn text(mapping: &serde_yaml::Mapping, key: &str) -> Option<String> {
    mapping
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn tags(mapping: &serde_yaml::Mapping) -> Vec<String> {
    match mapping.get("tags") {
        Some(serde_yaml::Value::Sequence(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(serde_yaml::Value::String(list)) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

impl MetadataExtractor for FrontmatterMetadataExtractor {
    fn extract(&self, artifact_type: ArtifactType, path: &str) -> Option<ManifestMetadata> {
        let (file, content) = self.manifest_for(artifact_type, path)?;
        let mapping = parse_frontmatter(file, content)?;
        Some(ManifestMetadata {
            title: text(&mapping, "title").or_else(|| text(&mapping, "name")),
            description: text(&mapping, "description"),
            tags: tags(&mapping),
        })
    }
}
