//! Test suites for the deduplication engine

pub mod within_source;

#[cfg(test)]
pub(crate) fn artifact(path: &str, confidence: u8) -> crate::artifact::DetectedArtifact {
    use crate::artifact::{ArtifactMetadata, ArtifactType, DetectedArtifact, SignalScores};
    DetectedArtifact {
        artifact_type: ArtifactType::Skill,
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        upstream_url: format!("https://github.com/acme/tools/tree/main/{path}"),
        confidence_score: confidence,
        detected_sha: None,
        detected_version: None,
        raw_score: 0,
        signals: SignalScores::default(),
        single_file: false,
        metadata: ArtifactMetadata::default(),
    }
}

#[cfg(test)]
pub(crate) fn single_file(name: &str, content: &str) -> Vec<(String, String)> {
    vec![(name.to_string(), content.to_string())]
}
