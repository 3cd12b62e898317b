//! Conversion from heuristic matches into detected artifacts

use crate::artifact::types::{ArtifactMetadata, DetectedArtifact};
use crate::detection::HeuristicMatch;

/// Default template used to synthesize `upstream_url`
pub const DEFAULT_UPSTREAM_URL_TEMPLATE: &str = "https://github.com/{owner}/{repo}/tree/{ref}/{path}";

/// Repository coordinates needed to name artifacts and build their join keys
#[derive(Debug, Clone)]
pub struct UpstreamContext {
    pub owner: String,
    pub repo: String,
    pub git_ref: String,
    pub template: String,
}

impl UpstreamContext {
    pub fn new<O: Into<String>, R: Into<String>, G: Into<String>>(
        owner: O,
        repo: R,
        git_ref: G,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            git_ref: git_ref.into(),
            template: DEFAULT_UPSTREAM_URL_TEMPLATE.to_string(),
        }
    }

    pub fn with_template<T: Into<String>>(mut self, template: T) -> Self {
        self.template = template.into();
        self
    }

    /// Render the upstream URL for a repository-relative path
    pub fn upstream_url(&self, path: &str) -> String {
        let rendered = self
            .template
            .replace("{owner}", &self.owner)
            .replace("{repo}", &self.repo)
            .replace("{ref}", &self.git_ref)
            .replace("{path}", path);
        if path.is_empty() {
            rendered.trim_end_matches('/').to_string()
        } else {
            rendered
        }
    }
}

/// Derive the display name for a match at `path`
///
/// Single-file command/agent/hook artifacts drop their trailing extension;
/// a repository-root artifact takes the repository name.
pub fn artifact_name(m: &HeuristicMatch, repo: &str) -> String {
    let last = m.path.rsplit('/').next().unwrap_or("");
    if last.is_empty() {
        return repo.to_string();
    }
    let strip = m.is_file && m.artifact_type.is_some_and(|t| t.is_single_file_kind());
    if strip {
        if let Some((stem, _ext)) = last.rsplit_once('.') {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
    }
    last.to_string()
}

impl DetectedArtifact {
    /// Convert a match into an artifact; untyped matches have no artifact form
    pub fn from_match(
        m: &HeuristicMatch,
        ctx: &UpstreamContext,
        detected_sha: Option<&str>,
    ) -> Option<Self> {
        let artifact_type = m.artifact_type?;
        Some(Self {
            artifact_type,
            name: artifact_name(m, &ctx.repo),
            path: m.path.clone(),
            upstream_url: ctx.upstream_url(&m.path),
            confidence_score: m.confidence_score,
            detected_sha: detected_sha.map(str::to_string),
            detected_version: None,
            raw_score: m.raw_score,
            signals: m.signals,
            single_file: m.is_file,
            metadata: ArtifactMetadata {
                match_reasons: m.match_reasons.clone(),
                manual_mapping: m.manual_mapping.clone(),
                ..Default::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::types::{ArtifactType, SignalScores};

    fn heuristic(path: &str, artifact_type: Option<ArtifactType>, is_file: bool) -> HeuristicMatch {
        HeuristicMatch {
            path: path.to_string(),
            artifact_type,
            confidence_score: 70,
            raw_score: 0,
            organization_path: None,
            match_reasons: vec!["single_file".to_string()],
            signals: SignalScores::default(),
            manual_mapping: None,
            is_file,
        }
    }

    #[test]
    fn test_single_file_command_name_strips_extension() {
        let m = heuristic("commands/review.md", Some(ArtifactType::Command), true);
        assert_eq!(artifact_name(&m, "repo"), "review");
    }

    #[test]
    fn test_directory_skill_keeps_dotted_name() {
        let m = heuristic("skills/web.search", Some(ArtifactType::Skill), false);
        assert_eq!(artifact_name(&m, "repo"), "web.search");
    }

    #[test]
    fn test_root_artifact_takes_repo_name() {
        let m = heuristic("", Some(ArtifactType::Skill), false);
        assert_eq!(artifact_name(&m, "canvas-skill"), "canvas-skill");
    }

    #[test]
    fn test_upstream_url_template() {
        let ctx = UpstreamContext::new("acme", "tools", "main");
        assert_eq!(
            ctx.upstream_url("skills/canvas"),
            "https://github.com/acme/tools/tree/main/skills/canvas"
        );
        assert_eq!(ctx.upstream_url(""), "https://github.com/acme/tools/tree/main");
    }

    #[test]
    fn test_untyped_match_has_no_artifact() {
        let ctx = UpstreamContext::new("acme", "tools", "main");
        let m = heuristic("src/utils", None, false);
        assert!(DetectedArtifact::from_match(&m, &ctx, None).is_none());
    }

    #[test]
    fn test_from_match_carries_sha_and_reasons() {
        let ctx = UpstreamContext::new("acme", "tools", "main");
        let m = heuristic("agents/planner.md", Some(ArtifactType::Agent), true);
        let artifact = DetectedArtifact::from_match(&m, &ctx, Some("c0ffee")).unwrap();
        assert_eq!(artifact.name, "planner");
        assert_eq!(artifact.detected_sha.as_deref(), Some("c0ffee"));
        assert!(artifact.single_file);
        assert_eq!(artifact.metadata.match_reasons, vec!["single_file"]);
    }
}
