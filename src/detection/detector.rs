//! Heuristic Artifact Detector
//!
//! Scores every candidate directory of a flat path listing with additive
//! signals, then runs a second pass over single files for the types that are
//! conventionally shipped one-file-per-artifact (commands, agents, hooks).
//!
//! The detector is a pure function of its inputs: the same paths, config and
//! manual mappings always produce the same matches in the same order.

use crate::artifact::{ArtifactType, SignalScores};
use crate::detection::config::{DetectionConfig, TYPE_PRIORITY};
use crate::detection::frontmatter::frontmatter_type;
use crate::detection::layout::{
    is_at_or_below, last_segment, segment_count, split_file_path, PathLayout,
};
use crate::detection::manual::{parent_path, ManualMappings, ManualMatch};
use crate::detection::types::*;
use std::collections::{HashMap, HashSet};

/// Where the resolved type of a directory came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeSource {
    Manual,
    Frontmatter,
    Manifest,
    DirName,
    ParentName,
    Container,
}

/// Raw evidence gathered for one candidate directory
struct DirEvidence<'a> {
    dir: &'a str,
    files: &'a [String],
    container: Option<(&'a str, ArtifactType)>,
    manifest: Option<(ArtifactType, &'a str)>,
    frontmatter: Option<ArtifactType>,
    own_name: Option<ArtifactType>,
    parent_name: Option<ArtifactType>,
    parent_hint: Option<&'a str>,
    has_frontmatter_candidate: bool,
}

/// Stateless classifier over repository path listings
#[derive(Debug, Clone, Default)]
pub struct Detector {
    config: DetectionConfig,
}

impl Detector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Classify a path listing using path information only
    pub fn detect<S: AsRef<str>>(&self, paths: &[S], manual: &ManualMappings) -> Vec<HeuristicMatch> {
        self.run(paths, None, manual)
    }

    /// Classify a path listing, reading frontmatter from the supplied file contents
    pub fn detect_with_content<S: AsRef<str>>(
        &self,
        paths: &[S],
        contents: &HashMap<String, String>,
        manual: &ManualMappings,
    ) -> Vec<HeuristicMatch> {
        self.run(paths, Some(contents), manual)
    }

    fn run<S: AsRef<str>>(
        &self,
        paths: &[S],
        contents: Option<&HashMap<String, String>>,
        manual: &ManualMappings,
    ) -> Vec<HeuristicMatch> {
        let layout = PathLayout::build(paths.iter().map(|p| p.as_ref()), |p| {
            self.config.is_ignored_path(p)
        });
        log::debug!(
            "Detecting artifacts in {} paths ({} ignored or duplicate)",
            layout.file_count(),
            paths.len().saturating_sub(layout.file_count())
        );

        let mut matches = self.detect_directories(&layout, contents, manual);
        let accepted: Vec<String> = matches.iter().map(|m| m.path.clone()).collect();
        matches.extend(self.detect_single_files(&layout, &accepted, manual));

        let min_confidence = self.config.min_confidence;
        let mut seen = HashSet::new();
        let mut results: Vec<HeuristicMatch> = matches
            .into_iter()
            .filter(|m| m.confidence_score >= min_confidence)
            .filter(|m| seen.insert(m.path.clone()))
            .collect();
        results.sort_by(|a, b| {
            b.confidence_score
                .cmp(&a.confidence_score)
                .then_with(|| a.path.cmp(&b.path))
        });

        log::debug!("Detector produced {} matches", results.len());
        results
    }

    fn detect_directories(
        &self,
        layout: &PathLayout,
        contents: Option<&HashMap<String, String>>,
        manual: &ManualMappings,
    ) -> Vec<HeuristicMatch> {
        let mut candidates: Vec<&str> = layout
            .file_dirs()
            .filter(|dir| self.is_directory_candidate(dir, layout))
            .collect();
        candidates.sort_by(|a, b| {
            segment_count(a)
                .cmp(&segment_count(b))
                .then_with(|| a.cmp(b))
        });

        let mut accepted: Vec<HeuristicMatch> = Vec::new();
        for dir in candidates {
            let evidence = self.gather(dir, layout, contents);
            let nested = accepted.iter().any(|m| is_at_or_below(dir, &m.path));
            if nested && evidence.manifest.is_none() {
                continue;
            }

            let found = match manual.resolve(dir) {
                Some(mapping) if mapping.artifact_type == ArtifactType::Skill => {
                    if evidence
                        .manifest
                        .is_some_and(|(t, _)| t == ArtifactType::Skill)
                    {
                        Some(self.manual_directory_match(&evidence, &mapping))
                    } else {
                        log::debug!(
                            "Manual skill mapping '{}' covers '{}' but no skill manifest is present",
                            mapping.mapped_path,
                            dir
                        );
                        self.score_directory(&evidence, layout)
                    }
                }
                _ => self.score_directory(&evidence, layout),
            };

            if let Some(m) = found {
                if m.confidence_score >= self.config.min_confidence {
                    log::debug!(
                        "Accepted directory '{}' as {:?} ({}%)",
                        m.path,
                        m.artifact_type,
                        m.confidence_score
                    );
                    accepted.push(m);
                }
            }
        }
        accepted
    }

    fn is_directory_candidate(&self, dir: &str, layout: &PathLayout) -> bool {
        if dir.is_empty() {
            return layout
                .files_in(dir)
                .iter()
                .any(|f| self.config.manifest_type(f).is_some());
        }
        self.config.container_type(last_segment(dir)).is_none()
    }

    fn gather<'a>(
        &'a self,
        dir: &'a str,
        layout: &'a PathLayout,
        contents: Option<&HashMap<String, String>>,
    ) -> DirEvidence<'a> {
        let files = layout.files_in(dir);
        let manifest = TYPE_PRIORITY.into_iter().find_map(|t| {
            let rules = self.config.rules_for(t)?;
            files
                .iter()
                .find(|f| rules.is_manifest(f))
                .map(|f| (t, f.as_str()))
        });

        let frontmatter = contents.and_then(|contents| {
            files
                .iter()
                .filter(|f| self.config.is_frontmatter_candidate(f))
                .find_map(|f| {
                    let full = join_path(dir, f);
                    let content = contents.get(&full)?;
                    frontmatter_type(&full, content)
                })
        });

        let parent_name = parent_path(dir)
            .filter(|p| !p.is_empty())
            .and_then(|p| self.config.name_type(last_segment(p)));
        let own_name = if dir.is_empty() {
            None
        } else {
            self.config.name_type(last_segment(dir))
        };
        let parent_hint = dir
            .split('/')
            .rev()
            .skip(1)
            .find(|segment| self.config.is_parent_hint(segment));

        DirEvidence {
            dir,
            files,
            container: self.nearest_container(dir, false),
            manifest,
            frontmatter,
            own_name,
            parent_name,
            parent_hint,
            has_frontmatter_candidate: self.config.enable_frontmatter_detection
                && files.iter().any(|f| self.config.is_frontmatter_candidate(f)),
        }
    }

    /// Nearest ancestor (optionally `dir` itself) whose name is a container
    fn nearest_container<'a>(
        &self,
        dir: &'a str,
        inclusive: bool,
    ) -> Option<(&'a str, ArtifactType)> {
        let mut current = if inclusive {
            Some(dir)
        } else {
            parent_path(dir)
        };
        while let Some(path) = current {
            if path.is_empty() {
                return None;
            }
            if let Some(t) = self.config.container_type(last_segment(path)) {
                return Some((path, t));
            }
            current = parent_path(path);
        }
        None
    }

    fn resolve_type(evidence: &DirEvidence<'_>) -> Option<(ArtifactType, TypeSource)> {
        if let Some(t) = evidence.frontmatter {
            return Some((t, TypeSource::Frontmatter));
        }
        if let Some((t, _)) = evidence.manifest {
            return Some((t, TypeSource::Manifest));
        }
        if let Some(t) = evidence.own_name {
            return Some((t, TypeSource::DirName));
        }
        if let Some(t) = evidence.parent_name {
            return Some((t, TypeSource::ParentName));
        }
        evidence
            .container
            .map(|(_, t)| (t, TypeSource::Container))
    }

    /// Additive signal breakdown for `evidence` classified as `artifact_type`
    fn signals(
        &self,
        evidence: &DirEvidence<'_>,
        artifact_type: ArtifactType,
        source: TypeSource,
    ) -> (SignalScores, Vec<String>) {
        let mut signals = SignalScores::default();
        let mut reasons = Vec::new();

        if let Some(t) = evidence.frontmatter {
            if t == artifact_type {
                signals.frontmatter_type = WEIGHT_FRONTMATTER_TYPE;
                reasons.push(format!("frontmatter_type:{}", t));
            }
        }
        if let Some((t, file)) = evidence.manifest {
            if t == artifact_type {
                signals.manifest = WEIGHT_MANIFEST;
                reasons.push(format!("manifest:{}", file));
            }
        }
        if evidence.own_name == Some(artifact_type) {
            signals.dir_name = WEIGHT_DIR_NAME;
            reasons.push("dir_name".to_string());
        } else if evidence.parent_name == Some(artifact_type) {
            signals.dir_name = WEIGHT_PARENT_NAME;
            reasons.push("parent_dir_name".to_string());
        }

        if let Some(rules) = self.config.rules_for(artifact_type) {
            let count = evidence
                .files
                .iter()
                .filter(|f| rules.has_extension(f))
                .count();
            signals.extensions = count.min(MAX_EXTENSION_SCORE as usize) as i32;
            if count > 0 {
                reasons.push(format!("extensions:{}", count));
            }
        }

        if let Some(hint) = evidence.parent_hint {
            signals.parent_hint = WEIGHT_PARENT_HINT;
            reasons.push(format!("parent_hint:{}", hint));
        }
        if evidence.has_frontmatter_candidate {
            signals.frontmatter_candidate = WEIGHT_FRONTMATTER_CANDIDATE;
            reasons.push("frontmatter_candidate".to_string());
        }

        if let Some((container, container_type)) = evidence.container {
            if source == TypeSource::Container {
                signals.container_hint = WEIGHT_CONTAINER_INFERENCE;
                reasons.push(format!("container_inference:{}", container));
            } else if container_type == artifact_type {
                signals.container_hint = WEIGHT_CONTAINER_HINT;
                reasons.push(format!("container_hint:{}", container));
            }
        }

        let depth = segment_count(evidence.dir) as i32;
        signals.depth_penalty = if evidence.container.is_some() {
            depth / 2
        } else {
            depth
        };

        (signals, reasons)
    }

    fn score_directory(
        &self,
        evidence: &DirEvidence<'_>,
        layout: &PathLayout,
    ) -> Option<HeuristicMatch> {
        let (artifact_type, source) = Self::resolve_type(evidence)?;

        // Command/agent/hook directories need direct evidence; otherwise their
        // files are classified individually.
        if artifact_type.is_single_file_kind()
            && matches!(source, TypeSource::ParentName | TypeSource::Container)
        {
            return None;
        }

        let (mut signals, mut reasons) = self.signals(evidence, artifact_type, source);
        let raw = signals.raw_total();
        let mut confidence = normalize_score(raw);

        if artifact_type.is_single_file_kind() {
            let unexpected = layout
                .subdirs_of(evidence.dir)
                .find(|sub| !self.config.is_allowed_nested_dir(sub));
            if let Some(sub) = unexpected {
                signals.flat_structure_penalty = FLAT_STRUCTURE_PENALTY as i32;
                confidence = confidence.saturating_sub(FLAT_STRUCTURE_PENALTY);
                reasons.push(format!("flat_structure_penalty:{}", sub));
            }
        }

        Some(HeuristicMatch {
            path: evidence.dir.to_string(),
            artifact_type: Some(artifact_type),
            confidence_score: confidence,
            raw_score: raw,
            organization_path: directory_organization_path(evidence),
            match_reasons: reasons,
            signals,
            manual_mapping: None,
            is_file: false,
        })
    }

    fn manual_directory_match(
        &self,
        evidence: &DirEvidence<'_>,
        mapping: &ManualMatch,
    ) -> HeuristicMatch {
        let (signals, mut reasons) =
            self.signals(evidence, mapping.artifact_type, TypeSource::Manual);
        reasons.insert(0, "manual_mapping".to_string());
        HeuristicMatch {
            path: evidence.dir.to_string(),
            artifact_type: Some(mapping.artifact_type),
            confidence_score: mapping.confidence(),
            raw_score: signals.raw_total(),
            organization_path: directory_organization_path(evidence),
            match_reasons: reasons,
            signals,
            manual_mapping: Some(mapping.provenance()),
            is_file: false,
        }
    }

    fn detect_single_files(
        &self,
        layout: &PathLayout,
        accepted_dirs: &[String],
        manual: &ManualMappings,
    ) -> Vec<HeuristicMatch> {
        let mut matches = Vec::new();
        for path in layout.files() {
            let (dir, name) = split_file_path(path);
            if !self.config.is_single_file_candidate(name)
                || self.config.manifest_type(name).is_some()
            {
                continue;
            }
            if accepted_dirs.iter().any(|d| is_at_or_below(dir, d)) {
                continue;
            }

            if let Some(mapping) = manual.resolve(path) {
                if mapping.artifact_type == ArtifactType::Skill {
                    continue;
                }
                matches.push(HeuristicMatch {
                    path: path.clone(),
                    artifact_type: Some(mapping.artifact_type),
                    confidence_score: mapping.confidence(),
                    raw_score: 0,
                    organization_path: None,
                    match_reasons: vec!["manual_mapping".to_string()],
                    signals: SignalScores::default(),
                    manual_mapping: Some(mapping.provenance()),
                    is_file: true,
                });
                continue;
            }

            let Some((container, artifact_type)) = self.nearest_container(dir, true) else {
                continue;
            };
            if !artifact_type.is_single_file_kind() {
                continue;
            }
            let expected = self
                .config
                .rules_for(artifact_type)
                .is_some_and(|r| r.has_extension(name));
            if !expected {
                continue;
            }

            let depth = segment_count(dir) - segment_count(container);
            let organization_path = if depth == 0 {
                None
            } else {
                dir.get(container.len() + 1..).map(str::to_string)
            };
            let signals = SignalScores {
                container_hint: WEIGHT_CONTAINER_HINT,
                extensions: 1,
                ..Default::default()
            };
            matches.push(HeuristicMatch {
                path: path.clone(),
                artifact_type: Some(artifact_type),
                confidence_score: single_file_confidence(depth),
                raw_score: signals.raw_total(),
                organization_path,
                match_reasons: vec![
                    "single_file".to_string(),
                    format!("container_hint:{}", container),
                ],
                signals,
                manual_mapping: None,
                is_file: true,
            });
        }
        matches
    }
}

fn join_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Segments strictly between the enclosing container and the directory
fn directory_organization_path(evidence: &DirEvidence<'_>) -> Option<String> {
    let (container, _) = evidence.container?;
    let below = evidence.dir.get(container.len() + 1..)?;
    parent_path(below)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}
