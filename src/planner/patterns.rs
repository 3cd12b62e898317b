//! Sparse-Checkout Pattern Generation
//!
//! Patterns are forward-slash repository paths. Directory globs always end
//! in `/**` and are never the whole repository.

use crate::artifact::{ArtifactType, DetectedArtifact};
use crate::detection::manual::parent_path;
use indexmap::IndexSet;
use std::collections::HashSet;

/// Manifest files to fetch per type, most preferred first
pub fn manifest_priority(artifact_type: ArtifactType) -> &'static [&'static str] {
    match artifact_type {
        ArtifactType::Skill => &["SKILL.md"],
        ArtifactType::Command => &["command.yaml", "command.yml", "COMMAND.md"],
        ArtifactType::Agent => &["agent.yaml", "agent.yml", "AGENT.md"],
        ArtifactType::Hook => &["hook.yaml", "hook.yml"],
        ArtifactType::McpServer => &["mcp.json", "package.json"],
    }
}

fn is_whole_repo(pattern: &str) -> bool {
    matches!(pattern, "" | "**" | "/**" | "*" | "/")
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

fn dir_glob(dir: &str) -> Option<String> {
    let dir = dir.trim_matches('/');
    if dir.is_empty() {
        None
    } else {
        Some(format!("{}/**", dir))
    }
}

/// Longest shared directory of the artifact paths
///
/// A lone artifact yields its parent. When the shared prefix is itself one of
/// the artifacts, its parent is used instead. Disjoint roots yield `None`.
pub fn common_root<S: AsRef<str>>(paths: &[S]) -> Option<String> {
    let mut iter = paths.iter().map(|p| p.as_ref().trim_matches('/'));
    let first = iter.next()?;
    let mut shared: Vec<&str> = first.split('/').filter(|s| !s.is_empty()).collect();
    for path in iter {
        let common = shared
            .iter()
            .zip(path.split('/'))
            .take_while(|(a, b)| *a == b)
            .count();
        shared.truncate(common);
        if shared.is_empty() {
            return None;
        }
    }

    let mut root = shared.join("/");
    if paths.iter().any(|p| p.as_ref().trim_matches('/') == root) {
        root = parent_path(&root).unwrap_or("").to_string();
    }
    if root.is_empty() {
        None
    } else {
        Some(root)
    }
}

/// One manifest path per artifact
///
/// With `known_paths`, the first priority manifest that exists is chosen and
/// artifacts without any fall back to a directory glob. Without it, the first
/// priority manifest is assumed. Single-file artifacts fetch themselves.
pub fn manifest_patterns(
    artifacts: &[DetectedArtifact],
    known_paths: Option<&HashSet<String>>,
) -> Vec<String> {
    let mut patterns = IndexSet::new();
    for artifact in artifacts {
        if artifact.single_file {
            patterns.insert(artifact.path.clone());
            continue;
        }
        let mut candidates = manifest_priority(artifact.artifact_type)
            .iter()
            .map(|name| join(&artifact.path, name));
        let chosen = match known_paths {
            Some(known) => candidates
                .find(|c| known.contains(c))
                .or_else(|| dir_glob(&artifact.path)),
            None => candidates.next(),
        };
        if let Some(pattern) = chosen {
            patterns.insert(pattern);
        }
    }
    patterns
        .into_iter()
        .filter(|p| !is_whole_repo(p))
        .collect()
}

/// Directory globs covering every artifact
///
/// A common root gives a single glob. Otherwise artifacts are grouped by the
/// first two segments of their parent directory; if that yields nothing the
/// manifest patterns are used.
pub fn directory_patterns(
    artifacts: &[DetectedArtifact],
    root: Option<&str>,
    known_paths: Option<&HashSet<String>>,
) -> Vec<String> {
    if let Some(pattern) = root.and_then(dir_glob) {
        return vec![pattern];
    }

    let mut groups = IndexSet::new();
    for artifact in artifacts {
        let parent = parent_path(&artifact.path).unwrap_or("");
        let base = if parent.is_empty() {
            artifact.path.as_str()
        } else {
            parent
        };
        let key: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).take(2).collect();
        if let Some(pattern) = dir_glob(&key.join("/")) {
            groups.insert(pattern);
        }
    }

    if groups.is_empty() {
        manifest_patterns(artifacts, known_paths)
    } else {
        groups.into_iter().collect()
    }
}
