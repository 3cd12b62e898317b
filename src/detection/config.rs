//! Detection Configuration
//!
//! Immutable lookup tables and thresholds for the heuristic detector. Built
//! once (usually from [`DetectionConfig::default`] plus file overrides) and
//! shared read-only by every scan.

use crate::artifact::ArtifactType;
use crate::detection::types::DEFAULT_MIN_CONFIDENCE;
use std::collections::HashMap;

/// Per-type recognition rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRules {
    /// Directory-name tokens that suggest the type (lowercase)
    pub name_tokens: Vec<String>,
    /// Manifest file names, in priority order (compared case-insensitively)
    pub manifests: Vec<String>,
    /// File extensions expected inside an artifact of this type (no dot)
    pub extensions: Vec<String>,
}

impl TypeRules {
    fn new(name_tokens: &[&str], manifests: &[&str], extensions: &[&str]) -> Self {
        Self {
            name_tokens: name_tokens.iter().map(|s| s.to_string()).collect(),
            manifests: manifests.iter().map(|s| s.to_string()).collect(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn is_manifest(&self, file_name: &str) -> bool {
        self.manifests
            .iter()
            .any(|m| m.eq_ignore_ascii_case(file_name))
    }

    pub fn has_extension(&self, file_name: &str) -> bool {
        match extension_of(file_name) {
            Some(ext) => self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    /// True when the directory name, or one of its `-`/`_`/`.` separated words, is a token
    pub fn name_matches(&self, dir_name: &str) -> bool {
        let lowered = dir_name.to_ascii_lowercase();
        if self.name_tokens.iter().any(|t| *t == lowered) {
            return true;
        }
        lowered
            .split(['-', '_', '.', ' '])
            .filter(|w| !w.is_empty())
            .any(|word| self.name_tokens.iter().any(|t| t == word))
    }
}

/// Extension of a file name without the dot; dotfiles without a second dot have none
pub fn extension_of(file_name: &str) -> Option<&str> {
    let trimmed = file_name.strip_prefix('.').unwrap_or(file_name);
    trimmed.rsplit_once('.').map(|(_, ext)| ext)
}

/// Tables and thresholds driving the detector
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    pub min_confidence: u8,
    pub enable_frontmatter_detection: bool,
    /// Container directory name (lowercase) to the type it holds
    pub containers: HashMap<String, ArtifactType>,
    pub rules: HashMap<ArtifactType, TypeRules>,
    /// Ancestor segments that hint at an artifact layout (lowercase)
    pub parent_hints: Vec<String>,
    /// Subdirectories that do not trigger the flat-structure penalty
    pub allowed_nested_dirs: Vec<String>,
    /// Extensions eligible for single-file detection
    pub single_file_extensions: Vec<String>,
    /// File names never treated as single-file artifacts (lowercase)
    pub ignored_file_names: Vec<String>,
    /// Paths matching any of these globs are dropped before detection
    pub ignore_patterns: Vec<glob::Pattern>,
}

/// Type order used when more than one type claims the same evidence
pub const TYPE_PRIORITY: [ArtifactType; 5] = [
    ArtifactType::Skill,
    ArtifactType::Command,
    ArtifactType::Agent,
    ArtifactType::Hook,
    ArtifactType::McpServer,
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for DetectionConfig {
    fn default() -> Self {
        let containers = [
            ("skills", ArtifactType::Skill),
            ("commands", ArtifactType::Command),
            ("agents", ArtifactType::Agent),
            ("hooks", ArtifactType::Hook),
            ("mcp", ArtifactType::McpServer),
            ("mcp-servers", ArtifactType::McpServer),
            ("mcp_servers", ArtifactType::McpServer),
        ]
        .into_iter()
        .map(|(name, t)| (name.to_string(), t))
        .collect();

        let mut rules = HashMap::new();
        rules.insert(
            ArtifactType::Skill,
            TypeRules::new(&["skill", "skills"], &["SKILL.md"], &["md", "py", "ts", "js", "sh"]),
        );
        rules.insert(
            ArtifactType::Command,
            TypeRules::new(
                &["command", "commands", "cmd", "cmds"],
                &["COMMAND.md", "command.yaml", "command.yml"],
                &["md", "yaml", "yml"],
            ),
        );
        rules.insert(
            ArtifactType::Agent,
            TypeRules::new(
                &["agent", "agents", "subagent", "subagents"],
                &["AGENT.md", "agent.yaml", "agent.yml"],
                &["md", "yaml", "yml"],
            ),
        );
        rules.insert(
            ArtifactType::Hook,
            TypeRules::new(
                &["hook", "hooks"],
                &["HOOK.md", "hook.yaml", "hook.yml", "hooks.json"],
                &["sh", "json", "py", "js"],
            ),
        );
        rules.insert(
            ArtifactType::McpServer,
            TypeRules::new(
                &["mcp", "mcp-server", "mcp-servers", "mcp_server", "mcp_servers"],
                &["mcp.json", ".mcp.json"],
                &["json", "ts", "js", "py"],
            ),
        );

        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            enable_frontmatter_detection: false,
            containers,
            rules,
            parent_hints: strings(&[".claude", "claude", ".codex", "plugins", "plugin", ".github"]),
            allowed_nested_dirs: strings(&[
                "tests", "test", "__tests__", "lib", "dist", "build", "assets", "docs", "scripts",
                "src",
            ]),
            single_file_extensions: strings(&["md", "yaml", "yml", "json", "sh", "py", "js", "ts"]),
            ignored_file_names: strings(&[
                "readme.md",
                "license",
                "license.md",
                "changelog.md",
                "contributing.md",
            ]),
            ignore_patterns: Vec::new(),
        }
    }
}

impl DetectionConfig {
    pub fn with_min_confidence(mut self, min_confidence: u8) -> Self {
        self.min_confidence = min_confidence.min(100);
        self
    }

    pub fn with_frontmatter_detection(mut self, enabled: bool) -> Self {
        self.enable_frontmatter_detection = enabled;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<glob::Pattern>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn with_allowed_nested_dirs(mut self, dirs: Vec<String>) -> Self {
        self.allowed_nested_dirs = dirs.into_iter().map(|d| d.to_ascii_lowercase()).collect();
        self
    }

    pub fn rules_for(&self, artifact_type: ArtifactType) -> Option<&TypeRules> {
        self.rules.get(&artifact_type)
    }

    /// Type held by a container directory of this name, if it is one
    pub fn container_type(&self, dir_name: &str) -> Option<ArtifactType> {
        self.containers.get(&dir_name.to_ascii_lowercase()).copied()
    }

    /// First type (in priority order) for which `file_name` is a manifest
    pub fn manifest_type(&self, file_name: &str) -> Option<ArtifactType> {
        TYPE_PRIORITY
            .into_iter()
            .find(|t| self.rules_for(*t).is_some_and(|r| r.is_manifest(file_name)))
    }

    /// First type (in priority order) whose name tokens match `dir_name`
    pub fn name_type(&self, dir_name: &str) -> Option<ArtifactType> {
        TYPE_PRIORITY
            .into_iter()
            .find(|t| self.rules_for(*t).is_some_and(|r| r.name_matches(dir_name)))
    }

    /// Manifests that carry YAML frontmatter (markdown manifests)
    pub fn is_frontmatter_candidate(&self, file_name: &str) -> bool {
        self.manifest_type(file_name).is_some()
            && extension_of(file_name).is_some_and(|e| e.eq_ignore_ascii_case("md"))
    }

    pub fn is_parent_hint(&self, segment: &str) -> bool {
        let lowered = segment.to_ascii_lowercase();
        self.parent_hints.iter().any(|h| *h == lowered)
    }

    pub fn is_allowed_nested_dir(&self, dir_name: &str) -> bool {
        let lowered = dir_name.to_ascii_lowercase();
        self.allowed_nested_dirs.iter().any(|d| *d == lowered)
    }

    pub fn is_ignored_path(&self, path: &str) -> bool {
        self.ignore_patterns.iter().any(|p| p.matches(path))
    }

    pub fn is_single_file_candidate(&self, file_name: &str) -> bool {
        let lowered = file_name.to_ascii_lowercase();
        if self.ignored_file_names.iter().any(|n| *n == lowered) {
            return false;
        }
        extension_of(file_name).is_some_and(|ext| {
            self.single_file_extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_containers() {
        let config = DetectionConfig::default();
        assert_eq!(config.container_type("skills"), Some(ArtifactType::Skill));
        assert_eq!(config.container_type("Commands"), Some(ArtifactType::Command));
        assert_eq!(config.container_type("mcp-servers"), Some(ArtifactType::McpServer));
        assert_eq!(config.container_type("skill"), None);
    }

    #[test]
    fn test_manifest_lookup_is_case_insensitive() {
        let config = DetectionConfig::default();
        assert_eq!(config.manifest_type("SKILL.md"), Some(ArtifactType::Skill));
        assert_eq!(config.manifest_type("skill.md"), Some(ArtifactType::Skill));
        assert_eq!(config.manifest_type("agent.yml"), Some(ArtifactType::Agent));
        assert_eq!(config.manifest_type(".mcp.json"), Some(ArtifactType::McpServer));
        assert_eq!(config.manifest_type("package.json"), None);
    }

    #[test]
    fn test_name_tokens_match_words() {
        let config = DetectionConfig::default();
        assert_eq!(config.name_type("code-review-agent"), Some(ArtifactType::Agent));
        assert_eq!(config.name_type("my_mcp_server"), Some(ArtifactType::McpServer));
        assert_eq!(config.name_type("hooks"), Some(ArtifactType::Hook));
        assert_eq!(config.name_type("canvas"), None);
        assert_eq!(config.name_type("skillful"), None);
    }

    #[test]
    fn test_extension_of_handles_dotfiles() {
        assert_eq!(extension_of("run.py"), Some("py"));
        assert_eq!(extension_of(".mcp.json"), Some("json"));
        assert_eq!(extension_of(".gitignore"), None);
        assert_eq!(extension_of("Makefile"), None);
    }

    #[test]
    fn test_frontmatter_candidates_are_markdown_manifests() {
        let config = DetectionConfig::default();
        assert!(config.is_frontmatter_candidate("SKILL.md"));
        assert!(config.is_frontmatter_candidate("AGENT.md"));
        assert!(!config.is_frontmatter_candidate("agent.yaml"));
        assert!(!config.is_frontmatter_candidate("notes.md"));
    }

    #[test]
    fn test_single_file_candidates() {
        let config = DetectionConfig::default();
        assert!(config.is_single_file_candidate("review.md"));
        assert!(config.is_single_file_candidate("pre-commit.sh"));
        assert!(!config.is_single_file_candidate("README.md"));
        assert!(!config.is_single_file_candidate("image.png"));
    }

    #[test]
    fn test_ignore_patterns() {
        let config = DetectionConfig::default()
            .with_ignore_patterns(vec![glob::Pattern::new("node_modules/**").unwrap()]);
        assert!(config.is_ignored_path("node_modules/pkg/SKILL.md"));
        assert!(!config.is_ignored_path("skills/a/SKILL.md"));
    }
}
