//! Frontmatter Reader
//!
//! Extracts the leading `---` delimited YAML block from markdown manifests.
//! Malformed or non-record frontmatter degrades to `None` with a warning.

use crate::artifact::ArtifactType;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

static FRONTMATTER_BLOCK: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?s)\A\x{FEFF}?---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)").ok()
});

/// Raw YAML text of the frontmatter block, if the content starts with one
pub fn frontmatter_block(content: &str) -> Option<&str> {
    FRONTMATTER_BLOCK
        .as_ref()?
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse frontmatter into a YAML mapping
pub fn parse_frontmatter(path: &str, content: &str) -> Option<serde_yaml::Mapping> {
    let block = frontmatter_block(content)?;
    match serde_yaml::from_str::<serde_yaml::Value>(block) {
        Ok(serde_yaml::Value::Mapping(mapping)) => Some(mapping),
        Ok(_) => {
            log::warn!("Frontmatter in '{}' is not a key/value record", path);
            None
        }
        Err(e) => {
            log::warn!("Unparsable frontmatter in '{}': {}", path, e);
            None
        }
    }
}

/// Artifact type declared by an explicit `type:` frontmatter field
pub fn frontmatter_type(path: &str, content: &str) -> Option<ArtifactType> {
    let mapping = parse_frontmatter(path, content)?;
    let declared = mapping.get("type")?.as_str()?;
    match ArtifactType::from_str(declared.trim()) {
        Ok(t) => Some(t),
        Err(_) => {
            log::debug!("Ignoring unknown frontmatter type '{}' in '{}'", declared, path);
            None
        }
    }
}
