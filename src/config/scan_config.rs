//! Scan Configuration
//!
//! TOML-backed settings for the whole scan pipeline. Keys are kebab-case;
//! unknown keys are ignored with a warning.

use crate::artifact::convert::DEFAULT_UPSTREAM_URL_TEMPLATE;
use crate::config::error::{ConfigError, ConfigResult};
use crate::core::validation::{
    validate_confidence, validate_glob_pattern, validate_positive_int, validate_url_template,
    ValidationError,
};
use crate::detection::{DetectionConfig, ManualMappings, DEFAULT_MIN_CONFIDENCE};
use crate::dedup::FileContentHashSource;
use crate::hashing::{CachedHasher, DEFAULT_HASH_CACHE_CAPACITY};
use crate::planner::CloneStrategy;
use std::path::PathBuf;

pub const DEFAULT_MAX_PATHS: usize = 10_000;
pub const DEFAULT_REF: &str = "main";

const KNOWN_KEYS: &[&str] = &[
    "min-confidence",
    "frontmatter-detection",
    "max-paths",
    "default-ref",
    "upstream-url-template",
    "ignore",
    "allowed-nested-dirs",
    "strategy",
    "hash-cache-capacity",
    "skip-unchanged",
    "manual-mappings",
];

/// Immutable settings shared by every scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub min_confidence: u8,
    pub frontmatter_detection: bool,
    pub max_paths: usize,
    pub default_ref: String,
    pub upstream_url_template: String,
    pub ignore_patterns: Vec<glob::Pattern>,
    /// `None` keeps the detector's built-in allow-list
    pub allowed_nested_dirs: Option<Vec<String>>,
    pub strategy: Option<CloneStrategy>,
    pub hash_cache_capacity: usize,
    /// Return early when the cached clone target matches the live tree
    pub skip_unchanged: bool,
    pub manual_mappings: ManualMappings,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            frontmatter_detection: false,
            max_paths: DEFAULT_MAX_PATHS,
            default_ref: DEFAULT_REF.to_string(),
            upstream_url_template: DEFAULT_UPSTREAM_URL_TEMPLATE.to_string(),
            ignore_patterns: Vec::new(),
            allowed_nested_dirs: None,
            strategy: None,
            hash_cache_capacity: DEFAULT_HASH_CACHE_CAPACITY,
            skip_unchanged: true,
            manual_mappings: ManualMappings::new(),
        }
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(ValidationError::new(&message))
}

fn integer(config: &toml::Table, key: &str) -> ConfigResult<Option<i64>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .map(Some)
            .ok_or_else(|| invalid(format!("'{}' must be an integer", key))),
    }
}

fn boolean(config: &toml::Table, key: &str) -> ConfigResult<Option<bool>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_bool()
            .map(Some)
            .ok_or_else(|| invalid(format!("'{}' must be true or false", key))),
    }
}

fn string(config: &toml::Table, key: &str) -> ConfigResult<Option<String>> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| invalid(format!("'{}' must be a string", key))),
    }
}

/// Single string or array of strings
fn string_list(config: &toml::Table, key: &str) -> ConfigResult<Option<Vec<String>>> {
    let Some(value) = config.get(key) else {
        return Ok(None);
    };
    if let Some(single) = value.as_str() {
        return Ok(Some(vec![single.to_string()]));
    }
    let array = value
        .as_array()
        .ok_or_else(|| invalid(format!("'{}' must be a string or an array of strings", key)))?;
    array
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(format!("'{}' entries must be strings", key)))
        })
        .collect::<ConfigResult<Vec<_>>>()
        .map(Some)
}

impl ScanConfig {
    /// `<config_dir>/Reposcout/reposcout.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Reposcout").join("reposcout.toml"))
    }

    /// Load from an explicit file (which must exist) or the default location if present
    pub async fn load(config_file: Option<PathBuf>) -> ConfigResult<Self> {
        let path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        message: format!(
                            "The specified configuration file does not exist: {}",
                            path.display()
                        ),
                    });
                }
                path
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    log::debug!("No configuration file found; using defaults");
                    return Ok(Self::default());
                }
            },
        };

        log::debug!("Loading configuration from {}", path.display());
        let contents = tokio::fs::read_to_string(&path).await?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse { message } => ConfigError::Parse {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let table = toml::from_str::<toml::Table>(contents).map_err(|e| ConfigError::Parse {
            message: format!("Error parsing configuration: {}", e),
        })?;
        let mut config = Self::default();
        config.apply_toml_values(&table)?;
        Ok(config)
    }

    /// Apply TOML configuration values, validating each one
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> ConfigResult<()> {
        for key in config.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                log::warn!("Ignoring unknown configuration key '{}'", key);
            }
        }

        if let Some(value) = integer(config, "min-confidence")? {
            self.min_confidence = validate_confidence(value, "min-confidence")?;
        }
        if let Some(enabled) = boolean(config, "frontmatter-detection")? {
            self.frontmatter_detection = enabled;
        }
        if let Some(value) = integer(config, "max-paths")? {
            self.max_paths = validate_positive_int(value, "max-paths")?;
        }
        if let Some(git_ref) = string(config, "default-ref")? {
            let git_ref = git_ref.trim();
            if git_ref.is_empty() {
                return Err(invalid("'default-ref' cannot be empty".to_string()));
            }
            self.default_ref = git_ref.to_string();
        }
        if let Some(template) = string(config, "upstream-url-template")? {
            self.upstream_url_template = validate_url_template(&template)?;
        }
        if let Some(patterns) = string_list(config, "ignore")? {
            self.ignore_patterns = patterns
                .iter()
                .map(|p| validate_glob_pattern(p))
                .collect::<Result<_, _>>()?;
        }
        if let Some(dirs) = string_list(config, "allowed-nested-dirs")? {
            self.allowed_nested_dirs = Some(dirs);
        }
        if let Some(strategy) = string(config, "strategy")? {
            self.strategy = Some(CloneStrategy::parse(&strategy)?);
        }
        if let Some(value) = integer(config, "hash-cache-capacity")? {
            self.hash_cache_capacity = validate_positive_int(value, "hash-cache-capacity")?;
        }
        if let Some(skip) = boolean(config, "skip-unchanged")? {
            self.skip_unchanged = skip;
        }
        if let Some(value) = config.get("manual-mappings") {
            let table = value
                .as_table()
                .ok_or_else(|| invalid("'manual-mappings' must be a table".to_string()))?;
            let pairs = table.iter().filter_map(|(path, type_value)| match type_value.as_str() {
                Some(type_name) => Some((path.as_str(), type_name)),
                None => {
                    log::warn!("Dropping manual mapping '{}': type must be a string", path);
                    None
                }
            });
            self.manual_mappings = ManualMappings::from_pairs(pairs);
        }
        Ok(())
    }

    /// Offline hash source backed by a memo cache of the configured size
    pub fn content_hash_source(&self) -> FileContentHashSource {
        FileContentHashSource::new(CachedHasher::new(self.hash_cache_capacity))
    }

    /// Detector settings derived from this configuration
    pub fn detection_config(&self) -> DetectionConfig {
        let config = DetectionConfig::default()
            .with_min_confidence(self.min_confidence)
            .with_frontmatter_detection(self.frontmatter_detection)
            .with_ignore_patterns(self.ignore_patterns.clone());
        match &self.allowed_nested_dirs {
            Some(dirs) => config.with_allowed_nested_dirs(dirs.clone()),
            None => config,
        }
    }
}
