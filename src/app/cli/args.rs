//! Command-line arguments
//!
//! Flags that mirror configuration keys override the loaded `ScanConfig`.

use crate::config::{ConfigResult, ScanConfig};
use crate::core::validation::{validate_confidence, validate_positive_int};
use crate::planner::CloneStrategy;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "reposcout")]
#[command(about = "Discover, deduplicate and index reusable artifacts in repositories")]
#[command(version)]
pub struct Args {
    /// Tree listing to scan (GitHub git-trees JSON)
    #[arg(short = 't', long = "tree", value_name = "FILE")]
    pub tree: PathBuf,

    /// Repository owner
    #[arg(long = "owner", value_name = "OWNER")]
    pub owner: String,

    /// Repository name
    #[arg(long = "repo", value_name = "REPO")]
    pub repo: String,

    /// Ref to scan (defaults to the configured default ref)
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,

    /// Only scan paths at or below this directory
    #[arg(long = "root-hint", value_name = "PATH")]
    pub root_hint: Option<String>,

    /// JSON array of content hashes already indexed from other sources
    #[arg(long = "existing-hashes", value_name = "FILE")]
    pub existing_hashes: Option<PathBuf>,

    /// JSON array of catalog rows from the previous scan
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Clone target saved by the previous scan
    #[arg(long = "cached-target", value_name = "FILE")]
    pub cached_target: Option<PathBuf>,

    /// Write the computed clone target here
    #[arg(long = "save-target", value_name = "FILE")]
    pub save_target: Option<PathBuf>,

    /// JSON object of file contents by path (enables frontmatter detection and metadata)
    #[arg(long = "contents", value_name = "FILE")]
    pub contents: Option<PathBuf>,

    /// Minimum confidence to report (0-100)
    #[arg(long = "min-confidence", value_name = "N")]
    pub min_confidence: Option<i64>,

    /// Maximum number of paths scanned
    #[arg(long = "max-paths", value_name = "N")]
    pub max_paths: Option<i64>,

    /// Force the clone strategy
    #[arg(long = "strategy", value_name = "STRATEGY", value_parser = ["api", "sparse_manifest", "sparse_directory"])]
    pub strategy: Option<String>,

    /// Output format
    #[arg(long = "format", value_name = "FORMAT", default_value = "table", value_parser = ["json", "table"])]
    pub format: String,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Color output: true, false, or unspecified for TTY detection
    #[arg(short = 'g', long = "color")]
    pub color: Option<bool>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,
}

impl Args {
    /// Apply flags that override configuration values
    pub fn apply_to_config(&self, config: &mut ScanConfig) -> ConfigResult<()> {
        if let Some(value) = self.min_confidence {
            config.min_confidence = validate_confidence(value, "min-confidence")?;
        }
        if let Some(value) = self.max_paths {
            config.max_paths = validate_positive_int(value, "max-paths")?;
        }
        if let Some(strategy) = &self.strategy {
            config.strategy = Some(CloneStrategy::parse(strategy)?);
        }
        Ok(())
    }

    /// Resolve color: explicit flag first, then `NO_COLOR`, then TTY detection
    pub fn use_color(&self) -> bool {
        use std::io::IsTerminal;
        match self.color {
            Some(explicit) => explicit,
            None => std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
        }
    }
}
