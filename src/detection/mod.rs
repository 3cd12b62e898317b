//! Heuristic Artifact Detection
//!
//! Classifies directories and single files of a repository path listing into
//! typed artifacts with a 0-100 confidence score.

pub mod config;
pub mod detector;
pub mod frontmatter;
pub mod layout;
pub mod manual;
pub mod types;

pub use config::{DetectionConfig, TypeRules, TYPE_PRIORITY};
pub use detector::Detector;
pub use manual::{normalize_path, ManualMappings, ManualMatch};
pub use types::{
    manual_confidence, normalize_score, single_file_confidence, HeuristicMatch,
    DEFAULT_MIN_CONFIDENCE, MANUAL_CONFIDENCE_MAX, MANUAL_CONFIDENCE_MIN, MAX_RAW_SCORE,
};

#[cfg(test)]
mod tests;
