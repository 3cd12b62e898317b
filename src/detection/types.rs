//! Detection Types and Scoring Constants

use crate::artifact::{ArtifactType, ManualMappingProvenance, SignalScores};
use serde::{Deserialize, Serialize};

/// Own directory name matches a type token
pub const WEIGHT_DIR_NAME: i32 = 10;
/// Only the parent directory name matches a type token
pub const WEIGHT_PARENT_NAME: i32 = 5;
/// A manifest file for the type is present
pub const WEIGHT_MANIFEST: i32 = 20;
/// Cap on the expected-extension file count
pub const MAX_EXTENSION_SCORE: i32 = 5;
/// An ancestor segment is a known parent hint (e.g. `.claude`)
pub const WEIGHT_PARENT_HINT: i32 = 15;
/// A frontmatter-bearing manifest is present (frontmatter detection enabled)
pub const WEIGHT_FRONTMATTER_CANDIDATE: i32 = 15;
/// Detected type agrees with the enclosing container
pub const WEIGHT_CONTAINER_HINT: i32 = 25;
/// Type inferred from the container alone
pub const WEIGHT_CONTAINER_INFERENCE: i32 = WEIGHT_CONTAINER_HINT / 2;
/// Explicit `type:` field in frontmatter
pub const WEIGHT_FRONTMATTER_TYPE: i32 = 30;
/// Sum of all positive weights
pub const MAX_RAW_SCORE: i32 = WEIGHT_DIR_NAME
    + WEIGHT_MANIFEST
    + MAX_EXTENSION_SCORE
    + WEIGHT_PARENT_HINT
    + WEIGHT_FRONTMATTER_CANDIDATE
    + WEIGHT_CONTAINER_HINT
    + WEIGHT_FRONTMATTER_TYPE;

/// Penalty for command/agent/hook directories with unexpected nesting
pub const FLAT_STRUCTURE_PENALTY: u8 = 15;

pub const DEFAULT_MIN_CONFIDENCE: u8 = 30;

/// Manual-mapping confidence bounds
pub const MANUAL_CONFIDENCE_MAX: u8 = 95;
pub const MANUAL_CONFIDENCE_MIN: u8 = 86;
const MANUAL_CONFIDENCE_STEP: u32 = 3;

/// Single-file confidence ladder
pub const SINGLE_FILE_DIRECT_CONFIDENCE: u8 = 75;
pub const SINGLE_FILE_NESTED_CONFIDENCE: u8 = 70;
pub const SINGLE_FILE_FLOOR_CONFIDENCE: u8 = 50;
const SINGLE_FILE_STEP: u32 = 5;

/// A classified candidate produced by the detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicMatch {
    pub path: String,
    pub artifact_type: Option<ArtifactType>,
    pub confidence_score: u8,
    pub raw_score: i32,
    /// Segments between the enclosing container and the artifact
    pub organization_path: Option<String>,
    pub match_reasons: Vec<String>,
    pub signals: SignalScores,
    pub manual_mapping: Option<ManualMappingProvenance>,
    /// True for single-file artifacts
    pub is_file: bool,
}

/// Map a raw score onto 0..=100 (rounded half up)
pub fn normalize_score(raw: i32) -> u8 {
    let raw = raw.clamp(0, MAX_RAW_SCORE);
    let scaled = (raw * 100 + MAX_RAW_SCORE / 2) / MAX_RAW_SCORE;
    scaled.clamp(0, 100) as u8
}

/// Confidence for a manual mapping found `depth` segments above the path
pub fn manual_confidence(depth: usize) -> u8 {
    let steps = depth.min(u32::MAX as usize) as u32;
    let reduction = steps.saturating_mul(MANUAL_CONFIDENCE_STEP);
    let score = (MANUAL_CONFIDENCE_MAX as u32).saturating_sub(reduction);
    score.max(MANUAL_CONFIDENCE_MIN as u32) as u8
}

/// Confidence for a single file `depth` levels below its container
pub fn single_file_confidence(depth: usize) -> u8 {
    match depth {
        0 => SINGLE_FILE_DIRECT_CONFIDENCE,
        1 => SINGLE_FILE_NESTED_CONFIDENCE,
        d => {
            let steps = (d - 1).min(u32::MAX as usize) as u32;
            let reduction = steps.saturating_mul(SINGLE_FILE_STEP);
            let score = (SINGLE_FILE_NESTED_CONFIDENCE as u32).saturating_sub(reduction);
            score.max(SINGLE_FILE_FLOOR_CONFIDENCE as u32) as u8
        }
    }
}
