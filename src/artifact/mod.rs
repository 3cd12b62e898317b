//! Artifact Model
//!
//! Types shared by every stage of a scan, plus the conversion from transient
//! heuristic matches into persisted artifact records.

pub mod convert;
pub mod types;

pub use convert::UpstreamContext;
pub use types::{
    ArtifactMetadata, ArtifactType, DetectedArtifact, ExcludedReason, ManualMappingProvenance,
    SignalScores, TreeEntry, TreeEntryType,
};
