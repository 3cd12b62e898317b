//! Scan Orchestrator
//!
//! Drives one scan of one repository through detection, hashing,
//! deduplication, catalog diffing and clone planning.
//!
//! - **ArtifactScanner**: the pipeline, built once from a `ScanConfig`
//! - **RepositorySource**: the fetch layer, injected by the caller
//! - **MetadataExtractor**: optional search metadata enrichment
//! - **ScanResult**: aggregate counts plus every artifact tagged kept or excluded

pub mod api;
pub mod error;
pub mod metadata;
pub mod orchestrator;
pub mod source;
pub mod types;

pub use error::{ScanError, SourceError, SourceResult};
pub use metadata::{FrontmatterMetadataExtractor, ManifestMetadata, MetadataExtractor};
pub use orchestrator::{ArtifactScanner, ArtifactScannerBuilder};
pub use source::{JsonTreeSource, RepoTree, RepositorySource};
pub use types::{ScanRequest, ScanResult, ScanStatus};

#[cfg(test)]
mod tests;
