//! Scanner API
//!
//! Public surface of the scanner for the binary and for library callers.

pub use crate::scanner::error::{ScanError, SourceError};
pub use crate::scanner::metadata::{FrontmatterMetadataExtractor, MetadataExtractor};
pub use crate::scanner::orchestrator::ArtifactScanner;
pub use crate::scanner::source::{JsonTreeSource, RepositorySource};
pub use crate::scanner::types::{ScanRequest, ScanResult, ScanStatus};
