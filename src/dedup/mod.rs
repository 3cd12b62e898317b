//! Deduplication Engine
//!
//! Content-addressed duplicate resolution within a scan and against an
//! already-indexed collection.

pub mod engine;
pub mod error;
pub mod source;

pub use engine::{best_of, DedupEngine, Partition};
pub use error::{DedupError, DedupResult};
pub use source::{FileContentHashSource, HashSource, TreeHashSource};

#[cfg(test)]
mod tests;
