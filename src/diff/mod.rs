//! Catalog Diff Engine
//!
//! Compares a prior catalog snapshot against a fresh scan.

pub mod engine;
pub mod types;

pub use engine::diff_catalog;
pub use types::{CatalogRow, ChangeType, DiffEntry, DiffProjection, DiffResult};
