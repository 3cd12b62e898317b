//! Clone-Target Planner
//!
//! Chooses how much of a repository the next scan has to fetch and decides
//! when a scan can be skipped because the tree has not changed.

pub mod error;
pub mod patterns;
pub mod strategy;
pub mod target;

pub use error::{PlannerError, PlannerResult};
pub use patterns::{common_root, directory_patterns, manifest_patterns, manifest_priority};
pub use strategy::{select_strategy, CloneStrategy};
pub use target::{changed_artifacts, should_reindex, ClonePlanner, CloneTarget};
