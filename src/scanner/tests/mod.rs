//! Test modules for the scan orchestrator

pub mod helpers;
