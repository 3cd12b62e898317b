pub mod app;
pub mod artifact;
pub mod config;
pub mod core;
pub mod dedup;
pub mod detection;
pub mod diff;
pub mod hashing;
pub mod planner;
pub mod scanner;
