//! Configuration
//!
//! Loading and validation of `reposcout.toml`.

pub mod error;
pub mod scan_config;

pub use error::{ConfigError, ConfigResult};
pub use scan_config::{ScanConfig, DEFAULT_MAX_PATHS, DEFAULT_REF};
