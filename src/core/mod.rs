//! Core infrastructure shared by every module

pub mod error_handling;
pub mod logging;
pub mod time;
pub mod validation;
