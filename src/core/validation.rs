//! Validation utilities for configuration and CLI values

use std::fmt;

/// A user-correctable validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

/// Validate positive integer value
pub fn validate_positive_int(value: i64, key: &str) -> Result<usize, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::new(&format!(
            "'{}' must be greater than 0 (got {})",
            key, value
        )));
    }
    usize::try_from(value)
        .map_err(|_| ValidationError::new(&format!("'{}' is too large: {}", key, value)))
}

/// Validate a confidence threshold in 0..=100
pub fn validate_confidence(value: i64, key: &str) -> Result<u8, ValidationError> {
    if !(0..=100).contains(&value) {
        return Err(ValidationError::new(&format!(
            "'{}' must be between 0 and 100 (got {})",
            key, value
        )));
    }
    Ok(value as u8)
}

/// Validate glob pattern syntax
pub fn validate_glob_pattern(pattern: &str) -> Result<glob::Pattern, ValidationError> {
    glob::Pattern::new(pattern).map_err(|e| {
        ValidationError::new(&format!("Invalid glob pattern '{}': {}", pattern, e))
    })
}

/// Validate that a URL template can address an artifact
pub fn validate_url_template(template: &str) -> Result<String, ValidationError> {
    if !template.contains("{path}") {
        return Err(ValidationError::new(&format!(
            "Upstream URL template '{}' must contain a {{path}} placeholder",
            template
        )));
    }
    Ok(template.to_string())
}
