//! Configuration Error Types

use crate::core::error_handling::ContextualError;
use crate::core::validation::ValidationError;
use crate::planner::PlannerError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    Parse { message: String },

    #[error("{0}")]
    Invalid(#[from] ValidationError),

    #[error("{0}")]
    Strategy(#[from] PlannerError),
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ConfigError::NotFound { .. } | ConfigError::Parse { .. } | ConfigError::Invalid(_) => {
                true
            }
            ConfigError::Strategy(e) => e.is_user_actionable(),
            ConfigError::Io(_) => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::NotFound { message } | ConfigError::Parse { message } => Some(message),
            ConfigError::Invalid(e) => Some(e.message()),
            ConfigError::Strategy(e) => e.user_message(),
            ConfigError::Io(_) => None,
        }
    }
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
