//! Planner Error Types

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("Invalid clone strategy '{value}' (expected api, sparse_manifest or sparse_directory)")]
    InvalidStrategy { value: String },

    #[error("Invalid clone target record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl crate::core::error_handling::ContextualError for PlannerError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, PlannerError::InvalidStrategy { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PlannerError::InvalidStrategy { .. } => {
                Some("Clone strategy must be one of: api, sparse_manifest, sparse_directory")
            }
            PlannerError::Serialization(_) => None,
        }
    }
}

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
