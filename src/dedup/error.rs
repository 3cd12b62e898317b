//! Deduplication Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DedupError {
    #[error("Cannot select the best artifact of an empty duplicate group")]
    EmptyGroup,
}

impl crate::core::error_handling::ContextualError for DedupError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

/// Result type for deduplication operations
pub type DedupResult<T> = Result<T, DedupError>;
