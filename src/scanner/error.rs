//! Scanner Error Types

use crate::core::error_handling::ContextualError;

/// Typed failures raised by a repository source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },
    #[error("Rate limit exceeded: {message}")]
    RateLimited { message: String },
    #[error("Request timed out: {message}")]
    Timeout { message: String },
    #[error("Connection failed: {message}")]
    Connection { message: String },
    #[error("Repository source error: {message}")]
    Other { message: String },
}

impl SourceError {
    pub fn not_found<R: Into<String>>(resource: R) -> Self {
        SourceError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }

    /// Faults the fetch layer may retry on its own
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SourceError::RateLimited { .. }
                | SourceError::Timeout { .. }
                | SourceError::Connection { .. }
        )
    }
}

impl ContextualError for SourceError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            SourceError::NotFound { resource } => Some(resource),
            _ => None,
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Failures loading scan inputs or running a scan
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Source(#[from] SourceError),
    /// An input file could not be read or parsed
    #[error("{message}")]
    Input { message: String },
}

impl ScanError {
    pub fn unreadable(path: &std::path::Path, error: &std::io::Error) -> Self {
        ScanError::Input {
            message: format!("Failed to read {}: {}", path.display(), error),
        }
    }

    pub fn unparsable(path: &std::path::Path, error: &serde_json::Error) -> Self {
        ScanError::Input {
            message: format!("Failed to parse {}: {}", path.display(), error),
        }
    }
}

impl ContextualError for ScanError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ScanError::Source(e) => e.is_user_actionable(),
            ScanError::Input { .. } => true,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ScanError::Source(e) => e.user_message(),
            ScanError::Input { message } => Some(message),
        }
    }
}
