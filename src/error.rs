//! Error types shared by every catalog operation

use std::path::PathBuf;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Error types for catalog operations
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// A registry record, course or lesson lookup missed
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The requested transition is not allowed from the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A course document failed schema checks
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Short category label used in command output
    pub fn category(&self) -> &'static str {
        match self {
            CatalogError::NotFound { .. } => "NotFound",
            CatalogError::InvalidState(_) => "InvalidState",
            CatalogError::Validation(_) | CatalogError::Json(_) => "ValidationError",
            CatalogError::Config(_) => "ConfigError",
            CatalogError::Io { .. } => "IoError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = CatalogError::not_found("Lesson", "my-course-01-09");
        assert_eq!(err.to_string(), "Lesson not found: my-course-01-09");
        assert_eq!(err.category(), "NotFound");
    }

    #[test]
    fn test_json_errors_count_as_validation() {
        let err: CatalogError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.category(), "ValidationError");
    }
}
