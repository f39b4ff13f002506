//! Error types for the submission workflow

use serde::Serialize;
use thiserror::Error;

use crate::validation::ValidationReport;

/// Workflow Result type
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Why a single form field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldErrorKind {
    MissingField,
    OutOfRange,
    TooShort,
    UnsupportedType,
    TooLarge,
}

/// Workflow error type
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// One or more fields failed validation; nothing was sent
    #[error("Please fix the errors in the form ({} invalid field(s))", .0.len())]
    Invalid(ValidationReport),

    /// The generator answered with an error or with a body that does not match the schema
    #[error("{0}")]
    GenerationFailed(String),

    #[error("Network error: {0}")]
    TransportError(String),

    #[error("A submission is already in progress")]
    AlreadyInProgress,

    #[error("No questions to export")]
    NothingToExport,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkflowError {
    /// Remote failures leave the form intact so the user can retry as-is
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WorkflowError::GenerationFailed(_) | WorkflowError::TransportError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            WorkflowError::AlreadyInProgress.to_string(),
            "A submission is already in progress"
        );
        assert_eq!(
            WorkflowError::NothingToExport.to_string(),
            "No questions to export"
        );
        assert_eq!(
            WorkflowError::GenerationFailed("Resume parsing error".to_string()).to_string(),
            "Resume parsing error"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(WorkflowError::TransportError("refused".into()).is_retryable());
        assert!(WorkflowError::GenerationFailed("boom".into()).is_retryable());
        assert!(!WorkflowError::AlreadyInProgress.is_retryable());
        assert!(!WorkflowError::NothingToExport.is_retryable());
    }
}
