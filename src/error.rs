//! Error handling for formkit
//!
//! Collection errors are contract violations raised by the pure edit
//! operations. Persistence errors are the only user-facing failures and
//! never touch in-memory editing state.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for formkit operations
pub type Result<T> = std::result::Result<T, FormError>;

/// A single failed validation rule on a submitted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The `name` setting of the offending element.
    pub field: String,

    /// Message shown next to the field.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Main error type for formkit operations
#[derive(Error, Debug)]
pub enum FormError {
    // Collection Errors
    #[error("Element id already exists: {id}")]
    DuplicateId { id: String },

    #[error("Index {index} out of range for collection of {len} elements")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Element not found: {id}")]
    NotFound { id: String },

    // Field Errors
    #[error("Unknown field kind: {kind}")]
    UnknownFieldKind { kind: String },

    #[error("Invalid pattern for field '{field}': {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Form has {} invalid field(s)", errors.len())]
    Validation { errors: Vec<FieldError> },

    // Persistence Errors
    #[error("Form {operation} failed: {message}")]
    Persistence { operation: String, message: String },

    #[error("Form not found in store: {id}")]
    FormNotFound { id: String },

    // Workspace Errors
    #[error("Workspace not found: {path}")]
    WorkspaceNotFound { path: PathBuf },

    #[error("Workspace already exists: {path}")]
    WorkspaceExists { path: PathBuf },

    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "http-store")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl FormError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            FormError::DuplicateId { .. } => "DUPLICATE_ID",
            FormError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            FormError::NotFound { .. } => "NOT_FOUND",
            FormError::UnknownFieldKind { .. } => "UNKNOWN_FIELD_KIND",
            FormError::InvalidPattern { .. } => "INVALID_PATTERN",
            FormError::Validation { .. } => "VALIDATION_FAILED",
            FormError::Persistence { .. } => "PERSISTENCE_FAILED",
            FormError::FormNotFound { .. } => "FORM_NOT_FOUND",
            FormError::WorkspaceNotFound { .. } => "WORKSPACE_NOT_FOUND",
            FormError::WorkspaceExists { .. } => "WORKSPACE_EXISTS",
            FormError::FileReadError { .. } => "FILE_READ_ERROR",
            FormError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            FormError::DirectoryCreateError { .. } => "DIRECTORY_CREATE_ERROR",
            FormError::InvalidConfig { .. } => "INVALID_CONFIG",
            FormError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            FormError::Io(_) => "IO_ERROR",
            FormError::Serialization(_) => "SERIALIZATION_ERROR",
            #[cfg(feature = "http-store")]
            FormError::Http(_) => "HTTP_ERROR",
        }
    }

    /// Check if the editing session stays usable after this error.
    ///
    /// Contract violations from the collection operations are not
    /// recoverable: they point at a caller passing stale ids or indices.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            FormError::DuplicateId { .. }
                | FormError::IndexOutOfRange { .. }
                | FormError::NotFound { .. }
        )
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            FormError::Validation { .. } => Some("Correct the highlighted fields and submit again."),
            FormError::InvalidPattern { .. } => {
                Some("Fix the regex in the field's validation settings.")
            }
            FormError::Persistence { .. } => {
                Some("Your changes are still in the editor. Try saving again.")
            }
            FormError::UnknownFieldKind { .. } => {
                Some("Run 'formkit-cli palette' to list the available field kinds.")
            }
            FormError::WorkspaceNotFound { .. } => {
                Some("Create one first with 'formkit-cli --workspace <path> init'.")
            }
            FormError::FormNotFound { .. } => Some("Check the form id and the store location."),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = FormError::DuplicateId {
            id: "a".to_string(),
        };
        assert_eq!(err.error_code(), "DUPLICATE_ID");
        assert_eq!(err.to_string(), "Element id already exists: a");
    }

    #[test]
    fn test_contract_violations_are_not_recoverable() {
        let err = FormError::IndexOutOfRange { index: 4, len: 2 };
        assert!(!err.is_recoverable());
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_persistence_errors_are_recoverable() {
        let err = FormError::Persistence {
            operation: "create".to_string(),
            message: "Failed to create form".to_string(),
        };
        assert!(err.is_recoverable());
        assert!(err.recovery_suggestion().is_some());
        assert_eq!(err.to_string(), "Form create failed: Failed to create form");
    }

    #[test]
    fn test_validation_error_counts_fields() {
        let err = FormError::Validation {
            errors: vec![
                FieldError {
                    field: "email".to_string(),
                    message: "Please enter a valid email".to_string(),
                },
                FieldError {
                    field: "age".to_string(),
                    message: "This field is required".to_string(),
                },
            ],
        };
        assert_eq!(err.to_string(), "Form has 2 invalid field(s)");
    }
}
