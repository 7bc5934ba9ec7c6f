use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single rejected field on an intake form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum LoanDeskError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid form: {}", join_issues(.0))]
    InvalidForm(Vec<FieldIssue>),

    #[error("No dues selected for payment")]
    NoSelection,

    #[error("Submission failed: {operation} — {reason}")]
    SubmissionFailure { operation: String, reason: String },

    #[error("Request failed: {operation} — {reason}")]
    RequestFailure { operation: String, reason: String },

    #[error("Not found: {resource} '{id}'")]
    NotFound { resource: String, id: String },

    #[error("Malformed {resource} response: {reason}")]
    SchemaError { resource: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanDeskError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LoanDeskError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn schema(resource: &str, reason: impl Into<String>) -> Self {
        LoanDeskError::SchemaError {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LoanDeskError {
    fn from(e: serde_json::Error) -> Self {
        LoanDeskError::SerializationError(e.to_string())
    }
}

impl From<chrono::ParseError> for LoanDeskError {
    fn from(e: chrono::ParseError) -> Self {
        LoanDeskError::DateError(e.to_string())
    }
}
