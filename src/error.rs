use culina_shared::{DomainError, StoreError};
use thiserror::Error;
use validator::ValidationErrors;

pub type AppResult<T> = Result<T, AppError>;

/// Application-layer error: everything a use case can fail with. Domain
/// and storage failures convert straight through; input validation,
/// lookup misses and uniqueness clashes are raised by the services
/// themselves.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut parts: Vec<String> = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                match &error.message {
                    Some(message) => parts.push(format!("{field}: {message}")),
                    None => parts.push(format!("{field}: {}", error.code)),
                }
            }
        }
        parts.sort();
        Self::Validation(parts.join("; "))
    }
}
