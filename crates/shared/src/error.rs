use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures raised by domain entities. Split the way callers report them:
/// malformed field input versus an operation a business rule forbids.
/// Entities fail fast and leave their state untouched on any of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    RuleViolation(String),

    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: f64, requested: f64 },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn rule(message: impl Into<String>) -> Self {
        Self::RuleViolation(message.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised behind the repository and unit-of-work contracts.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("no transaction in progress")]
    NoActiveTransaction,

    #[error("a transaction is already in progress")]
    TransactionInProgress,
}
