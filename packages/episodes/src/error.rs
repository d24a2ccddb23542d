// ABOUTME: Service error taxonomy for episode and part operations
// ABOUTME: Validation, not-found, transaction failure, and internal errors

use partwise_core::ValidationError;
use partwise_positions::PositionError;
use partwise_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing, malformed, or conflicting request fields
    #[error("Validation error")]
    Validation(Vec<ValidationError>),

    /// Episode or part absent, or a part addressed through the wrong episode
    #[error("{0}")]
    NotFound(String),

    /// A multi-step write failed; the transaction was rolled back
    #[error("Transaction failed: {0}")]
    Transaction(#[source] StorageError),

    #[error("Internal error: {0}")]
    Internal(#[source] StorageError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Validation(vec![ValidationError::new(field, message)])
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    /// Translate a storage error raised between `begin` and `commit`
    pub fn in_transaction(error: StorageError) -> Self {
        match ServiceError::from(error) {
            ServiceError::Internal(inner) => ServiceError::Transaction(inner),
            other => other,
        }
    }

    /// Translate a reconciler error raised between `begin` and `commit`
    pub fn from_position(error: PositionError) -> Self {
        match error {
            PositionError::NegativePosition(_) => {
                ServiceError::validation("position", "The position must be at least 0.")
            }
            PositionError::UnknownPart(_) => {
                ServiceError::not_found("Part does not belong to the episode.")
            }
            PositionError::Gap(_) | PositionError::Duplicate(_) => {
                ServiceError::Transaction(StorageError::Database(error.to_string()))
            }
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(what) => ServiceError::NotFound(format!("{} not found.", what)),
            StorageError::DuplicateTitle(_) => {
                ServiceError::validation("title", "The title has already been taken.")
            }
            other => ServiceError::Internal(other),
        }
    }
}
