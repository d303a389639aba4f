//! Domain errors

use thiserror::Error;

/// Errors raised by the application services and repositories
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("username or email already registered")]
    DuplicateIdentity,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("validation: {0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("hashing error: {0}")]
    Hashing(String),

    #[error("signing error: {0}")]
    Signing(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
