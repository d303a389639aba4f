//! HTTP error type
//!
//! `ApiError` is the only place where failures are turned into a status code
//! and a `{code, msg}` body. Internal details (store, hashing and signing
//! failures) are logged here and never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use super::ErrorBody;
use crate::domain::DomainError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("username or email already registered")]
    DuplicateIdentity,

    #[error("Authorization header is required")]
    MissingCredential,

    #[error("Authorization header must be 'Bearer <token>'")]
    MalformedCredential,

    #[error("invalid or expired token")]
    InvalidCredential,

    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid resource id")]
    InvalidResourceId,

    #[error("{0} not found")]
    ResourceNotFound(&'static str),

    #[error("You are not the owner of this post")]
    NotOwner,

    #[error("internal server error")]
    Store,

    #[error("failed to process password")]
    Hashing,

    #[error("failed to issue token")]
    Signing,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidJson(_) | Self::MalformedCredential | Self::InvalidResourceId => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials
            | Self::MissingCredential
            | Self::InvalidCredential
            | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::DuplicateIdentity => StatusCode::CONFLICT,
            Self::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            Self::NotOwner => StatusCode::FORBIDDEN,
            Self::Store | Self::Hashing | Self::Signing => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable application error code
    pub fn code(&self) -> i32 {
        match self {
            Self::Validation(_) => 1001,
            Self::InvalidJson(_) => 1002,
            Self::InvalidCredentials => 2001,
            Self::DuplicateIdentity => 2002,
            Self::MissingCredential => 2003,
            Self::MalformedCredential => 2004,
            Self::InvalidCredential => 2005,
            Self::Unauthenticated => 2006,
            Self::InvalidResourceId => 3001,
            Self::ResourceNotFound(_) => 3002,
            Self::NotOwner => 3003,
            Self::Store => 5000,
            Self::Hashing => 5001,
            Self::Signing => 5002,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity, .. } => Self::ResourceNotFound(entity),
            DomainError::DuplicateIdentity => Self::DuplicateIdentity,
            DomainError::InvalidCredentials => Self::InvalidCredentials,
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::Store(detail) => {
                error!(error = %detail, "Store failure");
                Self::Store
            }
            DomainError::Hashing(detail) => {
                error!(error = %detail, "Password hashing failure");
                Self::Hashing
            }
            DomainError::Signing(detail) => {
                error!(error = %detail, "Token signing failure");
                Self::Signing
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            msg: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
