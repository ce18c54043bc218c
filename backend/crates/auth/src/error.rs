//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! Internally every failure kind is distinct so callers and tests can tell
//! them apart. Outwardly, all authentication failures collapse into one
//! uniform 401 so a client cannot learn which check rejected it.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::credentials::CredentialError;
use platform::password::{PasswordHashError, PasswordPolicyError};
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    // ------------------------------------------------------------------------
    // Authentication (all rendered as a uniform 401)
    // ------------------------------------------------------------------------
    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing or malformed bearer token")]
    MissingToken,

    #[error("Missing API key")]
    MissingKey,

    #[error("Malformed access token")]
    MalformedToken,

    #[error("Access token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Refresh token has been revoked")]
    Revoked,

    #[error("Refresh token not found")]
    RefreshTokenNotFound,

    /// Collapsed outcome of a failed refresh or API key check
    #[error("Unauthorized")]
    Unauthorized,

    // ------------------------------------------------------------------------
    // Authorization
    // ------------------------------------------------------------------------
    /// Authenticated subject does not own the resource
    #[error("Forbidden")]
    Forbidden,

    // ------------------------------------------------------------------------
    // Domain
    // ------------------------------------------------------------------------
    #[error("Email is already registered")]
    EmailTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Chirp not found")]
    ChirpNotFound,

    #[error("Chirp is too long ({actual} > {max} characters)")]
    ChirpTooLong { max: usize, actual: usize },

    #[error("Validation failed: {0}")]
    Validation(String),

    // ------------------------------------------------------------------------
    // Infrastructure
    // ------------------------------------------------------------------------
    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    #[error("Store failure: {0}")]
    StoreFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// True for every kind that must be reported as a plain "unauthorized"
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::MissingToken
                | AuthError::MissingKey
                | AuthError::MalformedToken
                | AuthError::InvalidSignature
                | AuthError::Expired
                | AuthError::Revoked
                | AuthError::RefreshTokenNotFound
                | AuthError::Unauthorized
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            e if e.is_authentication_failure() => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::UserNotFound | AuthError::ChirpNotFound => ErrorKind::NotFound,
            AuthError::ChirpTooLong { .. } | AuthError::Validation(_) => ErrorKind::BadRequest,
            _ => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Authentication failures share one message; infrastructure failures
    /// never expose their detail.
    pub fn to_app_error(&self) -> AppError {
        match self {
            e if e.is_authentication_failure() => AppError::unauthorized("Unauthorized"),
            AuthError::Forbidden => {
                AppError::forbidden("You are not allowed to modify this resource")
            }
            AuthError::HashingFailure(_) | AuthError::StoreFailure(_) | AuthError::Internal(_) => {
                AppError::internal("Something went wrong")
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            AuthError::StoreFailure(msg) => {
                tracing::error!(error = %msg, "Auth store failure");
            }
            AuthError::HashingFailure(msg) => {
                tracing::error!(error = %msg, "Password hashing failure");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidSignature => {
                tracing::warn!("Access token with invalid signature presented");
            }
            AuthError::Forbidden => {
                tracing::warn!("Ownership check denied a mutation");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::MissingToken => AuthError::MissingToken,
            CredentialError::MissingKey => AuthError::MissingKey,
        }
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::HashingFailure(err.to_string())
    }
}

impl From<PasswordPolicyError> for AuthError {
    fn from(err: PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::StoreFailure(err.to_string())
    }
}
