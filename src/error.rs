use axum::extract::rejection::JsonRejection;

use crate::{auth::AuthError, db::dao::DaoLayerError};

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Internal(message) => message.as_str(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::unauthorized("Invalid credentials"),
            AuthError::EmailAlreadyRegistered => AppError::conflict("Email already registered"),
            // Callers never learn which refresh check failed.
            AuthError::InvalidRefreshToken | AuthError::ExpiredOrRevoked => {
                AppError::unauthorized("Invalid or expired refresh token")
            }
            AuthError::MissingCredential => AppError::unauthorized("Refresh token missing"),
            AuthError::InvalidToken => AppError::unauthorized("Invalid or expired access token"),
            AuthError::Storage(err) => err.into(),
            AuthError::Internal(message) => {
                tracing::error!("auth failure: {message}");
                AppError::internal(INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl From<DaoLayerError> for AppError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::NotFound { .. } => AppError::not_found(err.to_string()),
            DaoLayerError::UniqueViolation { .. } => AppError::conflict(err.to_string()),
            DaoLayerError::Db(_) => {
                tracing::error!("storage failure: {err}");
                AppError::internal(INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}
