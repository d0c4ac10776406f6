use crate::db::dao::DaoLayerError;

/// Outcomes of the auth protocol. Everything except `Storage` and `Internal`
/// is a caller mistake and maps to a 4xx at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already registered")]
    EmailAlreadyRegistered,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("refresh token expired or revoked")]
    ExpiredOrRevoked,
    #[error("invalid token")]
    InvalidToken,
    #[error("no refresh token provided")]
    MissingCredential,
    #[error(transparent)]
    Storage(#[from] DaoLayerError),
    #[error("{0}")]
    Internal(String),
}

impl AuthError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True for the variants a client caused; false for infrastructure failures.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::Storage(_) | AuthError::Internal(_))
    }
}
