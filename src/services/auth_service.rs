use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    auth::{
        AuthError, Role, TokenIssuer,
        password::{hash_password_blocking, verify_against_dummy, verify_password_blocking},
        tokens::generate_refresh_token,
    },
    config::AuthConfig,
    db::{
        AuthStore, NewSession, NewUser,
        dao::DaoLayerError,
        entities::{
            session::{self, SessionStatus},
            user,
        },
    },
};

/// Result of register and login: the user plus a fresh credential pair.
#[derive(Debug)]
pub struct AuthSession {
    pub user: user::Model,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Register/login/refresh/logout over an injected [`AuthStore`].
///
/// The service keeps nothing between calls. Each login opens its own session
/// row, so a user may hold several live refresh tokens (one per device). A
/// refresh rewrites the token of its row in place; the previous value stops
/// matching anything.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn AuthStore>,
    issuer: TokenIssuer,
    refresh_ttl: Duration,
    require_logout_token: bool,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn AuthStore>,
        issuer: TokenIssuer,
        refresh_ttl: Duration,
        require_logout_token: bool,
    ) -> Self {
        Self {
            store,
            issuer,
            refresh_ttl,
            require_logout_token,
        }
    }

    pub fn from_config(store: Arc<dyn AuthStore>, cfg: &AuthConfig) -> Self {
        Self::new(
            store,
            TokenIssuer::new(cfg.jwt_secret.as_bytes(), cfg.access_ttl_secs),
            Duration::days(cfg.refresh_ttl_days),
            cfg.require_logout_token,
        )
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
        user_agent: &str,
    ) -> Result<AuthSession, AuthError> {
        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        let password_hash = hash_password_blocking(password.to_string()).await?;
        let user = self
            .store
            .create_user(NewUser {
                email,
                password_hash: &password_hash,
                role,
            })
            .await
            .map_err(|err| match err {
                // Lost the race against a concurrent registration.
                DaoLayerError::UniqueViolation { .. } => AuthError::EmailAlreadyRegistered,
                other => AuthError::Storage(other),
            })?;
        tracing::info!(user_id = %user.id, role = user.role().as_str(), "user registered");

        self.open_session(user, user_agent).await
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        user_agent: &str,
    ) -> Result<AuthSession, AuthError> {
        let Some(user) = self.store.find_user_by_email(email).await? else {
            verify_against_dummy(password.to_string()).await;
            return Err(AuthError::InvalidCredentials);
        };

        let password_ok =
            verify_password_blocking(password.to_string(), user.password_hash.clone()).await?;
        if !password_ok {
            return Err(AuthError::InvalidCredentials);
        }

        self.open_session(user, user_agent).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let session = self
            .store
            .find_session_by_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let now = Utc::now().fixed_offset();
        if !session.is_usable_at(&now) {
            tracing::debug!(session_id = %session.id, status = %session.status, "refresh on dead session");
            return Err(AuthError::ExpiredOrRevoked);
        }

        let user = self
            .store
            .find_user_by_id(&session.user_id)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        let replacement = generate_refresh_token();
        let swapped = self
            .store
            .update_session_token(refresh_token, &replacement, now)
            .await?;
        if !swapped {
            tracing::warn!(session_id = %session.id, "refresh token already rotated or revoked");
            return Err(AuthError::InvalidRefreshToken);
        }

        let access_token = self.issuer.issue_access_token(&user.id, user.role())?;
        Ok(TokenPair {
            access_token,
            refresh_token: replacement,
        })
    }

    /// Revokes the session behind `refresh_token` and returns it. Unknown or
    /// already revoked tokens yield `None`, so repeating a logout is harmless.
    pub async fn logout(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<Option<session::Model>, AuthError> {
        let Some(token) = refresh_token.filter(|token| !token.is_empty()) else {
            if self.require_logout_token {
                return Err(AuthError::MissingCredential);
            }
            return Ok(None);
        };

        let Some(mut session) = self.store.find_session_by_token(token).await? else {
            tracing::debug!("logout matched no session");
            return Ok(None);
        };

        let now = Utc::now().fixed_offset();
        let revoked = self
            .store
            .set_session_status(token, SessionStatus::Active, SessionStatus::Revoked, now)
            .await?;
        if revoked == 0 {
            tracing::debug!(session_id = %session.id, "logout on inactive session");
            return Ok(None);
        }

        tracing::info!(user_id = %session.user_id, session_id = %session.id, "session revoked");
        session.status = SessionStatus::Revoked.as_str().to_string();
        session.updated_at = now;
        Ok(Some(session))
    }

    pub async fn current_user(&self, access_token: &str) -> Result<user::Model, AuthError> {
        let claims = self.issuer.verify_access_token(access_token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        self.store
            .find_user_by_id(&user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Creates the configured admin account once; later boots leave it alone.
    pub async fn seed_admin(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if let Some(existing) = self.store.find_user_by_email(email).await? {
            tracing::info!("admin user already present: {}", existing.email);
            return Ok(());
        }

        let password_hash = hash_password_blocking(password.to_string()).await?;
        let user = self
            .store
            .create_user(NewUser {
                email,
                password_hash: &password_hash,
                role: Role::Admin,
            })
            .await?;
        tracing::info!("seeded admin user {}", user.email);
        Ok(())
    }

    async fn open_session(
        &self,
        user: user::Model,
        user_agent: &str,
    ) -> Result<AuthSession, AuthError> {
        let access_token = self.issuer.issue_access_token(&user.id, user.role())?;
        let refresh_token = generate_refresh_token();

        let session = self
            .store
            .create_session(NewSession {
                user_id: user.id,
                token: &refresh_token,
                expires_at: Utc::now().fixed_offset() + self.refresh_ttl,
                user_agent,
            })
            .await?;
        tracing::info!(user_id = %user.id, session_id = %session.id, "session opened");

        Ok(AuthSession {
            user,
            access_token,
            refresh_token,
        })
    }
}
