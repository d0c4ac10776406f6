use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use super::{
    dao::{DaoContext, DaoResult, SessionDao, UserDao},
    entities::{
        session::{self, SessionStatus},
        user,
    },
};
use crate::auth::Role;

pub type Timestamp = chrono::DateTime<chrono::FixedOffset>;

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token: &'a str,
    pub expires_at: Timestamp,
    pub user_agent: &'a str,
}

/// Storage handle injected into the auth service.
///
/// Every mutation is a single conditional statement: implementations must
/// apply the predicate and the write atomically, so two callers racing on the
/// same row cannot both observe success.
#[async_trait]
pub trait AuthStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> DaoResult<Option<user::Model>>;

    async fn find_user_by_id(&self, id: &Uuid) -> DaoResult<Option<user::Model>>;

    /// Fails with `DaoLayerError::UniqueViolation` when the email is taken.
    async fn create_user(&self, new_user: NewUser<'_>) -> DaoResult<user::Model>;

    async fn create_session(&self, new_session: NewSession<'_>) -> DaoResult<session::Model>;

    /// Exact token match regardless of status or expiry.
    async fn find_session_by_token(&self, token: &str) -> DaoResult<Option<session::Model>>;

    /// `SET token = replacement WHERE token = current AND status = ACTIVE AND
    /// expires_at > now`; true when exactly one row changed.
    async fn update_session_token(
        &self,
        current: &str,
        replacement: &str,
        now: Timestamp,
    ) -> DaoResult<bool>;

    /// `SET status = to WHERE token = token AND status = from`; rows changed.
    async fn set_session_status(
        &self,
        token: &str,
        from: SessionStatus,
        to: SessionStatus,
        now: Timestamp,
    ) -> DaoResult<u64>;
}

#[derive(Clone)]
pub struct SeaOrmAuthStore {
    users: UserDao,
    sessions: SessionDao,
}

impl SeaOrmAuthStore {
    pub fn new(db: &DatabaseConnection) -> Self {
        let daos = DaoContext::new(db);
        Self {
            users: daos.user(),
            sessions: daos.session(),
        }
    }
}

#[async_trait]
impl AuthStore for SeaOrmAuthStore {
    async fn find_user_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        self.users.find_by_email(email).await
    }

    async fn find_user_by_id(&self, id: &Uuid) -> DaoResult<Option<user::Model>> {
        self.users.find_user(id).await
    }

    async fn create_user(&self, new_user: NewUser<'_>) -> DaoResult<user::Model> {
        self.users
            .create_user(new_user.email, new_user.password_hash, new_user.role)
            .await
    }

    async fn create_session(&self, new_session: NewSession<'_>) -> DaoResult<session::Model> {
        self.sessions
            .create_session(
                &new_session.user_id,
                new_session.token,
                new_session.expires_at,
                new_session.user_agent,
            )
            .await
    }

    async fn find_session_by_token(&self, token: &str) -> DaoResult<Option<session::Model>> {
        self.sessions.find_by_token(token).await
    }

    async fn update_session_token(
        &self,
        current: &str,
        replacement: &str,
        now: Timestamp,
    ) -> DaoResult<bool> {
        self.sessions.rotate_token(current, replacement, now).await
    }

    async fn set_session_status(
        &self,
        token: &str,
        from: SessionStatus,
        to: SessionStatus,
        now: Timestamp,
    ) -> DaoResult<u64> {
        self.sessions.transition_status(token, from, to, now).await
    }
}
