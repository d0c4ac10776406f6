use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use uuid::Uuid;

use crate::{
    config::{AppConfig, AuthConfig, DatabaseConfig},
    db::{
        AuthStore, NewSession, NewUser, connection,
        dao::{DaoLayerError, DaoResult},
        entities::{
            session::{self, SessionStatus},
            user,
        },
        store::Timestamp,
    },
    routes::router,
    services::AuthService,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// In-process [`AuthStore`] for tests.
///
/// Each conditional write checks and applies its predicate under one lock, so
/// it behaves like the single-statement updates of the SQL store. Reads yield
/// once before answering, letting concurrent callers interleave between the
/// lookup and the write the way they would against a real database.
#[derive(Default)]
pub struct MemoryAuthStore {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    users: Vec<user::Model>,
    sessions: Vec<session::Model>,
}

impl MemoryAuthStore {
    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn user_by_email(&self, email: &str) -> Option<user::Model> {
        self.lock().users.iter().find(|u| u.email == email).cloned()
    }

    pub fn session_by_token(&self, token: &str) -> Option<session::Model> {
        self.lock()
            .sessions
            .iter()
            .find(|s| s.token == token)
            .cloned()
    }

    pub fn sessions_for(&self, user_id: &Uuid) -> Vec<session::Model> {
        self.lock()
            .sessions
            .iter()
            .filter(|s| &s.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Moves the expiry of the session holding `token`.
    pub fn set_expiry(&self, token: &str, expires_at: Timestamp) {
        if let Some(session) = self.lock().sessions.iter_mut().find(|s| s.token == token) {
            session.expires_at = expires_at;
        }
    }
}

#[async_trait]
impl AuthStore for MemoryAuthStore {
    async fn find_user_by_email(&self, email: &str) -> DaoResult<Option<user::Model>> {
        tokio::task::yield_now().await;
        Ok(self.user_by_email(email))
    }

    async fn find_user_by_id(&self, id: &Uuid) -> DaoResult<Option<user::Model>> {
        tokio::task::yield_now().await;
        Ok(self.lock().users.iter().find(|u| &u.id == id).cloned())
    }

    async fn create_user(&self, new_user: NewUser<'_>) -> DaoResult<user::Model> {
        let mut state = self.lock();
        if state.users.iter().any(|u| u.email == new_user.email) {
            return Err(DaoLayerError::UniqueViolation { entity: "users" });
        }

        let now = Utc::now().fixed_offset();
        let model = user::Model {
            id: Uuid::new_v4(),
            email: new_user.email.to_string(),
            password_hash: new_user.password_hash.to_string(),
            role: new_user.role.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(model.clone());
        Ok(model)
    }

    async fn create_session(&self, new_session: NewSession<'_>) -> DaoResult<session::Model> {
        let mut state = self.lock();
        if state.sessions.iter().any(|s| s.token == new_session.token) {
            return Err(DaoLayerError::UniqueViolation { entity: "sessions" });
        }

        let now = Utc::now().fixed_offset();
        let model = session::Model {
            id: Uuid::new_v4(),
            token: new_session.token.to_string(),
            user_id: new_session.user_id,
            expires_at: new_session.expires_at,
            status: SessionStatus::Active.as_str().to_string(),
            user_agent: new_session.user_agent.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.sessions.push(model.clone());
        Ok(model)
    }

    async fn find_session_by_token(&self, token: &str) -> DaoResult<Option<session::Model>> {
        tokio::task::yield_now().await;
        Ok(self.session_by_token(token))
    }

    async fn update_session_token(
        &self,
        current: &str,
        replacement: &str,
        now: Timestamp,
    ) -> DaoResult<bool> {
        let mut state = self.lock();
        let matched = state.sessions.iter_mut().find(|s| {
            s.token == current
                && s.status == SessionStatus::Active.as_str()
                && s.expires_at > now
        });

        match matched {
            Some(session) => {
                session.token = replacement.to_string();
                session.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_session_status(
        &self,
        token: &str,
        from: SessionStatus,
        to: SessionStatus,
        now: Timestamp,
    ) -> DaoResult<u64> {
        let mut state = self.lock();
        let mut changed = 0;
        for session in state
            .sessions
            .iter_mut()
            .filter(|s| s.token == token && s.status == from.as_str())
        {
            session.status = to.as_str().to_string();
            session.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        auth: Some(AuthConfig::with_secret(TEST_JWT_SECRET)),
        ..AppConfig::default()
    }
}

pub fn mock_connection() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

/// Fresh in-memory SQLite with the schema synced. One pooled connection, since
/// every `:memory:` connection would otherwise see its own empty database.
pub async fn sqlite_memory_connection() -> anyhow::Result<DatabaseConnection> {
    connection::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_idle: 1,
    })
    .await
}

/// State over the given store, with `db` answering health pings.
pub fn test_state_with(
    cfg: AppConfig,
    store: Arc<dyn AuthStore>,
    db: DatabaseConnection,
) -> Arc<AppState> {
    let auth_cfg = cfg
        .auth
        .clone()
        .unwrap_or_else(|| AuthConfig::with_secret(TEST_JWT_SECRET));
    let auth = AuthService::from_config(store, &auth_cfg);
    AppState::new(cfg, db, auth)
}

pub fn test_router_with(cfg: AppConfig) -> (Router, Arc<MemoryAuthStore>) {
    let store = Arc::new(MemoryAuthStore::default());
    let state = test_state_with(cfg, store.clone(), mock_connection());
    (router(state), store)
}

pub fn test_router() -> (Router, Arc<MemoryAuthStore>) {
    test_router_with(test_config())
}
