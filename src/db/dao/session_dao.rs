use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::Expr,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::session::{self, Entity as Session, SessionStatus};

type Timestamp = chrono::DateTime<chrono::FixedOffset>;

#[derive(Clone)]
pub struct SessionDao {
    db: DatabaseConnection,
}

impl DaoBase for SessionDao {
    type Entity = Session;
    const ENTITY_NAME: &'static str = "sessions";

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl SessionDao {
    pub async fn create_session(
        &self,
        user_id: &Uuid,
        token: &str,
        expires_at: Timestamp,
        user_agent: &str,
    ) -> DaoResult<session::Model> {
        let model = session::ActiveModel {
            token: Set(token.to_string()),
            user_id: Set(*user_id),
            expires_at: Set(expires_at),
            status: Set(SessionStatus::Active.as_str().to_string()),
            user_agent: Set(user_agent.to_string()),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<session::Model>> {
        let token = token.to_string();
        self.find_one(move |query| query.filter(session::Column::Token.eq(token)))
            .await
    }

    /// Swaps `current` for `replacement` in one statement, only while the row
    /// is still ACTIVE and unexpired at `now`. Returns whether the swap won.
    pub async fn rotate_token(
        &self,
        current: &str,
        replacement: &str,
        now: Timestamp,
    ) -> DaoResult<bool> {
        let result = Session::update_many()
            .col_expr(session::Column::Token, Expr::value(replacement.to_string()))
            .col_expr(session::Column::UpdatedAt, Expr::value(now))
            .filter(session::Column::Token.eq(current))
            .filter(session::Column::Status.eq(SessionStatus::Active.as_str()))
            .filter(session::Column::ExpiresAt.gt(now))
            .exec(&self.db)
            .await
            .map_err(|err| DaoLayerError::from_write(Self::ENTITY_NAME, err))?;
        Ok(result.rows_affected == 1)
    }

    /// Moves the session holding `token` from `from` to `to`. Returns the
    /// number of rows changed; zero means nothing was in state `from`.
    pub async fn transition_status(
        &self,
        token: &str,
        from: SessionStatus,
        to: SessionStatus,
        now: Timestamp,
    ) -> DaoResult<u64> {
        let result = Session::update_many()
            .col_expr(session::Column::Status, Expr::value(to.as_str()))
            .col_expr(session::Column::UpdatedAt, Expr::value(now))
            .filter(session::Column::Token.eq(token))
            .filter(session::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(result.rows_affected)
    }
}
