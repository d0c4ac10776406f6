use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{auth, health};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router(state.clone()))
        .merge(auth::router(state))
}
