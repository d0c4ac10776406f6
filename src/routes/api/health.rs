use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub database: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProbeStatus {
    pub status: String,
    pub timestamp: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(check))
        .route("/health/ready", get(ready))
        .route("/health/live", get(live))
        .with_state(state)
}

async fn check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<DatabaseHealth>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(DatabaseHealth {
                status: "ok".to_string(),
                database: "up".to_string(),
            }),
        ),
        Err(err) => {
            tracing::warn!("database ping failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(DatabaseHealth {
                    status: "error".to_string(),
                    database: "down".to_string(),
                }),
            )
        }
    }
}

async fn ready() -> Json<ProbeStatus> {
    Json(probe("ready"))
}

async fn live() -> Json<ProbeStatus> {
    Json(probe("live"))
}

fn probe(status: &str) -> ProbeStatus {
    ProbeStatus {
        status: status.to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
