use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tower_http::trace::TraceLayer;

use session_auth::{
    config::AppConfig,
    db::{SeaOrmAuthStore, connection},
    logging::init_tracing,
    routes::router,
    services::AuthService,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("failed to load config")?;
    init_tracing(&cfg.logging);

    let db = connection::connect(cfg.database()?).await?;

    let auth_cfg = cfg.auth()?;
    let store = Arc::new(SeaOrmAuthStore::new(&db));
    let auth = AuthService::from_config(store, auth_cfg);

    if let Some((email, password)) = auth_cfg.admin_credentials() {
        auth.seed_admin(email, password)
            .await
            .context("failed to seed admin user")?;
    }

    let addr: SocketAddr = format!("{}:{}", cfg.general.host, cfg.general.port)
        .parse()
        .context("invalid host/port")?;

    let state = AppState::new(cfg.clone(), db, auth);
    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(TraceLayer::new_for_http());

    tracing::info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
