use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, ServerConfig};
use migration::MigratorTrait;
use service::dog::repo::seaorm::SeaOrmDogRepository;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Prefer the config file; without one, fall back to `SERVER_HOST`/`SERVER_PORT`/`DATABASE_URL`.
pub fn load_config() -> Result<AppConfig, StartupError> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!(error = %e, "config file unavailable, using environment");
            AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
        }
    }
}

fn bind_addr(server: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", server.host, server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address {}:{}: {e}", server.host, server.port)))
}

/// Connect, migrate and assemble the router for a given config.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    common::env::ensure_sqlite_dir(&cfg.database.url).await?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Migration(e.to_string()))?;

    let state = ServerState::new(Arc::new(SeaOrmDogRepository::new(db)));
    Ok(routes::build_router(state, build_cors()))
}

/// Serve the roster on the configured address until `shutdown` resolves.
pub async fn run<S>(cfg: AppConfig, shutdown: S) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg.server)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "kennel server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("kennel server drained");
    Ok(())
}
