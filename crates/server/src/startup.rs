use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use service::customer::{repo::seaorm::SeaOrmCustomerRepository, CustomerRepository};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect, optionally migrate, and hand back the database-backed repository.
async fn build_repository(cfg: &AppConfig) -> Result<Arc<dyn CustomerRepository>, StartupError> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Migration(e.to_string()))?;
        info!(event = "migrated", "database schema up to date");
    }
    Ok(Arc::new(SeaOrmCustomerRepository::new(db)))
}

/// Router over an already-built repository; used by `run` and by tests.
pub fn build_app(repo: Arc<dyn CustomerRepository>, cfg: &AppConfig) -> Router {
    let state = AppState::new(repo, cfg.validation.clone());
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: build the app from `cfg` and run the HTTP server until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let repo = build_repository(&cfg).await?;
    let app = build_app(repo, &cfg);

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("cannot bind {addr}: {e}")))?;
    info!(%addr, "customer server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    Ok(())
}
