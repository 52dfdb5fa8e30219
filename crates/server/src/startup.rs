use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use configs::{AppConfig, DatabaseConfig, StoreKind};
use service::storage::{DocumentStore, MemoryStore, MongoStore};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

/// Any origin, any method: the API is consumed by a browser front end on another host.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Create the one store handle shared by every request and wait until it
/// answers a ping.
pub async fn build_store(db: &DatabaseConfig) -> Result<Arc<dyn DocumentStore>, StartupError> {
    let store: Arc<dyn DocumentStore> = match db.store {
        StoreKind::Memory => {
            warn!(event = "memory_store", "using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
        StoreKind::Mongo => {
            let database = models::db::open(db)
                .await
                .map_err(|e| StartupError::Store(e.to_string()))?;
            Arc::new(MongoStore::new(database))
        }
    };
    wait_until_ready(store.as_ref(), db).await?;
    Ok(store)
}

/// Ping the store, retrying `connect_retries` times with doubling backoff.
/// Gives up with [`StartupError::Store`] so startup fails fast.
pub async fn wait_until_ready(store: &dyn DocumentStore, db: &DatabaseConfig) -> Result<(), StartupError> {
    let mut backoff = Duration::from_millis(db.retry_backoff_ms);
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        match store.ping().await {
            Ok(()) => {
                info!(database = %db.name, attempt, "document store ready");
                return Ok(());
            }
            Err(e) if attempt <= db.connect_retries => {
                warn!(
                    database = %db.name,
                    attempt,
                    retry_in_ms = backoff.as_millis() as u64,
                    error = %e,
                    "document store ping failed; retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2);
            }
            Err(e) => {
                return Err(StartupError::Store(format!(
                    "`{}` unreachable after {} attempts: {}",
                    db.name, attempt, e
                )));
            }
        }
    }
}

/// Router with CORS and tracing layers around the given state.
pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Public entry: connect the store, build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let addr = cfg
        .server
        .bind_addr()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let store = build_store(&cfg.database).await?;
    let state = AppState::new(store, &cfg.database);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, database = %cfg.database.name, "service spot listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(common::signal::shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}
