//! Salesboard API server implementation
//!
//! HTTP REST API server using Axum for the dashboard front end.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::handlers;
use crate::cache::DatasetCache;
use crate::config::Config;

/// API Server configuration
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    pub version: String,
    pub config: Config,
    /// Parsed sales/target datasets, keyed by grid content
    pub cache: DatasetCache,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            cache: DatasetCache::new(config.parser.clone()),
            config,
        }
    }
}

/// Routes with CORS and request tracing
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Core API endpoints
        .route("/api/v1/parse", post(handlers::parse))
        .route("/api/v1/totals", post(handlers::totals))
        .route("/api/v1/representative", post(handlers::representative))
        .route("/api/v1/overview", post(handlers::overview))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(api: ApiConfig, config: Config) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salesboard=info,tower_http=info".into()),
        )
        .init();

    info!(data_dir = %config.data_dir.display(), "configuration loaded");
    let app = router(Arc::new(AppState::new(config)));

    let addr: SocketAddr = format!("{}:{}", api.host, api.port).parse()?;
    info!("Salesboard API server starting on http://{}", addr);
    info!("   Endpoints: /api/v1/parse, /api/v1/totals, /api/v1/representative, /api/v1/overview");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Salesboard API server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
