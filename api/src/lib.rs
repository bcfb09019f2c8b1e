//! HTTP surface of the policy Q&A service.
//!
//! Routes:
//! - `POST /chat`          answer one question from the loaded policy
//! - `GET  /health`        liveness + whether a document is loaded
//! - `POST /admin/reload`  re-read the policy file (only when enabled)

mod core {
    pub mod app_state;
}
mod error_handler;
mod routes;

use std::sync::Arc;

use ai_llm_service::config::default_config::config_from_env;
use axum::{
    Router,
    routing::{get, post},
};
use contextor::ContextorConfig;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

pub use crate::core::app_state::{AppState, ServerConfig};
pub use crate::error_handler::{AppError, AppResult};

use crate::routes::{
    chat::chat_route::chat_route, health_route::health_route, reload::reload_route::reload_route,
};

/// Builds the router over a ready [`AppState`].
pub fn app(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/chat", post(chat_route))
        .route("/health", get(health_route));

    if server.reload_enabled {
        router = router.route("/admin/reload", post(reload_route));
    }

    router
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Reads configuration, loads the policy and serves until Ctrl+C.
///
/// # Errors
/// Invalid LLM configuration, bind failure or a fatal server error.
pub async fn start() -> AppResult<()> {
    let server = ServerConfig::from_env();
    let ctx = ContextorConfig::from_env();
    let llm = config_from_env()?;

    let state = AppState::bootstrap(&ctx, &llm).await?;
    let app = app(state, &server);

    let listener = tokio::net::TcpListener::bind(&server.address)
        .await
        .map_err(AppError::Bind)?;

    info!(
        address = %server.address,
        reload_enabled = server.reload_enabled,
        "policy Q&A API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
