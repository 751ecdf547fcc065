//! HTTP server facade for bookshelf with Axum, error handling, and OpenAPI support

use std::{future::Future, sync::Arc};

use anyhow::Context;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use bookshelf_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Start the HTTP server and serve until `shutdown` resolves
pub async fn start_server(
    registry: Arc<ModuleRegistry>,
    settings: &Settings,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let address = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!("starting HTTP server on {}", address);

    let app = build_router(registry, settings);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {}", address))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: Arc<ModuleRegistry>, settings: &Settings) -> Router {
    let prefix = settings.server.api_prefix.as_str();

    let health = Router::new()
        .route("/health", get(health_check))
        .with_state(registry.clone());

    RouterBuilder::new()
        .merge(health)
        .mount_modules(prefix, &registry)
        .with_openapi(prefix, &registry)
        .with_timeout(settings.server.request_timeout_ms)
        .with_request_id()
        .with_cors()
        .with_tracing()
        .build()
}

/// Health check endpoint; pings every module's storage
async fn health_check(State(registry): State<Arc<ModuleRegistry>>) -> impl IntoResponse {
    match registry.check_health().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "healthy" }))),
        Err(e) => {
            let error = format!("{:#}", e);
            tracing::warn!(%error, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "message": "unhealthy", "error": error })),
            )
        }
    }
}
