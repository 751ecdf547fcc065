//! Wiring shared by the binaries and the router tests

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules::{
    self,
    books::store::{BookStore, MemoryBookStore, PgBookStore},
};

/// Where the catalog keeps its rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// Process memory; data is lost on exit
    Memory,
}

/// Registry holding every module over the given store
pub fn registry(store: Arc<dyn BookStore>, settings: &Settings) -> Arc<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store, settings);
    Arc::new(registry)
}

/// Full HTTP application over the given store
pub fn app(store: Arc<dyn BookStore>, settings: &Settings) -> Router {
    bookshelf_http::build_router(registry(store, settings), settings)
}

/// Run the service until Ctrl-C
pub async fn serve(settings: Settings, backend: StoreBackend) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        backend = ?backend,
        "bookshelf bootstrap starting"
    );

    let (store, pool) = match backend {
        StoreBackend::Postgres => {
            let pool = bookshelf_db::connect(&settings.database).await?;
            let store: Arc<dyn BookStore> = Arc::new(PgBookStore::new(pool.clone()));
            (store, Some(pool))
        }
        StoreBackend::Memory => {
            let store: Arc<dyn BookStore> = Arc::new(MemoryBookStore::new());
            (store, None)
        }
    };

    let registry = registry(store, &settings);
    let ctx = InitCtx {
        settings: &settings,
    };
    registry
        .init_all(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_all(&ctx)
        .await
        .context("module start failed")?;

    tracing::info!("bookshelf bootstrap complete");
    let served = bookshelf_http::start_server(registry.clone(), &settings, shutdown_signal()).await;

    registry.stop_all().await?;
    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("database pool closed");
    }

    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
