pub mod handlers;
pub mod models;
pub mod openapi;
pub mod projection;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookshelf_kernel::{settings::ProjectionSettings, InitCtx, Module};

use handlers::CatalogState;
use store::BookStore;

/// Book catalog module: CRUD plus curated listings over one `books` table
pub struct BooksModule {
    state: CatalogState,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>, projections: ProjectionSettings) -> Self {
        Self {
            state: CatalogState { store, projections },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            projections = ?self.state.projections,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/books", get(handlers::list_books).post(handlers::create_book))
            .route("/books/search", get(handlers::search_books))
            .route("/books/featured", get(handlers::featured_books))
            .route("/books/new", get(handlers::new_books))
            .route("/books/discounted", get(handlers::discounted_books))
            .route(
                "/books/{id}",
                get(handlers::get_book)
                    .put(handlers::update_book)
                    .delete(handlers::delete_book),
            )
            .route("/categories", get(handlers::list_categories))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::fragment())
    }

    async fn health(&self) -> anyhow::Result<()> {
        self.state.store.ping().await?;
        Ok(())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module over the given store
pub fn create_module(
    store: Arc<dyn BookStore>,
    projections: ProjectionSettings,
) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store, projections))
}
