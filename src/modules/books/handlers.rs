use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use bookshelf_http::error::AppError;
use bookshelf_kernel::settings::{Projection, ProjectionSettings};
use serde_json::{json, Value};

use super::models::{Book, BookId, BookInput, SearchParams};
use super::projection::{project, project_all};
use super::store::{BookStore, StoreError};

const NOT_FOUND_MESSAGE: &str = "book not found";

/// Shared state of every catalog handler
#[derive(Clone)]
pub struct CatalogState {
    pub store: Arc<dyn BookStore>,
    pub projections: ProjectionSettings,
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::not_found(NOT_FOUND_MESSAGE),
            StoreError::Database(e) => AppError::Internal(e.into()),
        }
    }
}

/// A non-numeric id cannot match any row
fn parse_id(raw: &str) -> Result<BookId, AppError> {
    raw.parse().map_err(|_| AppError::not_found(NOT_FOUND_MESSAGE))
}

fn parse_body(body: Result<Json<BookInput>, JsonRejection>) -> Result<BookInput, AppError> {
    body.map(|Json(input)| input)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

fn respond_many(books: &[Book], projection: Projection) -> Result<Json<Vec<Value>>, AppError> {
    let values = project_all(books, projection).map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(values))
}

pub async fn list_books(State(state): State<CatalogState>) -> Result<Json<Vec<Value>>, AppError> {
    let books = state.store.list().await?;
    respond_many(&books, state.projections.list)
}

pub async fn get_book(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let book = state.store.get(parse_id(&id)?).await?;
    let value = project(&book, state.projections.get).map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(value))
}

pub async fn create_book(
    State(state): State<CatalogState>,
    body: Result<Json<BookInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let input = parse_body(body)?;
    let stamp = state.store.create(&input).await?;

    tracing::info!(book_id = stamp.id, "book created");
    Ok((StatusCode::CREATED, Json(input.into_book(stamp))))
}

pub async fn update_book(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    body: Result<Json<BookInput>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let input = parse_body(body)?;
    let id = parse_id(&id)?;
    let stamp = state.store.update(id, &input).await?;

    tracing::info!(book_id = id, "book updated");
    Ok(Json(input.into_book(stamp)))
}

pub async fn delete_book(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    state.store.delete(id).await?;

    tracing::info!(book_id = id, "book deleted");
    Ok(Json(json!({ "message": "book deleted successfully" })))
}

pub async fn list_categories(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.store.categories().await?))
}

pub async fn search_books(
    State(state): State<CatalogState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Value>>, AppError> {
    let keyword = params
        .keyword()
        .ok_or_else(|| AppError::bad_request("missing search query"))?;
    let books = state.store.search(keyword).await?;
    respond_many(&books, state.projections.search)
}

pub async fn featured_books(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<Value>>, AppError> {
    let books = state.store.featured().await?;
    respond_many(&books, state.projections.featured)
}

pub async fn new_books(State(state): State<CatalogState>) -> Result<Json<Vec<Value>>, AppError> {
    let books = state.store.new_arrivals().await?;
    respond_many(&books, state.projections.new)
}

pub async fn discounted_books(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<Value>>, AppError> {
    let books = state.store.discounted().await?;
    respond_many(&books, state.projections.discounted)
}
