//! Storage seam for the catalog

use async_trait::async_trait;
use chrono::Duration;

use super::models::{Book, BookId, BookInput, RecordStamp};

mod memory;
mod postgres;

pub use memory::MemoryBookStore;
pub use postgres::PgBookStore;

/// A book is featured when it reaches either threshold
pub const FEATURED_MIN_RATING: f64 = 4.5;
pub const FEATURED_MIN_REVIEWS: i32 = 100;
pub const FEATURED_LIMIT: i64 = 20;

pub const NEW_LIMIT: i64 = 20;

/// How far back `created_at` still counts as new
pub fn new_window() -> Duration {
    Duration::days(30)
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("book not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Every method is a single round trip; none spans statements
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All rows in storage order
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    async fn get(&self, id: BookId) -> Result<Book, StoreError>;

    /// Persist title, author, isbn, year and price of a new row
    async fn create(&self, input: &BookInput) -> Result<RecordStamp, StoreError>;

    /// Overwrite title, author, isbn, year and price; refreshes `updated_at`
    async fn update(&self, id: BookId, input: &BookInput) -> Result<RecordStamp, StoreError>;

    async fn delete(&self, id: BookId) -> Result<(), StoreError>;

    /// Sorted distinct non-empty categories
    async fn categories(&self) -> Result<Vec<String>, StoreError>;

    /// Case-insensitive substring match over title, author and description
    async fn search(&self, keyword: &str) -> Result<Vec<Book>, StoreError>;

    /// Highly rated or much reviewed, best first
    async fn featured(&self) -> Result<Vec<Book>, StoreError>;

    /// Flagged new or recently created, newest first
    async fn new_arrivals(&self) -> Result<Vec<Book>, StoreError>;

    /// Discounted books, largest discount first
    async fn discounted(&self) -> Result<Vec<Book>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
