use async_trait::async_trait;
use sqlx::PgPool;

use super::{
    new_window, BookStore, StoreError, FEATURED_LIMIT, FEATURED_MIN_RATING,
    FEATURED_MIN_REVIEWS, NEW_LIMIT,
};
use crate::modules::books::models::{Book, BookId, BookInput, RecordStamp};

/// Canonical column list. Decimal columns are read as float8 and nullable
/// text columns collapse to empty strings
const BOOK_COLUMNS: &str = r#"
    id, title, author, isbn, year,
    price::float8 AS price,
    COALESCE(category, '') AS category,
    original_price::float8 AS original_price,
    COALESCE(discount, 0) AS discount,
    COALESCE(cover_image, '') AS cover_image,
    COALESCE(rating, 0)::float8 AS rating,
    COALESCE(reviews_count, 0) AS reviews_count,
    COALESCE(is_new, false) AS is_new,
    pages,
    COALESCE(language, '') AS language,
    COALESCE(publisher, '') AS publisher,
    COALESCE(description, '') AS description,
    created_at, updated_at
"#;

/// `BookStore` over a shared PostgreSQL pool
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_books(&self, clauses: &str) -> Result<Vec<Book>, StoreError> {
        let sql = format!("SELECT {} FROM books {}", BOOK_COLUMNS, clauses);
        Ok(sqlx::query_as::<_, Book>(&sql).fetch_all(&self.pool).await?)
    }
}

/// Escape LIKE wildcards so the keyword matches literally
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        self.fetch_books("").await
    }

    async fn get(&self, id: BookId) -> Result<Book, StoreError> {
        let sql = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, input: &BookInput) -> Result<RecordStamp, StoreError> {
        let stamp = sqlx::query_as::<_, RecordStamp>(
            r#"
            INSERT INTO books (title, author, isbn, year, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.isbn)
        .bind(input.year)
        .bind(input.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(stamp)
    }

    async fn update(&self, id: BookId, input: &BookInput) -> Result<RecordStamp, StoreError> {
        sqlx::query_as::<_, RecordStamp>(
            r#"
            UPDATE books
            SET title = $1, author = $2, isbn = $3, year = $4, price = $5,
                updated_at = GREATEST(NOW(), created_at)
            WHERE id = $6
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.author)
        .bind(&input.isbn)
        .bind(input.year)
        .bind(input.price)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: BookId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM books \
             WHERE category IS NOT NULL AND category <> '' ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Book>, StoreError> {
        let sql = format!(
            "SELECT {} FROM books \
             WHERE title ILIKE $1 OR author ILIKE $1 OR description ILIKE $1",
            BOOK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(like_pattern(keyword))
            .fetch_all(&self.pool)
            .await?)
    }

    async fn featured(&self) -> Result<Vec<Book>, StoreError> {
        let sql = format!(
            "SELECT {} FROM books \
             WHERE rating >= $1 OR reviews_count >= $2 \
             ORDER BY rating DESC, reviews_count DESC \
             LIMIT $3",
            BOOK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(FEATURED_MIN_RATING)
            .bind(FEATURED_MIN_REVIEWS)
            .bind(FEATURED_LIMIT)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn new_arrivals(&self) -> Result<Vec<Book>, StoreError> {
        let sql = format!(
            "SELECT {} FROM books \
             WHERE is_new = true OR created_at >= NOW() - make_interval(days => $1) \
             ORDER BY created_at DESC \
             LIMIT $2",
            BOOK_COLUMNS
        );
        // make_interval takes int4
        let days = new_window().num_days() as i32;
        Ok(sqlx::query_as::<_, Book>(&sql)
            .bind(days)
            .bind(NEW_LIMIT)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn discounted(&self) -> Result<Vec<Book>, StoreError> {
        self.fetch_books("WHERE discount > 0 ORDER BY discount DESC")
            .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(bookshelf_db::ping(&self.pool).await?)
    }
}
