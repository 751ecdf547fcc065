use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type BookId = i32;

/// One row of the `books` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Unique identifier, assigned by storage
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Publication year
    pub year: i32,
    pub price: f64,
    pub category: String,
    /// Price before discount, present only for discounted books
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Discount percentage
    pub discount: i32,
    pub cover_image: String,
    pub rating: f64,
    pub reviews_count: i32,
    pub is_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i32>,
    pub language: String,
    pub publisher: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or updating a book
///
/// Every key is optional; absent keys take their zero value. Only title,
/// author, isbn, year and price are persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub year: i32,
    pub price: f64,
    pub category: String,
    pub original_price: Option<f64>,
    pub discount: i32,
    pub cover_image: String,
    pub rating: f64,
    pub reviews_count: i32,
    pub is_new: bool,
    pub pages: Option<i32>,
    pub language: String,
    pub publisher: String,
    pub description: String,
}

/// Storage-assigned identity and timestamps of a written row
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct RecordStamp {
    pub id: BookId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookInput {
    /// Echo the request body back with the fields storage assigned
    pub fn into_book(self, stamp: RecordStamp) -> Book {
        Book {
            id: stamp.id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            year: self.year,
            price: self.price,
            category: self.category,
            original_price: self.original_price,
            discount: self.discount,
            cover_image: self.cover_image,
            rating: self.rating,
            reviews_count: self.reviews_count,
            is_new: self.is_new,
            pages: self.pages,
            language: self.language,
            publisher: self.publisher,
            description: self.description,
            created_at: stamp.created_at,
            updated_at: stamp.updated_at,
        }
    }
}

/// Query string of the search endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

impl SearchParams {
    /// The keyword, if present and non-empty
    pub fn keyword(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_body_fills_zero_values() {
        let input: BookInput = serde_json::from_str(
            r#"{"title":"A","author":"B","isbn":"123","year":2020,"price":9.99}"#,
        )
        .unwrap();
        assert_eq!(input.title, "A");
        assert_eq!(input.year, 2020);
        assert_eq!(input.discount, 0);
        assert_eq!(input.original_price, None);
        assert!(!input.is_new);
    }

    #[test]
    fn wrong_value_type_is_rejected() {
        let parsed = serde_json::from_str::<BookInput>(r#"{"year":"twenty"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn absent_optionals_are_omitted_from_json() {
        let now = Utc::now();
        let book = BookInput::default().into_book(RecordStamp {
            id: 7,
            created_at: now,
            updated_at: now,
        });
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["id"], 7);
        assert!(value.get("original_price").is_none());
        assert!(value.get("pages").is_none());
        assert_eq!(value["created_at"], value["updated_at"]);
    }

    #[test]
    fn empty_search_keyword_counts_as_missing() {
        let params = SearchParams {
            q: Some(String::new()),
        };
        assert_eq!(params.keyword(), None);
        let params = SearchParams {
            q: Some("rust".to_string()),
        };
        assert_eq!(params.keyword(), Some("rust"));
    }
}
