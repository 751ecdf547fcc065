//! Field selection for catalog read endpoints

use bookshelf_kernel::settings::Projection;
use serde_json::Value;

use super::models::Book;

const SUMMARY_FIELDS: &[&str] = &["id", "title", "author"];

const LISTING_FIELDS: &[&str] = &[
    "id",
    "title",
    "author",
    "isbn",
    "year",
    "price",
    "created_at",
    "updated_at",
];

/// Fields kept by a projection; `None` keeps everything
pub fn fields(projection: Projection) -> Option<&'static [&'static str]> {
    match projection {
        Projection::Summary => Some(SUMMARY_FIELDS),
        Projection::Listing => Some(LISTING_FIELDS),
        Projection::Full => None,
    }
}

/// Serialize a book keeping only the projection's fields
pub fn project(book: &Book, projection: Projection) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(book)?;
    if let (Some(keep), Value::Object(map)) = (fields(projection), &mut value) {
        map.retain(|key, _| keep.contains(&key.as_str()));
    }
    Ok(value)
}

pub fn project_all(books: &[Book], projection: Projection) -> serde_json::Result<Vec<Value>> {
    books.iter().map(|book| project(book, projection)).collect()
}
