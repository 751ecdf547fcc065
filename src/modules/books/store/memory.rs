use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{
    new_window, BookStore, StoreError, FEATURED_LIMIT, FEATURED_MIN_RATING,
    FEATURED_MIN_REVIEWS, NEW_LIMIT,
};
use crate::modules::books::models::{Book, BookId, BookInput, RecordStamp};

/// In-process `BookStore` with the same observable behaviour as the
/// PostgreSQL one. Rows are kept in id order
#[derive(Default)]
pub struct MemoryBookStore {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    books: Vec<Book>,
    last_id: BookId,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing rows, e.g. fixtures carrying every column
    pub fn with_books(mut books: Vec<Book>) -> Self {
        books.sort_by_key(|book| book.id);
        let last_id = books.last().map_or(0, |book| book.id);
        Self {
            state: RwLock::new(State { books, last_id }),
        }
    }

    async fn select(
        &self,
        filter: impl Fn(&Book) -> bool,
        order: impl FnMut(&Book, &Book) -> Ordering,
        limit: Option<i64>,
    ) -> Vec<Book> {
        let state = self.state.read().await;
        let mut books: Vec<Book> = state.books.iter().filter(|book| filter(book)).cloned().collect();
        books.sort_by(order);
        if let Some(limit) = limit {
            books.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        books
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.state.read().await.books.clone())
    }

    async fn get(&self, id: BookId) -> Result<Book, StoreError> {
        let state = self.state.read().await;
        state
            .books
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, input: &BookInput) -> Result<RecordStamp, StoreError> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let now = Utc::now();
        let stamp = RecordStamp {
            id: state.last_id,
            created_at: now,
            updated_at: now,
        };

        // Only the persisted columns survive, as in the table
        let stored = BookInput {
            title: input.title.clone(),
            author: input.author.clone(),
            isbn: input.isbn.clone(),
            year: input.year,
            price: input.price,
            ..BookInput::default()
        };
        state.books.push(stored.into_book(stamp));

        Ok(stamp)
    }

    async fn update(&self, id: BookId, input: &BookInput) -> Result<RecordStamp, StoreError> {
        let mut state = self.state.write().await;
        let book = state
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(StoreError::NotFound)?;

        book.title = input.title.clone();
        book.author = input.author.clone();
        book.isbn = input.isbn.clone();
        book.year = input.year;
        book.price = input.price;
        book.updated_at = Utc::now().max(book.created_at);

        Ok(RecordStamp {
            id: book.id,
            created_at: book.created_at,
            updated_at: book.updated_at,
        })
    }

    async fn delete(&self, id: BookId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let before = state.books.len();
        state.books.retain(|book| book.id != id);
        if state.books.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<String>, StoreError> {
        let state = self.state.read().await;
        let mut categories: Vec<String> = state
            .books
            .iter()
            .filter(|book| !book.category.is_empty())
            .map(|book| book.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Book>, StoreError> {
        let needle = keyword.to_lowercase();
        Ok(self
            .select(
                |book| {
                    contains_ignore_case(&book.title, &needle)
                        || contains_ignore_case(&book.author, &needle)
                        || contains_ignore_case(&book.description, &needle)
                },
                |a, b| a.id.cmp(&b.id),
                None,
            )
            .await)
    }

    async fn featured(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self
            .select(
                |book| book.rating >= FEATURED_MIN_RATING || book.reviews_count >= FEATURED_MIN_REVIEWS,
                |a, b| {
                    b.rating
                        .total_cmp(&a.rating)
                        .then_with(|| b.reviews_count.cmp(&a.reviews_count))
                },
                Some(FEATURED_LIMIT),
            )
            .await)
    }

    async fn new_arrivals(&self) -> Result<Vec<Book>, StoreError> {
        let since = Utc::now() - new_window();
        Ok(self
            .select(
                |book| book.is_new || book.created_at >= since,
                |a, b| b.created_at.cmp(&a.created_at),
                Some(NEW_LIMIT),
            )
            .await)
    }

    async fn discounted(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self
            .select(
                |book| book.discount > 0,
                |a, b| b.discount.cmp(&a.discount),
                None,
            )
            .await)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn book(id: BookId, title: &str) -> Book {
        let created = Utc::now() - Duration::days(365);
        BookInput {
            title: title.to_string(),
            author: "Anon".to_string(),
            ..BookInput::default()
        }
        .into_book(RecordStamp {
            id,
            created_at: created,
            updated_at: created,
        })
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids_after_fixtures() {
        let store = MemoryBookStore::with_books(vec![book(4, "a"), book(2, "b")]);
        let stamp = store.create(&BookInput::default()).await.unwrap();
        assert_eq!(stamp.id, 5);
        assert_eq!(stamp.created_at, stamp.updated_at);

        let ids: Vec<BookId> = store.list().await.unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 4, 5]);
    }

    #[tokio::test]
    async fn create_drops_unpersisted_columns() {
        let store = MemoryBookStore::new();
        let input = BookInput {
            title: "Kept".to_string(),
            category: "Dropped".to_string(),
            discount: 30,
            ..BookInput::default()
        };
        let stamp = store.create(&input).await.unwrap();
        let stored = store.get(stamp.id).await.unwrap();
        assert_eq!(stored.title, "Kept");
        assert_eq!(stored.category, "");
        assert_eq!(stored.discount, 0);
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_refreshes_updated_at() {
        let store = MemoryBookStore::with_books(vec![book(1, "old")]);
        let before = store.get(1).await.unwrap();
        let input = BookInput {
            title: "new".to_string(),
            ..BookInput::default()
        };
        let stamp = store.update(1, &input).await.unwrap();
        assert_eq!(stamp.created_at, before.created_at);
        assert!(stamp.updated_at > before.updated_at);
        assert_eq!(store.get(1).await.unwrap().title, "new");

        assert!(matches!(
            store.update(99, &input).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let store = MemoryBookStore::with_books(vec![book(1, "gone")]);
        store.delete(1).await.unwrap();
        assert!(matches!(store.delete(1).await, Err(StoreError::NotFound)));
        assert!(matches!(store.get(1).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn categories_are_sorted_distinct_and_non_empty() {
        let mut a = book(1, "a");
        a.category = "Fantasy".to_string();
        let mut b = book(2, "b");
        b.category = "Biography".to_string();
        let mut c = book(3, "c");
        c.category = "Fantasy".to_string();
        let store = MemoryBookStore::with_books(vec![a, b, c, book(4, "d")]);

        assert_eq!(
            store.categories().await.unwrap(),
            vec!["Biography".to_string(), "Fantasy".to_string()]
        );
    }

    #[tokio::test]
    async fn search_matches_any_text_field_ignoring_case() {
        let mut by_author = book(2, "Untitled");
        by_author.author = "Ursula K. Le Guin".to_string();
        let mut by_description = book(3, "Other");
        by_description.description = "A GUIDE to everything".to_string();
        let store = MemoryBookStore::with_books(vec![
            book(1, "The Guinness Book"),
            by_author,
            by_description,
            book(4, "Unrelated"),
        ]);

        let ids: Vec<BookId> = store
            .search("gui")
            .await
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(store.search("zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_arrivals_use_flag_or_recent_creation() {
        let mut flagged = book(1, "flagged");
        flagged.is_new = true;
        let mut recent = book(2, "recent");
        recent.created_at = Utc::now() - Duration::days(3);
        let store = MemoryBookStore::with_books(vec![flagged, recent, book(3, "old")]);

        let ids: Vec<BookId> = store
            .new_arrivals()
            .await
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
