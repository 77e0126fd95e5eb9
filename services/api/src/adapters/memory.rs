//! services/api/src/adapters/memory.rs
//!
//! This module contains the in-memory store adapter, the concrete implementation
//! of the `BookRepository` port from the `core` crate. Books live for the lifetime
//! of the process and are lost on restart.

use std::sync::Arc;

use async_trait::async_trait;
use bookshelf_core::domain::{Book, BookFilter, BookId, BookInput, BookSummary};
use bookshelf_core::ports::{BookRepository, PortError, PortResult};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A process-local book store that implements the `BookRepository` port.
///
/// Books are kept in insertion order. Every write holds the write lock for its whole
/// read-modify-write step, so concurrent requests cannot lose updates or race on ids.
/// Clones share the same underlying shelf.
#[derive(Clone, Default)]
pub struct InMemoryBookStore {
    books: Arc<RwLock<Vec<Book>>>,
}

impl InMemoryBookStore {
    /// Creates a new, empty `InMemoryBookStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of books currently stored.
    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

/// Draws a fresh id that is not already taken on `shelf`.
fn generate_id(shelf: &[Book]) -> BookId {
    loop {
        let id = Uuid::new_v4().simple().to_string();
        if !shelf.iter().any(|book| book.id == id) {
            return id;
        }
    }
}

fn not_found(id: &str) -> PortError {
    PortError::NotFound(format!("Book {} not found", id))
}

//=========================================================================================
// `BookRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl BookRepository for InMemoryBookStore {
    async fn create_book(&self, input: BookInput) -> PortResult<BookId> {
        let valid = input.validate()?;

        let mut shelf = self.books.write().await;
        let id = generate_id(&shelf);
        shelf.push(Book::new(id.clone(), valid, Utc::now()));

        debug!(book_id = %id, total = shelf.len(), "Book created");
        Ok(id)
    }

    async fn list_books(&self, filter: &BookFilter) -> PortResult<Vec<BookSummary>> {
        let shelf = self.books.read().await;
        let books = shelf
            .iter()
            .filter(|book| filter.matches(book))
            .map(Book::summary)
            .collect();
        Ok(books)
    }

    async fn get_book(&self, id: &str) -> PortResult<Book> {
        let shelf = self.books.read().await;
        shelf
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn update_book(&self, id: &str, input: BookInput) -> PortResult<()> {
        let valid = input.validate()?;

        let mut shelf = self.books.write().await;
        let book = shelf
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or_else(|| not_found(id))?;
        book.replace(valid, Utc::now());

        debug!(book_id = %id, "Book updated");
        Ok(())
    }

    async fn delete_book(&self, id: &str) -> PortResult<()> {
        let mut shelf = self.books.write().await;
        let index = shelf
            .iter()
            .position(|book| book.id == id)
            .ok_or_else(|| not_found(id))?;
        shelf.remove(index);

        debug!(book_id = %id, total = shelf.len(), "Book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::domain::ValidationError;

    fn input(name: &str, page_count: u32, read_page: u32) -> BookInput {
        BookInput {
            name: Some(name.to_string()),
            page_count,
            read_page,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_full_record() {
        let store = InMemoryBookStore::new();
        let id = store.create_book(input("A", 10, 10)).await.unwrap();

        let book = store.get_book(&id).await.unwrap();
        assert_eq!(book.id, id);
        assert_eq!(book.name, "A");
        assert!(book.finished);
        assert_eq!(book.inserted_at, book.updated_at);
    }

    #[tokio::test]
    async fn test_create_generates_distinct_ids() {
        let store = InMemoryBookStore::new();
        let a = store.create_book(input("A", 1, 0)).await.unwrap();
        let b = store.create_book(input("A", 1, 0)).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_invalid_create_leaves_store_unchanged() {
        let store = InMemoryBookStore::new();

        let err = store.create_book(input("A", 5, 10)).await.unwrap_err();
        assert!(matches!(
            err,
            PortError::Validation(ValidationError::ReadPageExceedsPageCount)
        ));

        let nameless = BookInput {
            name: None,
            ..input("", 10, 5)
        };
        let err = store.create_book(nameless).await.unwrap_err();
        assert!(matches!(err, PortError::Validation(ValidationError::MissingName)));

        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order_and_filters() {
        let store = InMemoryBookStore::new();
        let first = store.create_book(input("Dicoding Rust", 10, 10)).await.unwrap();
        let second = store
            .create_book(BookInput {
                reading: true,
                publisher: Some("Press".to_string()),
                ..input("Other", 10, 3)
            })
            .await
            .unwrap();

        let all = store.list_books(&BookFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec![first.as_str(), second.as_str()]);
        assert_eq!(all[1].publisher.as_deref(), Some("Press"));

        let by_name = store
            .list_books(&BookFilter {
                name: Some("DICODING".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, first);

        let reading = store
            .list_books(&BookFilter {
                reading: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(reading.len(), 1);
        assert_eq!(reading[0].id, second);

        let finished = store
            .list_books(&BookFilter {
                finished: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].id, first);

        let none = store
            .list_books(&BookFilter {
                name: Some("missing".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_advances_timestamp() {
        let store = InMemoryBookStore::new();
        let id = store.create_book(input("A", 10, 5)).await.unwrap();
        let before = store.get_book(&id).await.unwrap();

        store
            .update_book(
                &id,
                BookInput {
                    author: Some("Someone".to_string()),
                    ..input("B", 10, 10)
                },
            )
            .await
            .unwrap();

        let after = store.get_book(&id).await.unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.inserted_at, before.inserted_at);
        assert_eq!(after.name, "B");
        assert_eq!(after.author.as_deref(), Some("Someone"));
        assert!(after.finished);
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_update_validation_wins_over_unknown_id() {
        let store = InMemoryBookStore::new();
        let err = store
            .update_book("nope", input("A", 5, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));

        let err = store.update_book("nope", input("A", 10, 5)).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_prior_state() {
        let store = InMemoryBookStore::new();
        let id = store.create_book(input("A", 10, 5)).await.unwrap();
        let before = store.get_book(&id).await.unwrap();

        assert!(store.update_book(&id, input("B", 5, 10)).await.is_err());
        assert_eq!(store.get_book(&id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_is_not_repeatable() {
        let store = InMemoryBookStore::new();
        let keep = store.create_book(input("Keep", 1, 0)).await.unwrap();
        let id = store.create_book(input("A", 1, 0)).await.unwrap();

        store.delete_book(&id).await.unwrap();
        assert!(matches!(
            store.delete_book(&id).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(store.get_book(&id).await, Err(PortError::NotFound(_))));
        assert_eq!(store.len().await, 1);
        assert!(store.get_book(&keep).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_unknown_leaves_size_unchanged() {
        let store = InMemoryBookStore::new();
        store.create_book(input("A", 1, 0)).await.unwrap();
        assert!(store.delete_book("unknown").await.is_err());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_all_kept() {
        let store = InMemoryBookStore::new();
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create_book(input(&format!("B{i}"), 5, 1)).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 32);
        assert_eq!(store.len().await, 32);
    }
}
