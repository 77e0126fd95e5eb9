//! crates/bookshelf_core/src/ports.rs
//!
//! Defines the service contract (trait) for the bookshelf's core logic.
//! The trait forms the boundary of the hexagonal architecture, allowing the core
//! to stay independent of how and where books are actually kept.

use async_trait::async_trait;

use crate::domain::{Book, BookFilter, BookId, BookInput, BookSummary, ValidationError};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Item not found: {0}")]
    NotFound(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The bookshelf store. Each operation is all-or-nothing: a failed call leaves the
/// store exactly as it was.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Validates `input`, stores a new book and returns its generated id.
    async fn create_book(&self, input: BookInput) -> PortResult<BookId>;

    /// Returns the projections of all books matching `filter`, in insertion order.
    async fn list_books(&self, filter: &BookFilter) -> PortResult<Vec<BookSummary>>;

    async fn get_book(&self, id: &str) -> PortResult<Book>;

    /// Replaces a book's fields. Validation failures take precedence over an unknown id.
    async fn update_book(&self, id: &str, input: BookInput) -> PortResult<()>;

    async fn delete_book(&self, id: &str) -> PortResult<()>;
}
