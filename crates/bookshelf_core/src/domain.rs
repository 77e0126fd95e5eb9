//! crates/bookshelf_core/src/domain.rs
//!
//! Defines the pure, core data structures and rules for the bookshelf.
//! These structs are independent of any storage or serialization format.

use chrono::{DateTime, Duration, Utc};

/// The opaque, server-generated identifier of a book.
pub type BookId = String;

//=========================================================================================
// Validation
//=========================================================================================

/// The two ways a book write can be rejected before it touches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name required")]
    MissingName,
    #[error("readPage exceeds pageCount")]
    ReadPageExceedsPageCount,
}

//=========================================================================================
// Write Inputs
//=========================================================================================

/// Every replaceable field of a book, as submitted by a caller for create or update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookInput {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

/// A `BookInput` that has passed validation. Only obtainable via [`BookInput::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBookInput {
    name: String,
    year: Option<i32>,
    author: Option<String>,
    summary: Option<String>,
    publisher: Option<String>,
    page_count: u32,
    read_page: u32,
    reading: bool,
}

impl BookInput {
    /// Checks the name first, then the page counts.
    pub fn validate(self) -> Result<ValidBookInput, ValidationError> {
        let name = self
            .name
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::MissingName)?;

        if self.read_page > self.page_count {
            return Err(ValidationError::ReadPageExceedsPageCount);
        }

        Ok(ValidBookInput {
            name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count,
            read_page: self.read_page,
            reading: self.reading,
        })
    }
}

//=========================================================================================
// Book
//=========================================================================================

/// A single bibliographic record with reading-progress fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
    /// Always `page_count == read_page`.
    pub finished: bool,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Builds a freshly created record. Both timestamps are `now`.
    pub fn new(id: BookId, input: ValidBookInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            year: input.year,
            author: input.author,
            summary: input.summary,
            publisher: input.publisher,
            page_count: input.page_count,
            read_page: input.read_page,
            reading: input.reading,
            finished: input.page_count == input.read_page,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every field except `id` and `inserted_at`.
    pub fn replace(&mut self, input: ValidBookInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.year = input.year;
        self.author = input.author;
        self.summary = input.summary;
        self.publisher = input.publisher;
        self.page_count = input.page_count;
        self.read_page = input.read_page;
        self.reading = input.reading;
        self.finished = input.page_count == input.read_page;
        self.updated_at = advance(self.updated_at, now);
    }

    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Returns `now`, or `previous + 1ms` if the clock has not moved at least that far.
///
/// Timestamps leave the service at millisecond resolution, so an update must land
/// on a later millisecond than the one it replaces.
fn advance(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + Duration::milliseconds(1);
    if now >= floor {
        now
    } else {
        floor
    }
}

/// The listing projection of a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSummary {
    pub id: BookId,
    pub name: String,
    pub publisher: Option<String>,
}

//=========================================================================================
// Listing Filter
//=========================================================================================

/// Optional listing predicates. All present predicates must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Case-insensitive substring of the book name. Empty means "no filter".
    pub name: Option<String>,
    pub reading: Option<bool>,
    pub finished: Option<bool>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(needle) = self.name.as_deref().filter(|n| !n.is_empty()) {
            if !book.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if self.reading.is_some_and(|reading| book.reading != reading) {
            return false;
        }
        if self.finished.is_some_and(|finished| book.finished != finished) {
            return false;
        }
        true
    }
}
