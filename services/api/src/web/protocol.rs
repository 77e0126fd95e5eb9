//! services/api/src/web/protocol.rs
//!
//! Defines the JSON wire format between HTTP clients and the API server:
//! request payloads, query parameters, and the `{status, message?, data?}`
//! response envelopes.

use bookshelf_core::domain::{Book, BookFilter, BookInput, BookSummary};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// Requests FROM the Client
//=========================================================================================

/// The body of `POST /books` and `PUT /books/{book_id}`.
///
/// Unknown keys are ignored. Missing page counts default to zero and a missing
/// `reading` flag defaults to `false`.
#[derive(Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub read_page: u32,
    #[serde(default)]
    pub reading: bool,
}

impl From<BookPayload> for BookInput {
    fn from(payload: BookPayload) -> Self {
        BookInput {
            name: payload.name,
            year: payload.year,
            author: payload.author,
            summary: payload.summary,
            publisher: payload.publisher,
            page_count: payload.page_count,
            read_page: payload.read_page,
            reading: payload.reading,
        }
    }
}

/// Query string of `GET /books`.
#[derive(IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ListBooksQuery {
    /// Case-insensitive substring of the book name.
    pub name: Option<String>,
    /// `1` for books being read, any other value for the rest.
    pub reading: Option<String>,
    /// `1` for finished books, any other value for the rest.
    pub finished: Option<String>,
}

impl ListBooksQuery {
    /// Builds the query from raw key/value pairs. A repeated key keeps its first value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "reading" => &mut query.reading,
                "finished" => &mut query.finished,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    pub fn into_filter(self) -> BookFilter {
        BookFilter {
            name: self.name.filter(|name| !name.is_empty()),
            reading: self.reading.as_deref().map(parse_flag),
            finished: self.finished.as_deref().map(parse_flag),
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    raw == "1"
}

//=========================================================================================
// Responses FROM the Server
//=========================================================================================

/// The `status` field of every response envelope.
#[derive(Serialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    /// The request was rejected (validation, unknown id, unknown route, bad body).
    Fail,
}

/// An envelope carrying only a message.
#[derive(Serialize, ToSchema, Debug)]
pub struct MessageResponse {
    pub status: ResponseStatus,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Fail,
            message: message.into(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BookIdData {
    pub book_id: String,
}

/// Response of `POST /books`.
#[derive(Serialize, ToSchema, Debug)]
pub struct CreateBookResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub data: BookIdData,
}

/// A book as listed by `GET /books`.
#[derive(Serialize, ToSchema, Debug)]
pub struct BookSummaryView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

impl From<BookSummary> for BookSummaryView {
    fn from(summary: BookSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            publisher: summary.publisher,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct BookListData {
    pub books: Vec<BookSummaryView>,
}

/// Response of `GET /books`.
#[derive(Serialize, ToSchema, Debug)]
pub struct BookListResponse {
    pub status: ResponseStatus,
    pub data: BookListData,
}

/// The full record returned by `GET /books/{book_id}`.
#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub finished: bool,
    pub reading: bool,
    /// RFC 3339, UTC, millisecond precision.
    pub inserted_at: String,
    pub updated_at: String,
}

fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            name: book.name,
            year: book.year,
            author: book.author,
            summary: book.summary,
            publisher: book.publisher,
            page_count: book.page_count,
            read_page: book.read_page,
            finished: book.finished,
            reading: book.reading,
            inserted_at: iso_timestamp(book.inserted_at),
            updated_at: iso_timestamp(book.updated_at),
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct BookDetailData {
    pub book: BookView,
}

/// Response of `GET /books/{book_id}`.
#[derive(Serialize, ToSchema, Debug)]
pub struct BookDetailResponse {
    pub status: ResponseStatus,
    pub data: BookDetailData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_payload_reads_camel_case_and_defaults() {
        let payload: BookPayload = serde_json::from_value(json!({
            "name": "A",
            "pageCount": 10,
            "readPage": 4,
            "extra": "ignored"
        }))
        .unwrap();
        assert_eq!(payload.name.as_deref(), Some("A"));
        assert_eq!(payload.page_count, 10);
        assert_eq!(payload.read_page, 4);
        assert!(!payload.reading);
        assert_eq!(payload.year, None);
    }

    #[test]
    fn test_payload_rejects_negative_pages() {
        let result = serde_json::from_value::<BookPayload>(json!({
            "name": "A",
            "pageCount": -1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_query_flags_are_one_or_anything_else() {
        let filter = ListBooksQuery {
            name: Some(String::new()),
            reading: Some("1".to_string()),
            finished: Some("0".to_string()),
        }
        .into_filter();
        assert_eq!(filter.name, None);
        assert_eq!(filter.reading, Some(true));
        assert_eq!(filter.finished, Some(false));

        let filter = ListBooksQuery {
            finished: Some("yes".to_string()),
            ..Default::default()
        }
        .into_filter();
        assert_eq!(filter.reading, None);
        assert_eq!(filter.finished, Some(false));
    }

    #[test]
    fn test_repeated_query_keys_keep_first_value() {
        let pairs = [
            ("name", "a"),
            ("reading", "1"),
            ("name", "b"),
            ("reading", "0"),
            ("page", "2"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()));

        let query = ListBooksQuery::from_pairs(pairs);
        assert_eq!(query.name.as_deref(), Some("a"));
        assert_eq!(query.reading.as_deref(), Some("1"));
        assert_eq!(query.finished, None);
    }

    #[test]
    fn test_book_view_matches_wire_format() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let book = Book {
            id: "abc".to_string(),
            name: "A".to_string(),
            year: Some(2020),
            author: None,
            summary: None,
            publisher: Some("P".to_string()),
            page_count: 10,
            read_page: 10,
            reading: false,
            finished: true,
            inserted_at: at,
            updated_at: at,
        };

        let value = serde_json::to_value(BookView::from(book)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "abc",
                "name": "A",
                "year": 2020,
                "publisher": "P",
                "pageCount": 10,
                "readPage": 10,
                "finished": true,
                "reading": false,
                "insertedAt": "2024-05-01T12:30:00.000Z",
                "updatedAt": "2024-05-01T12:30:00.000Z"
            })
        );
    }

    #[test]
    fn test_envelopes_serialize_status_lowercase() {
        let value = serde_json::to_value(CreateBookResponse {
            status: ResponseStatus::Success,
            message: "ok".to_string(),
            data: BookIdData {
                book_id: "abc".to_string(),
            },
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"status": "success", "message": "ok", "data": {"bookId": "abc"}})
        );

        let value = serde_json::to_value(MessageResponse::fail("nope")).unwrap();
        assert_eq!(value, json!({"status": "fail", "message": "nope"}));
    }
}
