//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the `/books` REST endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::{
    BookDetailData, BookDetailResponse, BookIdData, BookListData, BookListResponse,
    BookPayload, BookSummaryView, BookView, CreateBookResponse, ListBooksQuery,
    MessageResponse, ResponseStatus,
};
use crate::web::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use bookshelf_core::domain::{BookInput, ValidationError};
use bookshelf_core::ports::PortError;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_book_handler,
        list_books_handler,
        get_book_handler,
        update_book_handler,
        delete_book_handler,
    ),
    components(
        schemas(
            BookPayload,
            ResponseStatus,
            MessageResponse,
            BookIdData,
            CreateBookResponse,
            BookSummaryView,
            BookListData,
            BookListResponse,
            BookView,
            BookDetailData,
            BookDetailResponse,
        )
    ),
    tags(
        (name = "Bookshelf API", description = "Record keeping for a personal bookshelf.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Failure Mapping
//=========================================================================================

/// Every rejected request is answered with a status code and a message envelope.
pub type Failure = (StatusCode, Json<MessageResponse>);

/// Which endpoint failed. Selects the wording of the failure message.
#[derive(Debug, Clone, Copy)]
enum BookAction {
    Create,
    List,
    Get,
    Update,
    Delete,
}

impl BookAction {
    fn prefix(self) -> &'static str {
        match self {
            BookAction::Create => "Gagal menambahkan buku",
            BookAction::List | BookAction::Get => "Gagal menampilkan buku",
            BookAction::Update => "Gagal memperbarui buku",
            BookAction::Delete => "Buku gagal dihapus",
        }
    }

    fn reject(self, err: PortError) -> Failure {
        match err {
            PortError::Validation(ValidationError::MissingName) => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::fail(format!(
                    "{}. Mohon isi nama buku",
                    self.prefix()
                ))),
            ),
            PortError::Validation(ValidationError::ReadPageExceedsPageCount) => (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::fail(format!(
                    "{}. readPage tidak boleh lebih besar dari pageCount",
                    self.prefix()
                ))),
            ),
            PortError::NotFound(_) => {
                let message = match self {
                    BookAction::Get => "Buku tidak ditemukan".to_string(),
                    _ => format!("{}. Id tidak ditemukan", self.prefix()),
                };
                (StatusCode::NOT_FOUND, Json(MessageResponse::fail(message)))
            }
        }
    }

    /// Unwraps the `{book_id}` segment. A segment axum cannot decode (e.g. invalid
    /// UTF-8) cannot name a stored book, so it is answered as an unknown id.
    fn book_id(self, path: Result<Path<String>, PathRejection>) -> Result<String, Failure> {
        path.map(|Path(book_id)| book_id).map_err(|rejection| {
            warn!(action = ?self, "Rejected book id: {}", rejection.body_text());
            self.reject(PortError::NotFound(rejection.body_text()))
        })
    }

    /// The body could not be read as a book payload. The store is never touched.
    fn malformed(self, rejection: JsonRejection) -> Failure {
        warn!(action = ?self, "Rejected request body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse::fail(format!(
                "{}. Body request tidak valid",
                self.prefix()
            ))),
        )
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Add a book to the shelf.
#[utoipa::path(
    post,
    path = "/books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = CreateBookResponse),
        (status = 400, description = "Missing name, readPage above pageCount, or malformed body", body = MessageResponse)
    )
)]
pub async fn create_book_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<impl IntoResponse, Failure> {
    let Json(payload) = payload.map_err(|r| BookAction::Create.malformed(r))?;

    let book_id = app_state
        .books
        .create_book(payload.into())
        .await
        .map_err(|e| BookAction::Create.reject(e))?;
    info!(%book_id, "Book added");

    let response = CreateBookResponse {
        status: ResponseStatus::Success,
        message: "Buku berhasil ditambahkan".to_string(),
        data: BookIdData { book_id },
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List the books on the shelf, optionally filtered.
#[utoipa::path(
    get,
    path = "/books",
    params(ListBooksQuery),
    responses(
        (status = 200, description = "Matching books, in insertion order", body = BookListResponse)
    )
)]
pub async fn list_books_handler(
    State(app_state): State<Arc<AppState>>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, Failure> {
    // Listing never fails on its query: repeated keys keep their first value and
    // an unreadable query string lists everything.
    let pairs = pairs
        .map(|Query(pairs)| pairs)
        .unwrap_or_else(|rejection| {
            warn!("Ignoring unreadable query string: {}", rejection.body_text());
            Vec::new()
        });
    let filter = ListBooksQuery::from_pairs(pairs).into_filter();
    let books = app_state
        .books
        .list_books(&filter)
        .await
        .map_err(|e| BookAction::List.reject(e))?;

    let response = BookListResponse {
        status: ResponseStatus::Success,
        data: BookListData {
            books: books.into_iter().map(BookSummaryView::from).collect(),
        },
    };
    Ok(Json(response))
}

/// Show every field of one book.
#[utoipa::path(
    get,
    path = "/books/{book_id}",
    params(
        ("book_id" = String, Path, description = "The id returned when the book was added.")
    ),
    responses(
        (status = 200, description = "The book", body = BookDetailResponse),
        (status = 404, description = "No book with that id", body = MessageResponse)
    )
)]
pub async fn get_book_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, Failure> {
    let book_id = BookAction::Get.book_id(path)?;
    let book = app_state
        .books
        .get_book(&book_id)
        .await
        .map_err(|e| BookAction::Get.reject(e))?;

    let response = BookDetailResponse {
        status: ResponseStatus::Success,
        data: BookDetailData {
            book: BookView::from(book),
        },
    };
    Ok(Json(response))
}

/// Replace every editable field of a book.
///
/// The body is validated before the id is looked up, so an invalid body sent to an
/// unknown id is reported as a validation failure.
#[utoipa::path(
    put,
    path = "/books/{book_id}",
    request_body = BookPayload,
    params(
        ("book_id" = String, Path, description = "The id returned when the book was added.")
    ),
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "Missing name, readPage above pageCount, or malformed body", body = MessageResponse),
        (status = 404, description = "No book with that id", body = MessageResponse)
    )
)]
pub async fn update_book_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<impl IntoResponse, Failure> {
    let Json(payload) = payload.map_err(|r| BookAction::Update.malformed(r))?;
    let input = BookInput::from(payload);

    let book_id = match BookAction::Update.book_id(path) {
        Ok(book_id) => book_id,
        Err(not_found) => {
            // Validation still takes precedence over the unknown id.
            input
                .validate()
                .map_err(|e| BookAction::Update.reject(e.into()))?;
            return Err(not_found);
        }
    };

    app_state
        .books
        .update_book(&book_id, input)
        .await
        .map_err(|e| BookAction::Update.reject(e))?;
    info!(%book_id, "Book updated");

    Ok(Json(MessageResponse::success("Buku berhasil diperbarui")))
}

/// Remove a book from the shelf.
#[utoipa::path(
    delete,
    path = "/books/{book_id}",
    params(
        ("book_id" = String, Path, description = "The id returned when the book was added.")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "No book with that id", body = MessageResponse)
    )
)]
pub async fn delete_book_handler(
    State(app_state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, Failure> {
    let book_id = BookAction::Delete.book_id(path)?;
    app_state
        .books
        .delete_book(&book_id)
        .await
        .map_err(|e| BookAction::Delete.reject(e))?;
    info!(%book_id, "Book deleted");

    Ok(Json(MessageResponse::success("Buku berhasil dihapus")))
}

/// Answers any path or method the API does not serve.
pub async fn route_not_found_handler() -> Failure {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse::fail("Route tidak ditemukan")),
    )
}
