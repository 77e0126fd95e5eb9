//! services/api/src/web/router.rs
//!
//! Assembles the HTTP router for the bookshelf API.

use crate::web::rest::{
    create_book_handler, delete_book_handler, get_book_handler, list_books_handler,
    route_not_found_handler, update_book_handler,
};
use crate::web::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header::{ACCEPT, CONTENT_TYPE}, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the `/books` routes plus the route-not-found fallback.
///
/// A known path hit with an unsupported method is answered by the same fallback.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = match &state.config.cors_allowed_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.clone())
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, ACCEPT]),
        None => CorsLayer::permissive(),
    };

    Router::new()
        .route(
            "/books",
            post(create_book_handler)
                .get(list_books_handler)
                .fallback(route_not_found_handler),
        )
        .route(
            "/books/{book_id}",
            get(get_book_handler)
                .put(update_book_handler)
                .delete(delete_book_handler)
                .fallback(route_not_found_handler),
        )
        .fallback(route_not_found_handler)
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
