pub mod protocol;
pub mod rest;
pub mod router;
pub mod state;

// Re-export the router builder to make it easily accessible
// to the binary that will build the web server.
pub use rest::{
    create_book_handler, delete_book_handler, get_book_handler, list_books_handler,
    route_not_found_handler, update_book_handler,
};
pub use router::router;
