pub mod domain;
pub mod ports;

pub use domain::{Book, BookFilter, BookId, BookInput, BookSummary, ValidBookInput, ValidationError};
pub use ports::{BookRepository, PortError, PortResult};
