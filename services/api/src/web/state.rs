//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::InMemoryBookStore;
use crate::config::Config;
use bookshelf_core::ports::BookRepository;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub books: Arc<dyn BookRepository>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the state around a fresh, empty process-local store.
    pub fn in_memory(config: Arc<Config>) -> Self {
        Self {
            books: Arc::new(InMemoryBookStore::new()),
            config,
        }
    }
}
