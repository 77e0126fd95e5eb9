//! services/api/src/lib.rs
//!
//! The bookshelf HTTP service: configuration, the in-memory store adapter and the
//! axum web layer. The binaries in `src/bin` are thin wrappers around this library.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
