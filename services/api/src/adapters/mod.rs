pub mod memory;

pub use memory::InMemoryBookStore;
