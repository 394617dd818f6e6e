//! Infrastructure adapters for entity storage backends.

pub mod store;

pub use store::{file_stores, in_memory_stores, FileStore, InMemoryStore};
