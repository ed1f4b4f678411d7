//! Document record stores
//!
//! `document` holds the store contract and the Postgres repository; `memory` holds the
//! lock-guarded in-memory implementation.

pub mod document;
pub mod memory;

pub use document::{DocumentRepository, DocumentStore, NewDocument};
pub use memory::InMemoryDocumentStore;
