//! DocRelay database layer
//!
//! Persistence for document records: the `DocumentStore` trait, its Postgres repository and
//! an in-memory store used by tests and local development.

pub mod db;

pub use db::{DocumentRepository, DocumentStore, InMemoryDocumentStore, NewDocument};
