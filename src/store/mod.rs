//! Contact Store module
//!
//! Persistence layer for contacts.
//! Handles inserting contacts and streaming them back from PostgreSQL or memory.

mod error;
mod memory;
mod postgres;
mod repository;

pub use error::StorageError;
pub use memory::InMemoryContactStore;
pub use postgres::PgContactStore;
pub use repository::{ContactStore, ContactStream};
