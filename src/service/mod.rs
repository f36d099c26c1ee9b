//! Service module
//!
//! Application use cases composed from the store, filter and notifier.

mod contact_service;


pub use contact_service::{ContactService, DEFAULT_LIST_TIMEOUT};
