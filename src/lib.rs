//! contacts_service Library
//!
//! Re-exports modules for integration testing and the binaries.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod filter;
pub mod notifier;
pub mod service;
pub mod store;

mod error;

pub use config::{Config, ConfigError, StorageBackend};
pub use domain::{Contact, ContactCreatedEvent, NewContact, OperationContext, ValidationError};
pub use error::{ApiError, AppError, AppResult, ErrorResponse, MISSING_FILTER_MESSAGE};
pub use service::ContactService;
