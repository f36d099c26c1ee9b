//! Domain module
//!
//! Core domain types.

pub mod contact;
pub mod context;
pub mod error;
pub mod events;

pub use contact::{Contact, NewContact, BLANK_NAME_MESSAGE};
pub use context::OperationContext;
pub use error::ValidationError;
pub use events::ContactCreatedEvent;
