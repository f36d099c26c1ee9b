//! Domain Events
//!
//! Notifications emitted after a state change has been committed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Contact;

/// Emitted once a contact has been persisted.
///
/// Only constructible from a [`Contact`], so an event can never describe a
/// record the store has not assigned an id to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCreatedEvent {
    pub contact_id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl ContactCreatedEvent {
    /// Event type name, used for the optional type header on deliveries
    pub const EVENT_TYPE: &'static str = "ContactCreatedEvent";

    /// Build the event for a freshly persisted contact
    pub fn for_contact(contact: &Contact, created_at: DateTime<Utc>) -> Self {
        Self {
            contact_id: contact.id,
            name: contact.name.clone(),
            created_at,
        }
    }
}
