//! Contact entity
//!
//! A contact starts life as a [`NewContact`] (no identifier) and becomes a
//! [`Contact`] once the store has assigned it an id. Only stores perform that
//! transition.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Message returned when a contact name is missing or blank
pub const BLANK_NAME_MESSAGE: &str = "Contact name cannot be empty";

/// A contact that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    name: String,
}

impl NewContact {
    /// Validate a raw name and build a draft contact.
    ///
    /// Whitespace-only names are rejected; the name is otherwise kept verbatim.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::new("name", BLANK_NAME_MESSAGE));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Consume the draft, yielding the validated name
    pub fn into_name(self) -> String {
        self.name
    }
}

/// A persisted contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    pub name: String,
}

impl Contact {
    /// Build a persisted contact. Store implementations call this once the
    /// identifier has been assigned.
    pub fn persisted(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Contact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Contact [id={}, name={}]", self.id, self.name)
    }
}
