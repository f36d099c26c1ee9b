//! API Routes
//!
//! HTTP endpoint definitions.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::domain::{Contact, NewContact, ValidationError};
use crate::error::{ApiError, AppError, MISSING_FILTER_MESSAGE};
use crate::service::ContactService;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ContactService>,
}

impl AppState {
    pub fn new(service: ContactService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ContactResponse {
    pub id: u64,
    pub name: String,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContactsQuery {
    #[serde(default)]
    pub name_filter: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactsListResponse {
    pub contacts: Vec<ContactResponse>,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new().route("/hello/contacts", get(list_contacts).post(create_contact))
}

// =========================================================================
// POST /hello/contacts
// =========================================================================

/// Create a new contact
async fn create_contact(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<CreateContactRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let path = uri.path();

    let Json(request) =
        payload.map_err(|rejection| AppError::MalformedRequest(rejection.body_text()).at(path))?;

    let contact = NewContact::new(request.name.unwrap_or_default())
        .map_err(|e| AppError::from(e).at(path))?;

    let created = state
        .service
        .create_contact(contact)
        .await
        .map_err(|e| e.at(path))?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

// =========================================================================
// GET /hello/contacts?nameFilter=
// =========================================================================

/// List contacts whose names do not match `nameFilter`
async fn list_contacts(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<ListContactsQuery>, QueryRejection>,
) -> Result<Json<ContactsListResponse>, ApiError> {
    let path = uri.path();

    let Query(query) =
        query.map_err(|rejection| AppError::MalformedRequest(rejection.body_text()).at(path))?;

    let filter = match query.name_filter {
        Some(filter) if !filter.trim().is_empty() => filter,
        _ => {
            let missing = ValidationError::new("nameFilter", MISSING_FILTER_MESSAGE);
            return Err(AppError::from(missing).at(path));
        }
    };

    let contacts = state
        .service
        .list_contacts_excluding(&filter)
        .await
        .map_err(|e| e.at(path))?;

    tracing::debug!(
        name_filter = %filter,
        returned = contacts.len(),
        "Filtered contact listing"
    );

    Ok(Json(ContactsListResponse {
        contacts: contacts.into_iter().map(ContactResponse::from).collect(),
    }))
}
