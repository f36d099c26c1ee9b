//! Contact Service
//!
//! Orchestrates contact creation (persist, then notify) and filtered listing
//! (compile, stream, filter, collect).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::TryStreamExt;

use crate::domain::{Contact, ContactCreatedEvent, NewContact};
use crate::error::{AppError, AppResult};
use crate::filter::{exclude_matching, PatternCompiler};
use crate::notifier::EventNotifier;
use crate::store::ContactStore;

/// Default bound on a single listing
pub const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_secs(30);

/// Contact use cases
pub struct ContactService {
    store: Arc<dyn ContactStore>,
    compiler: PatternCompiler,
    notifier: EventNotifier,
    list_timeout: Duration,
}

impl ContactService {
    pub fn new(
        store: Arc<dyn ContactStore>,
        compiler: PatternCompiler,
        notifier: EventNotifier,
    ) -> Self {
        Self {
            store,
            compiler,
            notifier,
            list_timeout: DEFAULT_LIST_TIMEOUT,
        }
    }

    /// Override the listing timeout
    pub fn with_list_timeout(mut self, list_timeout: Duration) -> Self {
        self.list_timeout = list_timeout;
        self
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Persist a contact and queue its creation event.
    ///
    /// The write is final once the store returns: the event is queued without
    /// waiting for delivery, and a notifier failure never fails the call.
    pub async fn create_contact(&self, contact: NewContact) -> AppResult<Contact> {
        let created = self.store.insert(contact).await?;
        tracing::info!(contact_id = created.id, "Contact persisted");

        let event = ContactCreatedEvent::for_contact(&created, Utc::now());
        self.notifier.publish(event).await;

        Ok(created)
    }

    // =========================================================================
    // List
    // =========================================================================

    /// Every contact whose name does not match `pattern`, in id order.
    ///
    /// The pattern is compiled before the store is touched. Records are
    /// filtered as they arrive; only survivors are kept. If the listing
    /// exceeds the timeout the stream is dropped, releasing its cursor, and
    /// the partial result is discarded.
    pub async fn list_contacts_excluding(&self, pattern: &str) -> AppResult<Vec<Contact>> {
        let matcher = self.compiler.compile(pattern)?;

        let listing = async {
            let stream = self.store.stream_all().await?;
            let kept: Vec<Contact> = exclude_matching(&matcher, stream).try_collect().await?;
            Ok::<_, AppError>(kept)
        };

        let kept = tokio::time::timeout(self.list_timeout, listing)
            .await
            .map_err(|_| AppError::ListTimeout(self.list_timeout))??;

        tracing::debug!(pattern, kept = kept.len(), "Filtered contact listing complete");
        Ok(kept)
    }

    pub fn notifier(&self) -> &EventNotifier {
        &self.notifier
    }
}
