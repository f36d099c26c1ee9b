//! In-memory Contact Store
//!
//! Process-local store used when no database is configured and in tests.
//! Records are append-only, so a stream fixes the number of visible records
//! when it is opened and then reads them one at a time (snapshot-at-open).

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{Contact, NewContact};

use super::{ContactStore, ContactStream, StorageError};

#[derive(Debug, Default)]
struct Inner {
    records: Vec<Contact>,
    last_id: u64,
}

/// In-memory contact store
#[derive(Debug, Clone, Default)]
pub struct InMemoryContactStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given names, ids starting at 1
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        {
            let mut inner = store.inner.write();
            for name in names {
                inner.last_id += 1;
                let id = inner.last_id;
                inner.records.push(Contact::persisted(id, name));
            }
        }
        store
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.read().records.len()
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn insert(&self, contact: NewContact) -> Result<Contact, StorageError> {
        let mut inner = self.inner.write();
        inner.last_id += 1;
        let stored = Contact::persisted(inner.last_id, contact.into_name());
        inner.records.push(stored.clone());
        Ok(stored)
    }

    async fn stream_all(&self) -> Result<ContactStream, StorageError> {
        let visible = self.inner.read().records.len();
        let inner = Arc::clone(&self.inner);

        let rows = futures::stream::unfold(0usize, move |idx| {
            let inner = Arc::clone(&inner);
            async move {
                if idx >= visible {
                    return None;
                }
                let contact = inner.read().records[idx].clone();
                Some((Ok::<_, StorageError>(contact), idx + 1))
            }
        });

        Ok(ContactStream::new(Box::pin(rows)))
    }
}
