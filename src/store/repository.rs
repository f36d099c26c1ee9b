//! Contact Store Repository
//!
//! The persistence seam: single inserts and a lazily streamed full read.

use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::stream::{BoxStream, Stream};

use crate::domain::{Contact, NewContact};

use super::StorageError;

/// Persistence abstraction for contacts.
///
/// Implementations own identifier assignment: ids are unique, increase
/// monotonically, and are never reused.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Persist a draft and return it with its assigned id
    async fn insert(&self, contact: NewContact) -> Result<Contact, StorageError>;

    /// Open a single-pass stream over every contact, ordered by id.
    ///
    /// The returned [`ContactStream`] holds whatever resource backs the read
    /// (a pooled connection for Postgres). It is released when the stream is
    /// exhausted or dropped, whichever comes first.
    async fn stream_all(&self) -> Result<ContactStream, StorageError>;
}

/// Handle over an open contact cursor.
///
/// Rows are produced on demand. Dropping the handle releases the cursor and
/// its connection, including when the consumer stops early or is cancelled.
pub struct ContactStream {
    inner: BoxStream<'static, Result<Contact, StorageError>>,
}

impl ContactStream {
    pub fn new(inner: BoxStream<'static, Result<Contact, StorageError>>) -> Self {
        Self { inner }
    }
}

impl Stream for ContactStream {
    type Item = Result<Contact, StorageError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl std::fmt::Debug for ContactStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactStream").finish_non_exhaustive()
    }
}
