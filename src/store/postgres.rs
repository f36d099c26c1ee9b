//! PostgreSQL Contact Store
//!
//! Inserts go through the pool; each stream checks out its own connection and
//! keeps it for as long as the stream is alive.

use async_trait::async_trait;
use futures::StreamExt;
use sqlx::PgPool;

use crate::domain::{Contact, NewContact};

use super::{ContactStore, ContactStream, StorageError};

/// Postgres-backed contact store
#[derive(Debug, Clone)]
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    /// Create a new store with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Convert a `(id, name)` row into a contact
fn contact_from_row((id, name): (i64, String)) -> Result<Contact, StorageError> {
    let id = u64::try_from(id)
        .map_err(|_| StorageError::InvalidRow(format!("negative contact id {}", id)))?;
    Ok(Contact::persisted(id, name))
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn insert(&self, contact: NewContact) -> Result<Contact, StorageError> {
        let row: (i64, String) = sqlx::query_as(
            r#"
            INSERT INTO contacts (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(contact.into_name())
        .fetch_one(&self.pool)
        .await?;

        contact_from_row(row)
    }

    async fn stream_all(&self) -> Result<ContactStream, StorageError> {
        // Acquire eagerly so an unreachable database fails the open, not the first poll
        let mut conn = self.pool.acquire().await.map_err(|e| match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StorageError::Unavailable(e.to_string())
            }
            other => StorageError::Database(other),
        })?;

        let rows = async_stream::stream! {
            let mut rows = sqlx::query_as::<_, (i64, String)>(
                r#"
                SELECT id, name
                FROM contacts
                ORDER BY id ASC
                "#,
            )
            .fetch(&mut *conn);

            while let Some(row) = rows.next().await {
                let item = row.map_err(StorageError::from).and_then(contact_from_row);
                let failed = item.is_err();
                yield item;
                if failed {
                    break;
                }
            }
        };

        Ok(ContactStream::new(Box::pin(rows)))
    }
}
