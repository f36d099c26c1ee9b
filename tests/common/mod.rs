//! Common test utilities
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{middleware, Router};
use parking_lot::Mutex;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use contacts_service::api::{self, AppState};
use contacts_service::filter::PatternCompiler;
use contacts_service::notifier::{EventNotifier, EventTransport, NotifierConfig, NotifyError};
use contacts_service::store::{ContactStore, InMemoryContactStore};
use contacts_service::{ContactCreatedEvent, ContactService};

/// Transport that records deliveries instead of calling a broker
#[derive(Default)]
pub struct RecordingTransport {
    pub fail: bool,
    pub delivered: Mutex<Vec<(String, ContactCreatedEvent)>>,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Wait until at least `count` deliveries were attempted
    pub async fn wait_for(&self, count: usize) -> Vec<(String, ContactCreatedEvent)> {
        for _ in 0..200 {
            {
                let delivered = self.delivered.lock();
                if delivered.len() >= count {
                    return delivered.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} deliveries", count);
    }
}

#[async_trait]
impl EventTransport for RecordingTransport {
    async fn deliver(&self, channel: &str, event: &ContactCreatedEvent) -> Result<(), NotifyError> {
        self.delivered.lock().push((channel.to_string(), event.clone()));
        if self.fail {
            return Err(NotifyError::Unreachable {
                endpoint: "http://broker.invalid:8082".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

pub const TEST_CHANNEL: &str = "contact_events";

/// Router wired like the server binary, minus tracing
pub struct TestApp {
    pub router: Router,
    pub transport: Arc<RecordingTransport>,
    pub notifier: EventNotifier,
}

pub fn test_app_with(store: Arc<dyn ContactStore>, transport: RecordingTransport) -> TestApp {
    let transport = Arc::new(transport);

    let mut config = NotifierConfig::new(vec!["http://broker.invalid:8082".to_string()], TEST_CHANNEL);
    config.max_attempts = 1;
    config.retry_backoff = Duration::ZERO;

    let (notifier, _worker) = EventNotifier::spawn(&config, transport.clone());
    let service = ContactService::new(store, PatternCompiler::default(), notifier.clone());

    let router = api::create_router()
        .layer(middleware::from_fn(api::middleware::logging_middleware))
        .layer(middleware::from_fn(api::middleware::correlation_middleware))
        .with_state(AppState::new(service));

    TestApp {
        router,
        transport,
        notifier,
    }
}

pub fn test_app() -> TestApp {
    test_app_with(Arc::new(InMemoryContactStore::new()), RecordingTransport::default())
}

/// Connect to the test database and empty the contacts table.
///
/// Returns `None` when `DATABASE_URL` is not set so callers can skip.
pub async fn setup_test_db() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::query(include_str!("../../migrations/0001_create_contacts.sql"))
        .execute(&pool)
        .await
        .expect("Failed to apply migration");

    sqlx::query("TRUNCATE TABLE contacts RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    Some(pool)
}
