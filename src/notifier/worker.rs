//! Event notifier
//!
//! Creation events are queued on a bounded channel and delivered by a single
//! background task. Callers only ever wait for queue space, never for the
//! messaging endpoint, and a failed delivery is logged and counted but never
//! reported back.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::ContactCreatedEvent;

use super::{EventTransport, NotifierConfig};

/// Delivery counters for the notifier
#[derive(Debug, Default)]
pub struct NotifierStats {
    enqueued: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time copy of [`NotifierStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Events accepted onto the queue
    pub enqueued: u64,
    /// Events delivered to the endpoint
    pub delivered: u64,
    /// Events given up on after all attempts
    pub failed: u64,
    /// Events never queued (queue full or worker gone)
    pub dropped: u64,
}

impl NotifierStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Best-effort publisher of creation events.
///
/// Cheap to clone; all clones feed the same worker. The worker stops once
/// every clone has been dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct EventNotifier {
    tx: mpsc::Sender<ContactCreatedEvent>,
    enqueue_timeout: Duration,
    stats: Arc<NotifierStats>,
}

impl EventNotifier {
    /// Start the delivery worker.
    ///
    /// Returns the notifier and the worker handle; await the handle after
    /// dropping every notifier clone to drain pending events on shutdown.
    pub fn spawn(
        config: &NotifierConfig,
        transport: Arc<dyn EventTransport>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let stats = Arc::new(NotifierStats::default());

        let worker = DeliveryWorker {
            transport,
            channel: config.channel.clone(),
            max_attempts: config.max_attempts.max(1),
            retry_backoff: config.retry_backoff,
            stats: Arc::clone(&stats),
        };
        let handle = tokio::spawn(worker.run(rx));

        let notifier = Self {
            tx,
            enqueue_timeout: config.enqueue_timeout,
            stats,
        };

        (notifier, handle)
    }

    /// Queue an event for delivery.
    ///
    /// Waits at most the configured enqueue timeout for queue space. Events
    /// that cannot be queued are dropped with a warning.
    pub async fn publish(&self, event: ContactCreatedEvent) {
        let contact_id = event.contact_id;

        match tokio::time::timeout(self.enqueue_timeout, self.tx.send(event)).await {
            Ok(Ok(())) => {
                self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(contact_id, "Creation event queued");
            }
            Ok(Err(_)) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(contact_id, "Notifier worker stopped, creation event dropped");
            }
            Err(_) => {
                self.stats.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    contact_id,
                    timeout_ms = self.enqueue_timeout.as_millis() as u64,
                    "Notifier queue full, creation event dropped"
                );
            }
        }
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Shared counters, readable after the notifier itself is gone
    pub fn stats_handle(&self) -> Arc<NotifierStats> {
        Arc::clone(&self.stats)
    }
}

struct DeliveryWorker {
    transport: Arc<dyn EventTransport>,
    channel: String,
    max_attempts: u32,
    retry_backoff: Duration,
    stats: Arc<NotifierStats>,
}

impl DeliveryWorker {
    async fn run(self, mut rx: mpsc::Receiver<ContactCreatedEvent>) {
        tracing::info!(channel = %self.channel, "Event notifier started");

        while let Some(event) = rx.recv().await {
            self.deliver(&event).await;
        }

        tracing::info!(channel = %self.channel, "Event notifier stopped");
    }

    async fn deliver(&self, event: &ContactCreatedEvent) {
        for attempt in 1..=self.max_attempts {
            match self.transport.deliver(&self.channel, event).await {
                Ok(()) => {
                    self.stats.delivered.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(
                        contact_id = event.contact_id,
                        channel = %self.channel,
                        attempt,
                        "Creation event delivered"
                    );
                    return;
                }
                Err(e) if attempt < self.max_attempts && e.is_retryable() => {
                    tracing::warn!(
                        contact_id = event.contact_id,
                        error = %e,
                        "Creation event delivery failed, retrying (attempt {}/{})",
                        attempt,
                        self.max_attempts
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                Err(e) => {
                    self.stats.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::error!(
                        contact_id = event.contact_id,
                        channel = %self.channel,
                        attempts = attempt,
                        error = %e,
                        "Creation event could not be delivered"
                    );
                    return;
                }
            }
        }
    }
}
