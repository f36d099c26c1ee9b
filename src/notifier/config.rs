//! Notifier configuration

use std::time::Duration;

/// Settings for the creation event notifier.
///
/// Built by [`crate::Config::from_env`] and handed to
/// [`super::EventNotifier::spawn`] and [`super::HttpTransport::new`].
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Base URLs of the messaging endpoints, tried in order
    pub endpoints: Vec<String>,
    /// Logical channel (topic) events are published to
    pub channel: String,
    /// Attach an event type header to each delivery
    pub include_type_header: bool,
    /// Maximum number of events waiting for delivery
    pub queue_capacity: usize,
    /// Longest time `publish` waits for queue space before dropping the event
    pub enqueue_timeout: Duration,
    /// Delivery attempts per event, at least 1
    pub max_attempts: u32,
    /// Base delay between attempts; attempt `n` waits `n * retry_backoff`
    pub retry_backoff: Duration,
    /// Timeout for a single delivery request
    pub request_timeout: Duration,
}

impl NotifierConfig {
    /// Config for the given endpoints and channel with default tuning
    pub fn new(endpoints: Vec<String>, channel: impl Into<String>) -> Self {
        Self {
            endpoints,
            channel: channel.into(),
            include_type_header: false,
            queue_capacity: 1024,
            enqueue_timeout: Duration::from_millis(50),
            max_attempts: 3,
            retry_backoff: Duration::from_millis(100),
            request_timeout: Duration::from_secs(5),
        }
    }
}
