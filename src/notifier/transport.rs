//! Event transport
//!
//! Delivers a single event to the messaging endpoint. The HTTP transport
//! speaks the REST-proxy convention: `POST {endpoint}/topics/{channel}` with
//! an unkeyed record batch.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::ContactCreatedEvent;

use super::{NotifierConfig, NotifyError};

/// Header carrying the event type when enabled
pub const EVENT_TYPE_HEADER: &str = "X-Event-Type";

/// One delivery attempt for an event
#[async_trait]
pub trait EventTransport: Send + Sync {
    async fn deliver(&self, channel: &str, event: &ContactCreatedEvent) -> Result<(), NotifyError>;
}

#[derive(Serialize)]
struct RecordBatch<'a> {
    records: [Record<'a>; 1],
}

#[derive(Serialize)]
struct Record<'a> {
    value: &'a ContactCreatedEvent,
}

/// HTTP transport to a REST messaging proxy
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoints: Vec<String>,
    include_type_header: bool,
}

impl HttpTransport {
    pub fn new(config: &NotifierConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| NotifyError::ClientSetup(e.to_string()))?;

        Ok(Self {
            client,
            endpoints: config.endpoints.clone(),
            include_type_header: config.include_type_header,
        })
    }

    fn topic_url(endpoint: &str, channel: &str) -> String {
        format!("{}/topics/{}", endpoint.trim_end_matches('/'), channel)
    }

    async fn deliver_to(
        &self,
        endpoint: &str,
        channel: &str,
        batch: &RecordBatch<'_>,
    ) -> Result<(), NotifyError> {
        let mut request = self
            .client
            .post(Self::topic_url(endpoint, channel))
            .json(batch);
        if self.include_type_header {
            request = request.header(EVENT_TYPE_HEADER, ContactCreatedEvent::EVENT_TYPE);
        }

        let response = request.send().await.map_err(|e| NotifyError::Unreachable {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected {
                endpoint: endpoint.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl EventTransport for HttpTransport {
    async fn deliver(&self, channel: &str, event: &ContactCreatedEvent) -> Result<(), NotifyError> {
        let batch = RecordBatch {
            records: [Record { value: event }],
        };

        let mut last_error = NotifyError::NoEndpoints;
        for endpoint in &self.endpoints {
            match self.deliver_to(endpoint, channel, &batch).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!(endpoint = %endpoint, error = %e, "Endpoint failed, trying next");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}
