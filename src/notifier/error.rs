//! Notifier Errors

/// Notifier failures.
///
/// Delivery errors never leave the notifier: the worker logs and counts them.
/// `ClientSetup` is only returned at startup by `HttpTransport::new`.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The endpoint could not be reached
    #[error("Endpoint {endpoint} unreachable: {message}")]
    Unreachable { endpoint: String, message: String },

    /// The endpoint answered with a non-success status
    #[error("Endpoint {endpoint} rejected event with status {status}")]
    Rejected { endpoint: String, status: u16 },

    /// No endpoint is configured
    #[error("No messaging endpoint configured")]
    NoEndpoints,

    /// The HTTP client could not be set up from the notifier settings
    #[error("Messaging client setup failed: {0}")]
    ClientSetup(String),
}

impl NotifyError {
    /// Check if another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            NotifyError::Unreachable { .. } => true,
            NotifyError::Rejected { status, .. } => *status >= 500 || *status == 429,
            NotifyError::NoEndpoints | NotifyError::ClientSetup(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_error_is_retryable() {
        let unreachable = NotifyError::Unreachable {
            endpoint: "http://broker:8082".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(unreachable.is_retryable());

        let unavailable = NotifyError::Rejected {
            endpoint: "http://broker:8082".to_string(),
            status: 503,
        };
        assert!(unavailable.is_retryable());

        let bad_request = NotifyError::Rejected {
            endpoint: "http://broker:8082".to_string(),
            status: 400,
        };
        assert!(!bad_request.is_retryable());
        assert!(!NotifyError::NoEndpoints.is_retryable());
    }

    #[test]
    fn test_client_setup_is_not_an_endpoint_failure() {
        let err = NotifyError::ClientSetup("invalid TLS backend".to_string());

        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "Messaging client setup failed: invalid TLS backend"
        );
    }
}
