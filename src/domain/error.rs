//! Domain Errors
//!
//! Input validation failures detected at the boundary.

/// A required input was missing or blank
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Name of the offending input
    pub field: &'static str,
    /// Human readable message, returned to the caller verbatim
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_is_message() {
        let err = ValidationError::new("nameFilter", "must not be empty");
        assert_eq!(err.to_string(), "must not be empty");
        assert_eq!(err.field, "nameFilter");
    }
}
