use thiserror::Error;

/// Failures while looking up or constructing a provided service
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Service not found: {service_type}")]
    ServiceNotFound { service_type: String },

    #[error("Service construction failed for '{service_type}': {message}")]
    ServiceConstructionFailed {
        service_type: String,
        message: String,
    },
}

impl CoreError {
    /// Create a new service not found error
    pub fn service_not_found(service_type: impl Into<String>) -> Self {
        Self::ServiceNotFound {
            service_type: service_type.into(),
        }
    }

    /// Create a new service construction error
    pub fn service_construction(
        service_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ServiceConstructionFailed {
            service_type: service_type.into(),
            message: message.into(),
        }
    }
}
