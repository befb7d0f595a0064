//! Error types for the failover system
//!
//! This module defines all error types used throughout the crate.
//!
//! Only three variants terminate a run: [`Error::NoAvailableInstance`],
//! [`Error::InvalidEndpoint`] / [`Error::Resolution`] and
//! [`Error::CreateRequest`]. Probe and delete errors are recovered where
//! they occur.

use thiserror::Error;

/// Result type alias for failover operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the failover system
#[derive(Error, Debug)]
pub enum Error {
    /// Network-level failure reaching an instance
    #[error("Probe transport error for {endpoint}: {message}")]
    ProbeTransport {
        /// Probed endpoint
        endpoint: String,
        /// Transport error message
        message: String,
    },

    /// Instance answered with a non-success status
    #[error("Probe of {endpoint} returned status {status}")]
    ProbeStatus {
        /// Probed endpoint
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// Every configured instance failed probing
    #[error("No available instances found")]
    NoAvailableInstance,

    /// Selected endpoint is not a well-formed URL with a host
    #[error("Invalid instance endpoint: {0}")]
    InvalidEndpoint(String),

    /// Host of the selected endpoint could not be resolved
    #[error("Failed to resolve IP: {0}")]
    Resolution(String),

    /// Provider failed to delete the existing record
    #[error("Failed to delete existing DNS record: {0}")]
    DeleteRequest(String),

    /// Provider failed to create the record
    #[error("Failed to create DNS record: {0}")]
    CreateRequest(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid endpoint error
    pub fn invalid_endpoint(msg: impl Into<String>) -> Self {
        Self::InvalidEndpoint(msg.into())
    }

    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a delete request error
    pub fn delete_request(msg: impl Into<String>) -> Self {
        Self::DeleteRequest(msg.into())
    }

    /// Create a create request error
    pub fn create_request(msg: impl Into<String>) -> Self {
        Self::CreateRequest(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether this error ends the run
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::ProbeTransport { .. } | Self::ProbeStatus { .. } | Self::DeleteRequest(_)
        )
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
