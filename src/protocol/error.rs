//! Error types for client configuration

use thiserror::Error;

/// Main error type for configuring and building an HTTP client
#[derive(Debug, Error)]
pub enum ClientError {
    /// A configuration parameter was rejected (e.g. a non-positive proxy port)
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A default header could not be turned into an HTTP header
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The underlying HTTP client could not be built
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        ClientError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Check whether this is an invalid parameter error
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, ClientError::InvalidParameter { .. })
    }
}

/// Result type alias for client configuration operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = ClientError::invalid_parameter("proxyPort", "must be positive, got 0");

        assert!(err.is_invalid_parameter());
        assert_eq!(
            err.to_string(),
            "Invalid parameter `proxyPort`: must be positive, got 0"
        );
    }

    #[test]
    fn test_serialization_error_conversion() {
        let err: ClientError = serde_json::from_str::<u32>("nope").unwrap_err().into();

        assert!(matches!(err, ClientError::Serialization(_)));
        assert!(!err.is_invalid_parameter());
    }
}
