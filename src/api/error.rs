//! API Client Error Types
//!
//! Errors for network calls made against the policy analytics API.

use thiserror::Error;

/// Errors that can occur when talking to the backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection refused or host unreachable
    #[error("Backend unavailable")]
    Unavailable,

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Any other transport failure
    #[cfg(feature = "native")]
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Transport failure from a host whose fetch layer reports plain text
    #[error("Request failed: {0}")]
    Transport(String),

    /// Non-success status on an endpoint that has no error body contract
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Reading a local file for upload failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "native")]
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Unavailable
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Request(e)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error 500: boom");
        assert_eq!(ClientError::Unavailable.to_string(), "Backend unavailable");
    }

    #[test]
    fn test_json_error_becomes_decode() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("not json");
        let err: ClientError = parse.unwrap_err().into();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
