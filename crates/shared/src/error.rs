//! Error taxonomy shared by the metadata clients.
//!
//! Every failure reaches the immediate caller. Nothing is retried or
//! swallowed into an empty result.

use thiserror::Error;

/// Error type for all client operations
#[derive(Error, Debug)]
pub enum ApiError {
    /// Upstream answered with a non-success status
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// Upstream reported the requested resource does not exist (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body is not valid structured data, or lacks a required field
    #[error("Failed to deserialize response (status {status}): {body}")]
    SerializationFailed { body: String, status: u16 },

    /// Transport succeeded but the remote rejected the query
    #[error("Server reported an error (status {status}): {body}")]
    ServerError { body: String, status: u16 },

    /// Caller supplied an argument the client refuses to send
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Network, timeout or client construction failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// HTTP status attached to the error, if upstream produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. }
            | ApiError::SerializationFailed { status, .. }
            | ApiError::ServerError { status, .. } => Some(*status),
            ApiError::NotFound(_) => Some(404),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidArgument(_) => None,
        }
    }

    /// Raw response body attached to the error, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::RequestFailed { body, .. }
            | ApiError::SerializationFailed { body, .. }
            | ApiError::ServerError { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_display() {
        let error = ApiError::RequestFailed {
            status: 400,
            body: "{\"error\":\"invalid_parameters\"}".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Request failed with status 400: {\"error\":\"invalid_parameters\"}"
        );
    }

    #[test]
    fn test_not_found_display() {
        let error = ApiError::NotFound("anime/99999999".to_string());
        assert_eq!(error.to_string(), "Not found: anime/99999999");
    }

    #[test]
    fn test_invalid_argument_display() {
        let error = ApiError::InvalidArgument("limit must be positive".to_string());
        assert_eq!(error.to_string(), "Invalid argument: limit must be positive");
    }

    #[test]
    fn test_status_accessor() {
        let error = ApiError::ServerError {
            body: "{}".to_string(),
            status: 400,
        };
        assert_eq!(error.status(), Some(400));
        assert_eq!(ApiError::NotFound("x".to_string()).status(), Some(404));
        assert_eq!(ApiError::InvalidArgument("x".to_string()).status(), None);
    }

    #[test]
    fn test_body_accessor() {
        let error = ApiError::SerializationFailed {
            body: "<html>".to_string(),
            status: 502,
        };
        assert_eq!(error.body(), Some("<html>"));
        assert_eq!(ApiError::NotFound("x".to_string()).body(), None);
    }
}
