//! Error types for the API client.
//!
//! [`RequestError`] is returned by every request method and carries enough
//! detail for the caller to decide what to do. [`ErrorKind`] collapses it
//! into a coarse category. [`ConfigError`] covers client construction.

use reqwest::StatusCode;
use thiserror::Error;

/// Coarse classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection refused, DNS failure, reset, and other transport errors.
    Network,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The server answered with a non-2xx status.
    Status,
    /// The response body was not the expected JSON shape.
    Decode,
    /// The request could not be built, or the response failed validation.
    Invalid,
}

/// Error produced by a single request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The path could not be joined onto the base URL.
    #[error("invalid request url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The request body could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The response body could not be decoded into the requested type.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The decoded response was rejected by a validator.
    #[error("response failed validation: {0}")]
    Validation(String),
}

impl RequestError {
    /// Classifies a transport failure as a timeout or a network error.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestError::Timeout(err)
        } else {
            RequestError::Network(err)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::Network(_) => ErrorKind::Network,
            RequestError::Timeout(_) => ErrorKind::Timeout,
            RequestError::Status { .. } => ErrorKind::Status,
            RequestError::Decode(_) => ErrorKind::Decode,
            RequestError::InvalidUrl { .. }
            | RequestError::Encode(_)
            | RequestError::Validation(_) => ErrorKind::Invalid,
        }
    }

    /// The HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            RequestError::Network(e) | RequestError::Timeout(e) => e.status(),
            _ => None,
        }
    }
}

/// Error produced while building an [`ApiClient`](crate::client::ApiClient).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no base url configured")]
    MissingBaseUrl,

    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The access token cannot be carried in an HTTP header.
    #[error("access token is not a valid header value")]
    InvalidToken,

    /// The underlying reqwest client could not be built.
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_kind_and_status() {
        let err = RequestError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Status);
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.to_string(), "server returned 500 Internal Server Error: boom");
    }

    #[test]
    fn test_validation_is_invalid_kind() {
        let err = RequestError::Validation("missing id".to_string());
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_decode_error_kind() {
        let source = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err = RequestError::Decode(source);
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
