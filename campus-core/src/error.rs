//! Error types for Campus client operations.
//!
//! `ApiError` is deliberately `Clone + PartialEq + Eq` with string payloads:
//! a single in-flight fetch result is handed to every coalesced caller, so
//! the error must be cheap to duplicate. Transport-library errors are
//! converted into these variants at the transport boundary and never escape
//! in their original form.

use thiserror::Error;

/// Result alias used throughout the Campus workspace.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the transport and fetch layers.
///
/// A cache miss is never an error; probes return `Option`/`bool` instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    ///
    /// `code` carries the backend's machine-readable error code when the
    /// response body could be decoded as the standard `{code, message}`
    /// error envelope.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The request never produced a usable response (connect failure,
    /// timeout, interrupted body).
    #[error("Network error: {message}")]
    Network { message: String },

    /// A payload could not be serialized or deserialized.
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The caller handed the client something unusable (empty endpoint,
    /// unsupported method for the operation).
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl ApiError {
    /// Build an `Http` error without a backend error code.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            code: None,
            message: message.into(),
        }
    }

    /// Build a `Network` error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Build a `Decode` error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Build an `InvalidRequest` error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// The HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = ApiError::http(404, "student not found");
        assert_eq!(err.to_string(), "HTTP 404: student not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_clone_preserves_identity() {
        let err = ApiError::Http {
            status: 422,
            code: Some("VALIDATION_FAILED".to_string()),
            message: "missing name".to_string(),
        };
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn test_transience() {
        assert!(ApiError::network("connection refused").is_transient());
        assert!(ApiError::http(503, "unavailable").is_transient());
        assert!(ApiError::http(429, "slow down").is_transient());
        assert!(!ApiError::http(404, "missing").is_transient());
        assert!(!ApiError::decode("bad json").is_transient());
    }

    #[test]
    fn test_non_http_has_no_status() {
        assert_eq!(ApiError::decode("oops").status(), None);
    }
}
