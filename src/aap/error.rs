//! Error taxonomy for AAP API calls.

use thiserror::Error;

/// Errors produced by [`AapClient`](super::AapClient) operations.
///
/// Only [`Connection`](AapError::Connection) and retryable
/// [`Remote`](AapError::Remote) statuses (429 and 5xx) are transient;
/// everything else propagates immediately.
#[derive(Debug, Clone, Error)]
pub enum AapError {
    /// A request argument was missing or malformed. Raised before any HTTP
    /// call is issued.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The controller rejected our credentials (HTTP 401/403).
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The controller does not know the requested id (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The controller could not be reached (DNS, TLS, refused, timeout).
    #[error("connection failed: {0}")]
    Connection(String),

    /// The controller answered with an unexpected status.
    #[error("AAP request failed with HTTP {status}: {detail}")]
    Remote { status: u16, detail: String },
}

impl AapError {
    /// Stable machine-readable kind, used in structured tool errors.
    pub fn kind(&self) -> &'static str {
        match self {
            AapError::Validation(_) => "validation",
            AapError::Auth(_) => "auth",
            AapError::NotFound(_) => "not_found",
            AapError::Connection(_) => "connection",
            AapError::Remote { .. } => "remote",
        }
    }

    /// Whether the retry policy may re-attempt the request.
    pub fn is_retryable(&self) -> bool {
        match self {
            AapError::Connection(_) => true,
            AapError::Remote { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Classify an HTTP status into an error, given a response body excerpt.
    pub fn from_status(status: u16, detail: String) -> Self {
        match status {
            401 | 403 => AapError::Auth(format!("token rejected (HTTP {})", status)),
            404 => AapError::NotFound(detail),
            _ => AapError::Remote { status, detail },
        }
    }
}

impl From<reqwest::Error> for AapError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AapError::Connection(format!("request timed out: {}", err))
        } else if err.is_connect() || err.is_request() {
            AapError::Connection(err.to_string())
        } else if err.is_decode() {
            AapError::Remote {
                status: err
                    .status()
                    .map(|s| s.as_u16())
                    .unwrap_or(502),
                detail: format!("unparseable response: {}", err),
            }
        } else {
            AapError::Connection(err.to_string())
        }
    }
}
