//! Error types for the IntelOwl client.
//!
//! # Design
//! Every failure is one of four kinds, and each kind is a separate variant so
//! callers can branch on it: request construction, network exchange, an API
//! error reported by the server, and a response body that does not match the
//! expected shape. Components return the first error they hit unchanged.

use thiserror::Error;

/// Sub-classification of a `ClientError::Network` failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// The caller's context was cancelled before the exchange completed.
    Cancelled,
    /// The caller's context deadline passed before the exchange completed.
    DeadlineExceeded,
    /// The transport-level request timeout from `ClientOptions` fired.
    Timeout,
    /// The connection could not be established (DNS, refused, TLS handshake).
    Connect,
    /// Any other transport failure, including a broken response body.
    Other,
}

impl std::fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NetworkErrorKind::Cancelled => "cancelled",
            NetworkErrorKind::DeadlineExceeded => "deadline exceeded",
            NetworkErrorKind::Timeout => "timeout",
            NetworkErrorKind::Connect => "connect",
            NetworkErrorKind::Other => "transport",
        };
        f.write_str(name)
    }
}

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be built: malformed URL, unknown method,
    /// invalid header value or unusable client configuration.
    #[error("cannot construct request: {0}")]
    Construction(String),

    /// The HTTP exchange did not complete.
    #[error("network error ({kind}): {message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },

    /// The server answered with a non-2xx status.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Optional machine-readable error code from the error body.
        code: Option<String>,
        /// The full JSON error body, when the body was JSON.
        detail: Option<serde_json::Value>,
    },

    /// The success payload did not match the expected shape.
    #[error("cannot decode response: {0}")]
    Decode(String),
}

impl ClientError {
    pub(crate) fn network(kind: NetworkErrorKind, message: impl Into<String>) -> Self {
        ClientError::Network {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn cancelled() -> Self {
        Self::network(NetworkErrorKind::Cancelled, "context cancelled")
    }

    pub(crate) fn deadline_exceeded() -> Self {
        Self::network(NetworkErrorKind::DeadlineExceeded, "context deadline exceeded")
    }

    /// HTTP status of an API error, `None` for every other kind.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            ClientError::Network {
                kind: NetworkErrorKind::Cancelled,
                ..
            }
        )
    }

    /// Network sub-kind, `None` for every other kind.
    pub fn network_kind(&self) -> Option<NetworkErrorKind> {
        match self {
            ClientError::Network { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return ClientError::Construction(err.to_string());
        }
        let kind = if err.is_timeout() {
            NetworkErrorKind::Timeout
        } else if err.is_connect() {
            NetworkErrorKind::Connect
        } else {
            NetworkErrorKind::Other
        };
        ClientError::network(kind, err.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_status() {
        let err = ClientError::Api {
            status: 404,
            message: "not found".to_string(),
            code: None,
            detail: None,
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(!err.is_network());
        assert_eq!(err.to_string(), "API error (status 404): not found");
    }

    #[test]
    fn cancellation_is_not_a_timeout() {
        let err = ClientError::cancelled();
        assert!(err.is_network());
        assert!(err.is_cancelled());
        assert_eq!(err.network_kind(), Some(NetworkErrorKind::Cancelled));
        assert_ne!(err.network_kind(), Some(NetworkErrorKind::Timeout));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn deadline_is_reported_separately() {
        let err = ClientError::deadline_exceeded();
        assert!(!err.is_cancelled());
        assert_eq!(err.network_kind(), Some(NetworkErrorKind::DeadlineExceeded));
        assert!(err.to_string().contains("deadline exceeded"));
    }
}
