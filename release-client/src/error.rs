use crate::models::{EnvelopeError, ResponseBody};
use release_core::retry::Retryable;
use reqwest::StatusCode;
use thiserror::Error;

/// Hard failures: everything that keeps a call from producing an envelope.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build request for {operation}: {source}")]
    Request {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("network error calling {operation}: {source}")]
    Network {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {operation} timed out")]
    Timeout { operation: &'static str },

    #[error("{operation} returned HTTP {status}")]
    Status {
        operation: &'static str,
        status: StatusCode,
        /// The body, when the server still answered with JSON.
        body: Option<ResponseBody>,
    },

    #[error("{operation} returned a malformed envelope: {source}")]
    Envelope {
        operation: &'static str,
        #[source]
        source: EnvelopeError,
    },

    #[error("request to {operation} was aborted")]
    Aborted { operation: &'static str },
}

impl TransportError {
    pub fn operation(&self) -> &'static str {
        match self {
            TransportError::Request { operation, .. }
            | TransportError::Network { operation, .. }
            | TransportError::Timeout { operation }
            | TransportError::Status { operation, .. }
            | TransportError::Envelope { operation, .. }
            | TransportError::Aborted { operation } => operation,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&ResponseBody> {
        match self {
            TransportError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// True when no HTTP exchange completed at all.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            TransportError::Network { .. } | TransportError::Timeout { .. }
        )
    }

    /// Whether the server could not even be reached.
    pub fn is_unreachable(&self) -> bool {
        match self {
            TransportError::Network { source, .. } => source.is_connect(),
            _ => false,
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Request { .. } => "request",
            TransportError::Network { .. } => "network",
            TransportError::Timeout { .. } => "timeout",
            TransportError::Status { .. } => "status",
            TransportError::Envelope { .. } => "envelope",
            TransportError::Aborted { .. } => "aborted",
        }
    }
}

impl Retryable for TransportError {
    fn is_retryable(&self) -> bool {
        match self {
            TransportError::Network { .. } | TransportError::Timeout { .. } => true,
            TransportError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_retryable() {
        let error = TransportError::Status {
            operation: "releasesApiGetAllReleases",
            status: StatusCode::BAD_GATEWAY,
            body: None,
        };
        assert!(error.is_retryable());
        assert_eq!(error.status(), Some(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn test_client_errors_are_permanent() {
        let error = TransportError::Status {
            operation: "accountsApiMe",
            status: StatusCode::UNAUTHORIZED,
            body: None,
        };
        assert!(!error.is_retryable());
        assert!(!TransportError::Timeout { operation: "x" }.is_unreachable());
        assert!(TransportError::Timeout { operation: "x" }.is_retryable());
    }
}
