//! Error taxonomy.
//!
//! # Data Flow
//! ```text
//! reqwest error / non-2xx response
//!     → classify.rs (deterministic, total mapping)
//!     → EtcdError (one variant per kind)
//!     → returned by probes (inside ProbeOutcome) and by request execution
//! ```
//!
//! # Design Decisions
//! - Closed enum instead of one type per condition; store codes live in
//!   `ErrorCode` and travel inside `StoreError`
//! - Errors are values: probes capture them, the verifier aggregates them
//! - Messages carry the endpoint so aggregated failures stay readable

pub mod classify;
pub mod codes;

use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub use codes::ErrorCode;

/// Result type for request execution.
pub type EtcdResult<T> = Result<T, EtcdError>;

/// Why a connection could not be established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityKind {
    /// The host answered with a refusal.
    Refused,
    /// The host name did not resolve.
    Dns,
    /// Anything else on the way to the host.
    Unreachable,
}

impl fmt::Display for ConnectivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityKind::Refused => f.write_str("connection refused"),
            ConnectivityKind::Dns => f.write_str("name resolution failed"),
            ConnectivityKind::Unreachable => f.write_str("host unreachable"),
        }
    }
}

/// Coarse classification, one per taxonomy kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connectivity,
    Timeout,
    MalformedResponse,
    ClientRequest,
    Store,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Connectivity => "connectivity",
            ErrorKind::Timeout => "timeout",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::ClientRequest => "client_request",
            ErrorKind::Store => "store",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A domain condition reported by the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}{}", .cause.as_deref().map(|c| format!(" [{c}]")).unwrap_or_default())]
pub struct StoreError {
    pub code: ErrorCode,
    pub message: String,
    pub cause: Option<String>,
    pub index: Option<u64>,
    /// HTTP status of the response that carried the error.
    pub status: u16,
}

/// Every failure the client can surface for a single call or probe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EtcdError {
    /// Host unreachable, refused or unresolvable.
    #[error("{endpoint}: {kind}: {detail}")]
    Connectivity {
        endpoint: String,
        kind: ConnectivityKind,
        detail: String,
    },

    /// No answer within the deadline.
    #[error("{endpoint}: timed out{}", .after.map(|d| format!(" after {} ms", d.as_millis())).unwrap_or_default())]
    Timeout {
        endpoint: String,
        after: Option<Duration>,
    },

    /// Unparsable body or an unexpected status.
    #[error("{endpoint}: malformed response{}: {reason}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    MalformedResponse {
        endpoint: String,
        status: Option<u16>,
        reason: String,
    },

    /// Rejected for a client-side reason.
    #[error("{endpoint}: request rejected{}: {reason}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    ClientRequest {
        endpoint: String,
        status: Option<u16>,
        reason: String,
    },

    /// The cluster answered with a domain error code.
    #[error("{endpoint}: {error}")]
    Store { endpoint: String, error: StoreError },
}

impl EtcdError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EtcdError::Connectivity { .. } => ErrorKind::Connectivity,
            EtcdError::Timeout { .. } => ErrorKind::Timeout,
            EtcdError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            EtcdError::ClientRequest { .. } => ErrorKind::ClientRequest,
            EtcdError::Store { .. } => ErrorKind::Store,
        }
    }

    /// The endpoint the failure was observed against.
    pub fn endpoint(&self) -> &str {
        match self {
            EtcdError::Connectivity { endpoint, .. }
            | EtcdError::Timeout { endpoint, .. }
            | EtcdError::MalformedResponse { endpoint, .. }
            | EtcdError::ClientRequest { endpoint, .. }
            | EtcdError::Store { endpoint, .. } => endpoint,
        }
    }

    pub fn store_code(&self) -> Option<ErrorCode> {
        match self {
            EtcdError::Store { error, .. } => Some(error.code),
            _ => None,
        }
    }

    pub fn connectivity_kind(&self) -> Option<ConnectivityKind> {
        match self {
            EtcdError::Connectivity { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// HTTP status attached to the failure, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            EtcdError::MalformedResponse { status, .. } | EtcdError::ClientRequest { status, .. } => *status,
            EtcdError::Store { error, .. } => Some(error.status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }

    pub fn is_connectivity(&self) -> bool {
        self.kind() == ErrorKind::Connectivity
    }

    /// The host was never reached or never answered.
    pub fn is_unreachable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Connectivity | ErrorKind::Timeout)
    }

    /// 400 without a store code.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, EtcdError::ClientRequest { status: Some(400), .. })
    }

    /// 404 without a store code.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, EtcdError::ClientRequest { status: Some(404), .. })
    }

    pub fn is_key_not_found(&self) -> bool {
        self.store_code() == Some(ErrorCode::KeyNotFound)
    }

    pub fn is_test_failed(&self) -> bool {
        self.store_code() == Some(ErrorCode::TestFailed)
    }

    pub fn is_node_exists(&self) -> bool {
        self.store_code() == Some(ErrorCode::NodeExists)
    }

    pub(crate) fn timeout(endpoint: impl Into<String>, after: Option<Duration>) -> Self {
        EtcdError::Timeout {
            endpoint: endpoint.into(),
            after,
        }
    }

    pub(crate) fn malformed(endpoint: impl Into<String>, status: Option<u16>, reason: impl Into<String>) -> Self {
        EtcdError::MalformedResponse {
            endpoint: endpoint.into(),
            status,
            reason: reason.into(),
        }
    }

    pub(crate) fn client_request(endpoint: impl Into<String>, status: Option<u16>, reason: impl Into<String>) -> Self {
        EtcdError::ClientRequest {
            endpoint: endpoint.into(),
            status,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EtcdError::timeout("http://e1:2379/", Some(Duration::from_millis(250)));
        assert_eq!(err.to_string(), "http://e1:2379/: timed out after 250 ms");

        let err = EtcdError::Connectivity {
            endpoint: "http://e3:2379/".into(),
            kind: ConnectivityKind::Refused,
            detail: "tcp connect error".into(),
        };
        assert!(err.to_string().contains("connection refused"));

        let err = EtcdError::Store {
            endpoint: "http://e1:2379/".into(),
            error: StoreError {
                code: ErrorCode::KeyNotFound,
                message: "Key not found".into(),
                cause: Some("/foo".into()),
                index: Some(7),
                status: 404,
            },
        };
        assert_eq!(err.to_string(), "http://e1:2379/: key_not_found (100): Key not found [/foo]");
    }

    #[test]
    fn test_predicates() {
        let err = EtcdError::client_request("e", Some(404), "not found");
        assert!(err.is_invalid_request());
        assert!(!err.is_bad_request());
        assert_eq!(err.kind(), ErrorKind::ClientRequest);
        assert_eq!(err.status(), Some(404));

        let err = EtcdError::timeout("e", None);
        assert!(err.is_unreachable());
        assert!(err.store_code().is_none());
    }
}
