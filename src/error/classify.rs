//! Failure classification.
//!
//! # Responsibilities
//! - Map transport errors (timeouts, refused/DNS/unreachable) to `EtcdError`
//! - Map non-2xx responses to store codes, client rejections or malformed
//!   responses
//!
//! # Rules
//! ```text
//! non-2xx with errorCode in body  → Store(code)
//! 409 without code                → Store(ExistingPeerAddress)
//! other 4xx without code          → ClientRequest
//! anything else                   → MalformedResponse
//! ```

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use serde::Deserialize;

use crate::error::codes::{deserialize_optional_code, ErrorCode};
use crate::error::{ConnectivityKind, EtcdError, StoreError};

/// Error envelope returned by the cluster on failures.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default, deserialize_with = "deserialize_optional_code")]
    error_code: Option<ErrorCode>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    cause: Option<String>,
    #[serde(default)]
    index: Option<u64>,
}

/// Classify a failed HTTP exchange that never produced a usable response.
pub fn classify_transport(endpoint: &str, err: &reqwest::Error, timeout: Option<Duration>) -> EtcdError {
    if err.is_timeout() {
        return EtcdError::timeout(endpoint, timeout);
    }

    if err.is_connect() {
        let (kind, detail) = connectivity_cause(err);
        return EtcdError::Connectivity {
            endpoint: endpoint.to_string(),
            kind,
            detail,
        };
    }

    if err.is_decode() || err.is_body() {
        return EtcdError::malformed(endpoint, err.status().map(|s| s.as_u16()), err.to_string());
    }

    if err.is_builder() {
        return EtcdError::client_request(endpoint, None, err.to_string());
    }

    // Redirect loops, protocol errors and connection resets after connect.
    EtcdError::Connectivity {
        endpoint: endpoint.to_string(),
        kind: ConnectivityKind::Unreachable,
        detail: source_chain(err),
    }
}

/// Classify a response whose status is not 2xx.
pub fn classify_response(endpoint: &str, status: u16, body: &str) -> EtcdError {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();

    if let Some(body) = &parsed {
        if let Some(code) = body.error_code {
            return store_error(endpoint, status, code, body);
        }
    }

    if let Some(code) = ErrorCode::from_status(status) {
        let empty = ErrorBody {
            error_code: None,
            message: None,
            cause: None,
            index: None,
        };
        return store_error(endpoint, status, code, parsed.as_ref().unwrap_or(&empty));
    }

    let reason = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| summarize(body));

    match status {
        400..=499 => EtcdError::client_request(endpoint, Some(status), reason),
        _ => EtcdError::malformed(endpoint, Some(status), reason),
    }
}

fn store_error(endpoint: &str, status: u16, code: ErrorCode, body: &ErrorBody) -> EtcdError {
    EtcdError::Store {
        endpoint: endpoint.to_string(),
        error: StoreError {
            code,
            message: body.message.clone().unwrap_or_else(|| code.name().to_string()),
            cause: body.cause.clone(),
            index: body.index,
            status,
        },
    }
}

fn connectivity_cause(err: &reqwest::Error) -> (ConnectivityKind, String) {
    let detail = source_chain(err);
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::ConnectionRefused {
                return (ConnectivityKind::Refused, detail);
            }
        }
        source = cause.source();
    }

    let lowered = detail.to_ascii_lowercase();
    if lowered.contains("dns error")
        || lowered.contains("failed to lookup address")
        || lowered.contains("name or service not known")
        || lowered.contains("no such host")
    {
        return (ConnectivityKind::Dns, detail);
    }
    if lowered.contains("connection refused") {
        return (ConnectivityKind::Refused, detail);
    }
    (ConnectivityKind::Unreachable, detail)
}

fn source_chain(err: &reqwest::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

fn summarize(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty body".to_string();
    }
    trimmed.chars().take(200).collect()
}
