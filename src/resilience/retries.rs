//! Retry logic.
//!
//! # Responsibilities
//! - Determine if a failed attempt may move to another endpoint
//!
//! # Design Decisions
//! - Never retry non-idempotent operations (create, delete, compare-and-*)
//! - Only connectivity and timeout failures are retryable; a store error or
//!   rejected request would fail the same way on every member

use crate::config::RetryConfig;
use crate::error::{ErrorKind, EtcdError};
use crate::requests::Operation;

pub fn is_retryable_error(err: &EtcdError) -> bool {
    matches!(err.kind(), ErrorKind::Connectivity | ErrorKind::Timeout)
}

/// Whether attempt number `attempt` (1-based) that failed with `err` may be retried.
pub fn should_retry(config: &RetryConfig, op: &Operation, attempt: u32, err: &EtcdError) -> bool {
    config.enabled && attempt < config.max_attempts && op.is_idempotent() && is_retryable_error(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::classify::classify_response;

    fn enabled() -> RetryConfig {
        RetryConfig {
            enabled: true,
            max_attempts: 3,
            ..RetryConfig::default()
        }
    }

    fn timeout() -> EtcdError {
        EtcdError::Timeout {
            endpoint: "http://e1:2379/".into(),
            after: None,
        }
    }

    #[test]
    fn test_disabled_never_retries() {
        assert!(!should_retry(&RetryConfig::default(), &Operation::get("/a"), 1, &timeout()));
    }

    #[test]
    fn test_only_idempotent_operations() {
        let config = enabled();
        assert!(should_retry(&config, &Operation::get("/a"), 1, &timeout()));
        assert!(!should_retry(&config, &Operation::delete("/a"), 1, &timeout()));
    }

    #[test]
    fn test_store_errors_are_final() {
        let err = classify_response("http://e1:2379/", 404, r#"{"errorCode":100,"message":"Key not found"}"#);
        assert!(!should_retry(&enabled(), &Operation::get("/a"), 1, &err));
    }

    #[test]
    fn test_attempt_limit() {
        let config = enabled();
        assert!(should_retry(&config, &Operation::get("/a"), 2, &timeout()));
        assert!(!should_retry(&config, &Operation::get("/a"), 3, &timeout()));
    }
}
