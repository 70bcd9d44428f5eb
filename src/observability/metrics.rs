//! Metrics collection.
//!
//! # Metrics
//! - `etcd_probe_total` (counter): probes by outcome and error kind
//! - `etcd_probe_duration_seconds` (histogram): probe latency
//! - `etcd_verification_total` (counter): verification runs by strategy and result
//! - `etcd_verification_duration_seconds` (histogram): verification latency
//! - `etcd_requests_total` (counter): requests by operation and result
//! - `etcd_request_duration_seconds` (histogram): request latency by operation
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without a recorder it is a no-op
//! - Labels are static strings so recording never allocates

use std::time::Instant;

use metrics::{counter, histogram};

use crate::endpoints::VerificationStrategy;
use crate::error::EtcdError;
use crate::health::probe::ProbeOutcome;

pub mod names {
    pub const PROBE_TOTAL: &str = "etcd_probe_total";
    pub const PROBE_DURATION_SECONDS: &str = "etcd_probe_duration_seconds";
    pub const VERIFICATION_TOTAL: &str = "etcd_verification_total";
    pub const VERIFICATION_DURATION_SECONDS: &str = "etcd_verification_duration_seconds";
    pub const REQUESTS_TOTAL: &str = "etcd_requests_total";
    pub const REQUEST_DURATION_SECONDS: &str = "etcd_request_duration_seconds";
}

pub fn record_probe(outcome: &ProbeOutcome, start: Instant) {
    let (label, kind) = match outcome {
        ProbeOutcome::Online { .. } => ("online", "none"),
        ProbeOutcome::Offline(err) => ("offline", err.kind().as_str()),
    };
    counter!(names::PROBE_TOTAL, "outcome" => label, "kind" => kind).increment(1);
    histogram!(names::PROBE_DURATION_SECONDS).record(start.elapsed().as_secs_f64());
}

pub fn record_verification(strategy: VerificationStrategy, accepted: bool, start: Instant) {
    let result = if accepted { "accepted" } else { "rejected" };
    counter!(names::VERIFICATION_TOTAL, "strategy" => strategy.as_str(), "result" => result).increment(1);
    histogram!(names::VERIFICATION_DURATION_SECONDS, "strategy" => strategy.as_str())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_request(operation: &'static str, error: Option<&EtcdError>, start: Instant) {
    let result = error.map(|e| e.kind().as_str()).unwrap_or("ok");
    counter!(names::REQUESTS_TOTAL, "operation" => operation, "result" => result).increment(1);
    histogram!(names::REQUEST_DURATION_SECONDS, "operation" => operation).record(start.elapsed().as_secs_f64());
}
