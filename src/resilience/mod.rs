//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to endpoint:
//!     → timeouts.rs (enforce probe/request deadline)
//!     → On failure: retries.rs (check if retryable)
//!     → backoff.rs (jittered delay before the next endpoint)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Retries only for idempotent operations, and only for connectivity or timeout failures
//! - Retries are off unless configured; without them one call is one classified error

pub mod backoff;
pub mod retries;
pub mod timeouts;
