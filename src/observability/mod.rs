//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! verifier, probes, request pipeline produce:
//!     → logging.rs (structured log events, one span per verification run)
//!     → metrics.rs (counters and histograms through the `metrics` facade)
//!
//! Consumers:
//!     → whatever subscriber / recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a metrics exporter
//! - Verification runs carry a UUID so interleaved runs can be told apart

pub mod logging;
pub mod metrics;
