//! Health probing subsystem.
//!
//! # Data Flow
//! ```text
//! EndpointVerifier
//!     → HealthProbe::probe(candidate)   (one call, no retry)
//!     → ProbeOutcome::Online { version } | ProbeOutcome::Offline(EtcdError)
//! ```
//!
//! # Design Decisions
//! - The probe is a trait seam so verification can be tested without a network
//! - `HttpProbe` only cares about reachability; any 2xx is Online

pub mod http;
pub mod probe;

pub use http::HttpProbe;
pub use probe::{HealthProbe, ProbeOutcome};
