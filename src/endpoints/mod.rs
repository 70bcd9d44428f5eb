//! Endpoint verification subsystem.
//!
//! # Data Flow
//! ```text
//! addresses → Candidate::parse_all
//!           → EndpointVerifier::verify_and_build (strategy: All | Any | Quorum)
//!           → EndpointPool (immutable, candidate order)
//!             or VerificationError (per-candidate classified failures)
//! ```
//!
//! # Design Decisions
//! - Candidates are `Arc` handles; endpoints keep the caller's allocation
//! - A pool never changes after construction; re-verify to pick up topology changes

pub mod candidate;
pub mod failure;
pub mod pool;
pub mod strategy;
pub mod verifier;

pub use candidate::{Candidate, CandidateError};
pub use failure::{AggregateFailure, CandidateFailure, VerificationError};
pub use pool::{Endpoint, EndpointPool};
pub use strategy::VerificationStrategy;
pub use verifier::{EndpointVerifier, VerifyOptions};
