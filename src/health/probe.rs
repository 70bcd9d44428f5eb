//! Probe contract.
//!
//! # Responsibilities
//! - One reachability check per call, no internal retry
//! - Report failures as classified values, never panics or early returns
//!
//! The verifier enforces the per-probe timeout on top of whatever the
//! implementation does, so a probe that hangs is still settled as Offline.

use std::future::Future;
use std::sync::Arc;

use crate::endpoints::Candidate;
use crate::error::EtcdError;
use crate::requests::version::VersionInfo;

/// Result of probing one candidate.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    Online { version: Option<VersionInfo> },
    Offline(EtcdError),
}

impl ProbeOutcome {
    pub fn online() -> Self {
        ProbeOutcome::Online { version: None }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, ProbeOutcome::Online { .. })
    }

    pub fn error(&self) -> Option<&EtcdError> {
        match self {
            ProbeOutcome::Offline(err) => Some(err),
            ProbeOutcome::Online { .. } => None,
        }
    }
}

/// A single lightweight reachability check against one candidate.
pub trait HealthProbe: Send + Sync {
    fn probe(&self, candidate: &Candidate) -> impl Future<Output = ProbeOutcome> + Send;
}

impl<P: HealthProbe> HealthProbe for Arc<P> {
    fn probe(&self, candidate: &Candidate) -> impl Future<Output = ProbeOutcome> + Send {
        (**self).probe(candidate)
    }
}
