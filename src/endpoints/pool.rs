//! Verified endpoint pool.
//!
//! # Responsibilities
//! - Hold the endpoints that passed verification, in candidate order
//! - Stay immutable after construction; a topology change means a new pool
//!
//! Endpoints are only created here, by the verifier.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use url::Url;

use crate::endpoints::candidate::Candidate;
use crate::endpoints::strategy::VerificationStrategy;
use crate::requests::version::VersionInfo;

/// A candidate proven reachable at verification time.
#[derive(Debug, Clone)]
pub struct Endpoint {
    candidate: Candidate,
    verified_at: SystemTime,
    verified_instant: Instant,
    version: Option<VersionInfo>,
}

impl Endpoint {
    pub(crate) fn new(candidate: Candidate, version: Option<VersionInfo>) -> Self {
        Self {
            candidate,
            verified_at: SystemTime::now(),
            verified_instant: Instant::now(),
            version,
        }
    }

    /// The caller's original candidate (same allocation).
    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn url(&self) -> &Url {
        self.candidate.url()
    }

    pub fn as_str(&self) -> &str {
        self.candidate.as_str()
    }

    /// Wall-clock time of the successful probe.
    pub fn verified_at(&self) -> SystemTime {
        self.verified_at
    }

    /// Time elapsed since the successful probe.
    pub fn age(&self) -> Duration {
        self.verified_instant.elapsed()
    }

    /// Version metadata reported by the probe, if the body was parsable.
    pub fn version(&self) -> Option<&VersionInfo> {
        self.version.as_ref()
    }
}

/// Immutable, ordered set of verified endpoints.
///
/// Cloning is cheap and shares the same members.
#[derive(Debug, Clone)]
pub struct EndpointPool {
    endpoints: Arc<[Endpoint]>,
    strategy: VerificationStrategy,
    candidate_count: usize,
}

impl EndpointPool {
    pub(crate) fn new(endpoints: Vec<Endpoint>, strategy: VerificationStrategy, candidate_count: usize) -> Self {
        Self {
            endpoints: endpoints.into(),
            strategy,
            candidate_count,
        }
    }

    /// Verified endpoints in the caller's candidate order.
    pub fn online_endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Endpoint> {
        self.endpoints.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Endpoint> {
        self.endpoints.iter()
    }

    /// Number of candidates the verification started from.
    pub fn candidate_count(&self) -> usize {
        self.candidate_count
    }

    /// True when some candidates were left out (Any/Quorum).
    pub fn is_partial(&self) -> bool {
        self.endpoints.len() < self.candidate_count
    }

    pub fn strategy(&self) -> VerificationStrategy {
        self.strategy
    }

    /// Age of the oldest verification in the pool.
    pub fn oldest_age(&self) -> Option<Duration> {
        self.endpoints.iter().map(Endpoint::age).max()
    }
}

impl<'a> IntoIterator for &'a EndpointPool {
    type Item = &'a Endpoint;
    type IntoIter = std::slice::Iter<'a, Endpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.endpoints.iter()
    }
}
