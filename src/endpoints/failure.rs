//! Verification failures.

use std::fmt;

use thiserror::Error;

use crate::endpoints::candidate::Candidate;
use crate::endpoints::strategy::VerificationStrategy;
use crate::error::{EtcdError, ErrorKind};

/// One candidate that reported Offline.
#[derive(Debug, Clone)]
pub struct CandidateFailure {
    /// Position in the caller's candidate list.
    pub index: usize,
    pub candidate: Candidate,
    pub error: EtcdError,
}

impl CandidateFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Per-candidate detail for a run whose policy was not met.
#[derive(Debug, Clone)]
pub struct AggregateFailure {
    pub strategy: VerificationStrategy,
    /// Candidates supplied.
    pub total: usize,
    /// Candidates that reported Online before the decision.
    pub online: usize,
    /// Online results the strategy needed.
    pub required: usize,
    /// Candidates still in flight when the run stopped; abandoned.
    pub unresolved: usize,
    /// Every Offline candidate, in candidate order.
    pub failures: Vec<CandidateFailure>,
}

impl AggregateFailure {
    /// Failure recorded for a specific candidate position.
    pub fn failure_at(&self, index: usize) -> Option<&CandidateFailure> {
        self.failures.iter().find(|f| f.index == index)
    }

    /// Failure recorded for a candidate address.
    pub fn failure_for(&self, candidate: &Candidate) -> Option<&CandidateFailure> {
        self.failures.iter().find(|f| &f.candidate == candidate)
    }

    pub fn first(&self) -> Option<&CandidateFailure> {
        self.failures.first()
    }
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "strategy '{}' needed {} online of {}, got {}",
            self.strategy, self.required, self.total, self.online
        )?;
        if self.unresolved > 0 {
            write!(f, " ({} unresolved)", self.unresolved)?;
        }
        for failure in &self.failures {
            write!(f, "; [{}] {}", failure.kind(), failure.error)?;
        }
        Ok(())
    }
}

/// Verification did not produce a pool.
#[derive(Debug, Clone, Error)]
pub enum VerificationError {
    #[error("no candidate endpoints were supplied")]
    NoCandidates,

    /// No candidate reported Online; every candidate settled Offline.
    #[error("no endpoint reachable: {0}")]
    Unreachable(AggregateFailure),

    /// At least one candidate was reachable but the policy was not met.
    #[error("verification policy not met: {0}")]
    PolicyUnmet(AggregateFailure),
}

impl VerificationError {
    pub fn aggregate(&self) -> Option<&AggregateFailure> {
        match self {
            VerificationError::NoCandidates => None,
            VerificationError::Unreachable(agg) | VerificationError::PolicyUnmet(agg) => Some(agg),
        }
    }

    pub fn failures(&self) -> &[CandidateFailure] {
        self.aggregate().map(|a| a.failures.as_slice()).unwrap_or(&[])
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, VerificationError::Unreachable(_))
    }
}
