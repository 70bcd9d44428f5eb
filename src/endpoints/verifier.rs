//! Concurrent endpoint verification.
//!
//! # Data Flow
//! ```text
//! candidates
//!     → one probe future per candidate (FuturesUnordered fan-in)
//!     → each settled outcome recorded in the Tally
//!     → strategy decides: Pending | Accept | Reject
//!     → Reject keeps listening until reachability is known
//!       (first Online, or every probe settled)
//!     → remaining probes dropped (abandoned)
//!     → Accept: EndpointPool in candidate order
//!       Reject: Unreachable (nothing Online) | PolicyUnmet
//! ```
//!
//! # Design Decisions
//! - Probes never block each other; the run is bounded by the slowest
//!   probe it still needs
//! - Outcomes are plain values until the final decision
//! - An optional overall deadline settles stragglers as timeouts

use std::time::{Duration, Instant};

use futures_util::stream::{FuturesUnordered, StreamExt};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::VerificationConfig;
use crate::endpoints::candidate::Candidate;
use crate::endpoints::failure::{AggregateFailure, CandidateFailure, VerificationError};
use crate::endpoints::pool::{Endpoint, EndpointPool};
use crate::endpoints::strategy::{Decision, Tally, VerificationStrategy};
use crate::error::EtcdError;
use crate::health::probe::{HealthProbe, ProbeOutcome};
use crate::observability::metrics;
use crate::resilience::timeouts::with_timeout;

/// Timing limits for one verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Limit for each individual probe.
    pub probe_timeout: Duration,
    /// Limit for the whole run.
    pub deadline: Option<Duration>,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_secs(5),
            deadline: None,
        }
    }
}

impl From<&VerificationConfig> for VerifyOptions {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
            deadline: config.deadline_ms.map(Duration::from_millis),
        }
    }
}

/// Probes candidates concurrently and applies a strategy.
#[derive(Debug, Clone)]
pub struct EndpointVerifier<P> {
    probe: P,
    strategy: VerificationStrategy,
    options: VerifyOptions,
}

impl<P: HealthProbe> EndpointVerifier<P> {
    pub fn new(probe: P, strategy: VerificationStrategy) -> Self {
        Self {
            probe,
            strategy,
            options: VerifyOptions::default(),
        }
    }

    pub fn with_options(mut self, options: VerifyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn strategy(&self) -> VerificationStrategy {
        self.strategy
    }

    pub fn options(&self) -> VerifyOptions {
        self.options
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Probe every candidate and build a pool if the strategy is satisfied.
    ///
    /// Duplicate addresses are probed independently.
    pub async fn verify_and_build(&self, candidates: &[Candidate]) -> Result<EndpointPool, VerificationError> {
        let span = tracing::info_span!(
            "verify",
            run = %Uuid::new_v4(),
            strategy = %self.strategy,
            candidates = candidates.len()
        );
        let start = Instant::now();
        let result = self.run(candidates).instrument(span).await;
        metrics::record_verification(self.strategy, result.is_ok(), start);
        result
    }

    async fn run(&self, candidates: &[Candidate]) -> Result<EndpointPool, VerificationError> {
        if candidates.is_empty() {
            return Err(VerificationError::NoCandidates);
        }

        let mut tally = Tally::new(self.strategy, candidates);
        let mut outcomes: Vec<Option<ProbeOutcome>> = vec![None; candidates.len()];
        let probe_timeout = self.options.probe_timeout;

        let mut in_flight: FuturesUnordered<_> = candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| async move {
                let outcome = with_timeout(candidate.as_str(), probe_timeout, self.probe.probe(candidate))
                    .await
                    .unwrap_or_else(ProbeOutcome::Offline);
                (index, outcome)
            })
            .collect();

        let deadline = self.options.deadline.map(|d| (d, tokio::time::Instant::now() + d));
        let mut decision = Decision::Pending;
        let mut expired = false;

        while !settled(decision, &tally) {
            let next = match deadline {
                Some((_, at)) => match tokio::time::timeout_at(at, in_flight.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        expired = true;
                        break;
                    }
                },
                None => in_flight.next().await,
            };
            let Some((index, outcome)) = next else {
                break;
            };

            match &outcome {
                ProbeOutcome::Online { .. } => {
                    tracing::debug!(index, endpoint = %candidates[index], "Candidate online");
                }
                ProbeOutcome::Offline(err) => {
                    tracing::warn!(index, endpoint = %candidates[index], kind = %err.kind(), error = %err, "Candidate offline");
                }
            }

            tally.record(index, outcome.is_online());
            outcomes[index] = Some(outcome);
            if decision == Decision::Pending {
                decision = tally.decide();
            }
        }

        // Anything still running is abandoned here.
        drop(in_flight);

        if expired {
            if let Some((limit, _)) = deadline {
                tracing::warn!(
                    unresolved = tally.pending(),
                    deadline_ms = limit.as_millis() as u64,
                    "Verification deadline reached"
                );
                for (index, candidate) in candidates.iter().enumerate() {
                    if tally.is_pending(index) {
                        tally.record(index, false);
                        outcomes[index] = Some(ProbeOutcome::Offline(EtcdError::timeout(candidate.as_str(), Some(limit))));
                    }
                }
            }
            if decision == Decision::Pending {
                decision = tally.decide();
            }
        }

        match decision {
            Decision::Accept => {
                let endpoints: Vec<Endpoint> = candidates
                    .iter()
                    .zip(outcomes)
                    .filter_map(|(candidate, outcome)| match outcome {
                        Some(ProbeOutcome::Online { version }) => Some(Endpoint::new(candidate.clone(), version)),
                        _ => None,
                    })
                    .collect();

                tracing::info!(
                    online = endpoints.len(),
                    total = candidates.len(),
                    "Verification accepted"
                );
                Ok(EndpointPool::new(endpoints, self.strategy, candidates.len()))
            }
            Decision::Reject | Decision::Pending => {
                let failures: Vec<CandidateFailure> = candidates
                    .iter()
                    .zip(outcomes)
                    .enumerate()
                    .filter_map(|(index, (candidate, outcome))| match outcome {
                        Some(ProbeOutcome::Offline(error)) => Some(CandidateFailure {
                            index,
                            candidate: candidate.clone(),
                            error,
                        }),
                        _ => None,
                    })
                    .collect();

                let aggregate = AggregateFailure {
                    strategy: self.strategy,
                    total: tally.total(),
                    online: tally.online(),
                    required: tally.required(),
                    unresolved: tally.pending(),
                    failures,
                };

                tracing::warn!(
                    online = aggregate.online,
                    offline = aggregate.failures.len(),
                    unresolved = aggregate.unresolved,
                    required = aggregate.required,
                    "Verification rejected"
                );

                if tally.online() == 0 {
                    Err(VerificationError::Unreachable(aggregate))
                } else {
                    Err(VerificationError::PolicyUnmet(aggregate))
                }
            }
        }
    }
}

/// Whether a run can stop listening to probes.
///
/// A rejection is final, but the run keeps listening until one candidate
/// answers Online or every probe has settled, so a rejected run always
/// knows whether any endpoint was reachable.
fn settled(decision: Decision, tally: &Tally) -> bool {
    match decision {
        Decision::Pending => false,
        Decision::Accept => true,
        Decision::Reject => tally.online() > 0 || tally.pending() == 0,
    }
}
