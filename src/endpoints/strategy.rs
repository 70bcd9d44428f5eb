//! Verification strategies and their acceptance rules.
//!
//! # Acceptance
//! ```text
//! All:    every candidate Online;   rejects on the first Offline
//! Any:    at least one Online;      decides once every probe settled
//! Quorum: distinct addresses Online > half of distinct addresses;
//!         decides once every probe settled, rejects early when the
//!         majority is out of reach
//! ```
//!
//! # Design Decisions
//! - Any/Quorum wait for all probes so the pool is as complete as possible
//! - Duplicate addresses are probed independently but count once toward
//!   the Quorum majority

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::endpoints::candidate::Candidate;

/// How many candidates must be reachable for verification to succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStrategy {
    /// Every candidate must be online.
    #[default]
    All,
    /// At least one candidate must be online.
    Any,
    /// A strict majority of distinct addresses must be online.
    Quorum,
}

impl VerificationStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStrategy::All => "all",
            VerificationStrategy::Any => "any",
            VerificationStrategy::Quorum => "quorum",
        }
    }
}

impl fmt::Display for VerificationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(VerificationStrategy::All),
            "any" => Ok(VerificationStrategy::Any),
            "quorum" | "majority" => Ok(VerificationStrategy::Quorum),
            other => Err(format!("unknown verification strategy '{other}' (expected all, any or quorum)")),
        }
    }
}

/// Outcome of applying a strategy to the outcomes seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Pending,
    Accept,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Pending,
    Online,
    Offline,
}

/// Running count of probe outcomes for one verification run.
#[derive(Debug)]
pub(crate) struct Tally {
    strategy: VerificationStrategy,
    slots: Vec<Slot>,
    /// Candidate index → distinct address id.
    address_of: Vec<usize>,
    distinct: usize,
}

impl Tally {
    pub(crate) fn new(strategy: VerificationStrategy, candidates: &[Candidate]) -> Self {
        let mut ids: HashMap<&str, usize> = HashMap::new();
        let address_of = candidates
            .iter()
            .map(|c| {
                let next = ids.len();
                *ids.entry(c.as_str()).or_insert(next)
            })
            .collect();

        Self {
            strategy,
            slots: vec![Slot::Pending; candidates.len()],
            address_of,
            distinct: ids.len(),
        }
    }

    /// Record a settled probe. Later results for the same index are ignored.
    pub(crate) fn record(&mut self, index: usize, online: bool) {
        if let Some(slot) = self.slots.get_mut(index) {
            if *slot == Slot::Pending {
                *slot = if online { Slot::Online } else { Slot::Offline };
            }
        }
    }

    pub(crate) fn is_pending(&self, index: usize) -> bool {
        self.slots.get(index) == Some(&Slot::Pending)
    }

    pub(crate) fn online(&self) -> usize {
        self.count(Slot::Online)
    }

    pub(crate) fn offline(&self) -> usize {
        self.count(Slot::Offline)
    }

    pub(crate) fn pending(&self) -> usize {
        self.count(Slot::Pending)
    }

    pub(crate) fn total(&self) -> usize {
        self.slots.len()
    }

    /// Online results needed to accept.
    pub(crate) fn required(&self) -> usize {
        match self.strategy {
            VerificationStrategy::All => self.slots.len(),
            VerificationStrategy::Any => 1,
            VerificationStrategy::Quorum => self.distinct / 2 + 1,
        }
    }

    pub(crate) fn decide(&self) -> Decision {
        match self.strategy {
            VerificationStrategy::All => {
                if self.offline() > 0 {
                    Decision::Reject
                } else if self.pending() == 0 {
                    Decision::Accept
                } else {
                    Decision::Pending
                }
            }
            VerificationStrategy::Any => {
                if self.pending() > 0 {
                    Decision::Pending
                } else if self.online() > 0 {
                    Decision::Accept
                } else {
                    Decision::Reject
                }
            }
            VerificationStrategy::Quorum => {
                let required = self.required();
                if self.distinct_matching(|s| s != Slot::Offline) < required {
                    Decision::Reject
                } else if self.pending() > 0 {
                    Decision::Pending
                } else if self.distinct_matching(|s| s == Slot::Online) >= required {
                    Decision::Accept
                } else {
                    Decision::Reject
                }
            }
        }
    }

    fn count(&self, wanted: Slot) -> usize {
        self.slots.iter().filter(|s| **s == wanted).count()
    }

    /// Distinct addresses with at least one slot satisfying `pred`.
    fn distinct_matching(&self, pred: impl Fn(Slot) -> bool) -> usize {
        let mut seen = vec![false; self.distinct];
        for (slot, addr) in self.slots.iter().zip(&self.address_of) {
            if pred(*slot) {
                seen[*addr] = true;
            }
        }
        seen.into_iter().filter(|s| *s).count()
    }
}
