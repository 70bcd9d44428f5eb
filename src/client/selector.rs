//! Endpoint selection strategies.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::SelectionPolicy;
use crate::endpoints::EndpointPool;

/// Picks the pool position that serves the next request.
/// Failover continues from that position in pool order.
pub trait EndpointSelector: Send + Sync + fmt::Debug {
    fn select(&self, pool: &EndpointPool) -> Option<usize>;
}

/// Always the first verified endpoint.
#[derive(Debug, Default)]
pub struct Primary;

impl EndpointSelector for Primary {
    fn select(&self, pool: &EndpointPool) -> Option<usize> {
        if pool.is_empty() {
            None
        } else {
            Some(0)
        }
    }
}

/// Round-robin selector.
/// Stores an internal counter to rotate through endpoints.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EndpointSelector for RoundRobin {
    fn select(&self, pool: &EndpointPool) -> Option<usize> {
        if pool.is_empty() {
            return None;
        }
        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        Some(count % pool.len())
    }
}

pub fn selector_for(policy: SelectionPolicy) -> Box<dyn EndpointSelector> {
    match policy {
        SelectionPolicy::Primary => Box::new(Primary),
        SelectionPolicy::RoundRobin => Box::new(RoundRobin::new()),
    }
}
