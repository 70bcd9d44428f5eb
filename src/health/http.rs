//! HTTP version probe.
//!
//! # Responsibilities
//! - `GET <candidate>/version` with a per-attempt timeout
//! - Any 2xx is Online; the body is only inspected for optional metadata
//! - Classify everything else through `error::classify`

use std::time::{Duration, Instant};

use reqwest::Client;

use crate::endpoints::Candidate;
use crate::error::classify::{classify_response, classify_transport};
use crate::health::probe::{HealthProbe, ProbeOutcome};
use crate::observability::metrics;
use crate::requests::version::{VersionInfo, VERSION_PATH};

/// Probes candidates with the cluster's version endpoint.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn check(&self, candidate: &Candidate) -> ProbeOutcome {
        let endpoint = candidate.as_str();
        let url = candidate.join_segments([VERSION_PATH]);

        let response = match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                let err = classify_transport(endpoint, &e, Some(self.timeout));
                tracing::warn!(endpoint = %endpoint, error = %err, "Probe failed: transport error");
                return ProbeOutcome::Offline(err);
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                let err = classify_transport(endpoint, &e, Some(self.timeout));
                tracing::warn!(endpoint = %endpoint, error = %err, "Probe failed: body read error");
                return ProbeOutcome::Offline(err);
            }
        };

        if !status.is_success() {
            let err = classify_response(endpoint, status.as_u16(), &body);
            tracing::warn!(endpoint = %endpoint, status = %status, error = %err, "Probe failed: non-success status");
            return ProbeOutcome::Offline(err);
        }

        // Reachability is all that matters; a foreign body is not a failure.
        let version = serde_json::from_str::<VersionInfo>(&body).ok();
        tracing::debug!(endpoint = %endpoint, version = ?version, "Probe succeeded");
        ProbeOutcome::Online { version }
    }
}

impl HealthProbe for HttpProbe {
    async fn probe(&self, candidate: &Candidate) -> ProbeOutcome {
        let start = Instant::now();
        let outcome = self.check(candidate).await;
        metrics::record_probe(&outcome, start);
        outcome
    }
}
