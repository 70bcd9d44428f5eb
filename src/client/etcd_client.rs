//! Request execution pipeline.
//!
//! # Data Flow
//! ```text
//! Operation
//!     → render (RequestSpec)
//!     → selector picks a pool position
//!     → transport.send (timeouts + credentials from the current snapshot)
//!     → 2xx: RawResponse → decode → EtcdResponse<T>
//!       failure: classified EtcdError
//!         → retryable? (enabled, idempotent, connectivity/timeout)
//!             yes: backoff, next endpoint in pool order
//!             no:  return the error
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;

use crate::client::response::{EtcdResponse, RawResponse};
use crate::client::selector::{selector_for, EndpointSelector};
use crate::client::transport::Transport;
use crate::client::ClientError;
use crate::config::{validate_config, ClientConfig, ConfigError, ConfigHandle};
use crate::endpoints::{Candidate, EndpointPool, EndpointVerifier, VerifyOptions};
use crate::error::{ConnectivityKind, EtcdError};
use crate::health::HttpProbe;
use crate::observability::metrics;
use crate::requests::{Expected, KeyEvent, Member, MemberList, Operation, VersionInfo};
use crate::resilience::{backoff, retries};

/// Client bound to a verified endpoint pool.
#[derive(Debug)]
pub struct EtcdClient {
    pool: EndpointPool,
    config: Arc<ConfigHandle>,
    transport: Transport,
    selector: Box<dyn EndpointSelector>,
}

impl EtcdClient {
    /// Verify the configured endpoints and build a client over the survivors.
    pub async fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        validate_config(&config).map_err(|errors| ClientError::Config(ConfigError::Validation(errors)))?;

        let candidates = Candidate::parse_all(&config.endpoints)?;
        let transport = Transport::from_config(&config)?;
        let options = VerifyOptions::from(&config.verification);
        let probe = HttpProbe::new(transport.client().clone(), options.probe_timeout);

        let pool = EndpointVerifier::new(probe, config.verification.strategy)
            .with_options(options)
            .verify_and_build(&candidates)
            .await?;

        Self::assemble(pool, config, transport)
    }

    /// Build a client over a pool that was verified elsewhere.
    pub fn with_pool(pool: EndpointPool, config: ClientConfig) -> Result<Self, ClientError> {
        validate_config(&config).map_err(|errors| ClientError::Config(ConfigError::Validation(errors)))?;
        let transport = Transport::from_config(&config)?;
        Self::assemble(pool, config, transport)
    }

    fn assemble(pool: EndpointPool, config: ClientConfig, transport: Transport) -> Result<Self, ClientError> {
        if pool.is_empty() {
            return Err(ClientError::EmptyPool);
        }
        tracing::info!(
            endpoints = pool.len(),
            candidates = pool.candidate_count(),
            strategy = %pool.strategy(),
            "Client ready"
        );
        Ok(Self {
            selector: selector_for(config.selection),
            config: Arc::new(ConfigHandle::new(config)),
            pool,
            transport,
        })
    }

    pub fn pool(&self) -> &EndpointPool {
        &self.pool
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<ClientConfig> {
        self.config.current()
    }

    /// Change timeouts, retries or credentials for subsequent calls.
    ///
    /// Endpoint, selection and transport settings only apply to clients
    /// built after the change (see [`EtcdClient::reverify`]).
    pub fn update_config<F>(&self, f: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut ClientConfig),
    {
        self.config.update(f).map(|_| ())
    }

    /// Verify the current configuration's endpoints again and build a fresh client.
    pub async fn reverify(&self) -> Result<Self, ClientError> {
        Self::connect(ClientConfig::clone(&self.config())).await
    }

    /// Execute an operation and return the raw 2xx response.
    pub async fn execute(&self, op: &Operation) -> Result<RawResponse, EtcdError> {
        let config = self.config();
        let spec = op.render();
        let started = Instant::now();

        let Some(first) = self.selector.select(&self.pool) else {
            let err = EtcdError::Connectivity {
                endpoint: String::new(),
                kind: ConnectivityKind::Unreachable,
                detail: "endpoint pool is empty".to_string(),
            };
            metrics::record_request(op.name(), Some(&err), started);
            return Err(err);
        };

        let mut attempt: u32 = 1;
        loop {
            let index = (first + attempt as usize - 1) % self.pool.len();
            let endpoint = &self.pool.online_endpoints()[index];

            tracing::debug!(
                operation = op.name(),
                endpoint = %endpoint.as_str(),
                attempt,
                "Sending request"
            );

            match self.transport.send(endpoint, &spec, &config, op.is_long_poll()).await {
                Ok(response) => {
                    metrics::record_request(op.name(), None, started);
                    return Ok(response);
                }
                Err(err) if retries::should_retry(&config.retries, op, attempt, &err) => {
                    let delay: Duration = backoff::retry_delay(&config.retries, attempt);
                    tracing::warn!(
                        operation = op.name(),
                        endpoint = %endpoint.as_str(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Request failed, failing over to next endpoint"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        operation = op.name(),
                        endpoint = %endpoint.as_str(),
                        attempt,
                        kind = %err.kind(),
                        error = %err,
                        "Request failed"
                    );
                    metrics::record_request(op.name(), Some(&err), started);
                    return Err(err);
                }
            }
        }
    }

    /// Execute an operation and decode its JSON body.
    pub async fn execute_as<T: DeserializeOwned>(&self, op: &Operation) -> Result<EtcdResponse<T>, EtcdError> {
        self.execute(op).await?.decode()
    }

    pub async fn version(&self) -> Result<EtcdResponse<VersionInfo>, EtcdError> {
        self.execute_as(&Operation::Version).await
    }

    pub async fn get(&self, key: &str) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::get(key)).await
    }

    pub async fn get_recursive(&self, key: &str, sorted: bool) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::Get {
            key: key.to_string(),
            recursive: true,
            sorted,
            quorum: false,
        })
        .await
    }

    pub async fn set(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::Set {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
            prev_exist: None,
        })
        .await
    }

    /// Fails with `NodeExists` when the key is already present.
    pub async fn create(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::Set {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
            prev_exist: Some(false),
        })
        .await
    }

    /// Fails with `KeyNotFound` when the key is absent.
    pub async fn update(&self, key: &str, value: &str, ttl: Option<u64>) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::Set {
            key: key.to_string(),
            value: value.to_string(),
            ttl,
            prev_exist: Some(true),
        })
        .await
    }

    pub async fn create_dir(&self, key: &str, ttl: Option<u64>) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::CreateDir {
            key: key.to_string(),
            ttl,
        })
        .await
    }

    pub async fn update_dir(&self, key: &str, ttl: Option<u64>) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::UpdateDir {
            key: key.to_string(),
            ttl,
        })
        .await
    }

    pub async fn enqueue(&self, dir: &str, value: &str, ttl: Option<u64>) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::Enqueue {
            dir: dir.to_string(),
            value: value.to_string(),
            ttl,
        })
        .await
    }

    pub async fn delete(&self, key: &str) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::delete(key)).await
    }

    pub async fn delete_dir(&self, key: &str, recursive: bool) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::Delete {
            key: key.to_string(),
            dir: true,
            recursive,
        })
        .await
    }

    pub async fn compare_and_swap(
        &self,
        key: &str,
        value: &str,
        expected: Expected,
        ttl: Option<u64>,
    ) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::CompareAndSwap {
            key: key.to_string(),
            value: value.to_string(),
            expected,
            ttl,
        })
        .await
    }

    pub async fn compare_and_delete(&self, key: &str, expected: Expected) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::CompareAndDelete {
            key: key.to_string(),
            expected,
        })
        .await
    }

    /// Block until the next change at or after `wait_index`.
    pub async fn watch(
        &self,
        key: &str,
        recursive: bool,
        wait_index: Option<u64>,
    ) -> Result<EtcdResponse<KeyEvent>, EtcdError> {
        self.execute_as(&Operation::Watch {
            key: key.to_string(),
            recursive,
            wait_index,
        })
        .await
    }

    pub async fn list_members(&self) -> Result<EtcdResponse<MemberList>, EtcdError> {
        self.execute_as(&Operation::ListMembers).await
    }

    pub async fn create_member(&self, peer_urls: Vec<String>) -> Result<EtcdResponse<Member>, EtcdError> {
        self.execute_as(&Operation::CreateMember { peer_urls }).await
    }

    pub async fn delete_member(&self, id: &str) -> Result<EtcdResponse<()>, EtcdError> {
        let raw = self.execute(&Operation::DeleteMember { id: id.to_string() }).await?;
        Ok(raw.discard_body())
    }

    pub async fn update_member_peer_urls(&self, id: &str, peer_urls: Vec<String>) -> Result<EtcdResponse<()>, EtcdError> {
        let raw = self
            .execute(&Operation::UpdateMemberPeerUrls {
                id: id.to_string(),
                peer_urls,
            })
            .await?;
        Ok(raw.discard_body())
    }

    pub async fn leader(&self) -> Result<EtcdResponse<Member>, EtcdError> {
        self.execute_as(&Operation::Leader).await
    }
}
