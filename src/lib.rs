//! etcd v2 HTTP client with verified endpoint pools.
//!
//! # Architecture Overview
//!
//! ```text
//!   candidate addresses ──▶ endpoints::EndpointVerifier ──▶ EndpointPool
//!                               │  (All | Any | Quorum)          │
//!                               ▼                                ▼
//!                        health::HttpProbe            client::EtcdClient
//!                        GET /version per              Operation → RequestSpec
//!                        candidate, concurrently       → selector → transport
//!                               │                                │
//!                               └──────────┬─────────────────────┘
//!                                          ▼
//!                               error::classify → EtcdError
//!
//!   Cross-cutting: config (TOML + snapshots), observability (tracing, metrics),
//!                  resilience (timeouts, retries, backoff)
//! ```

// Core subsystems
pub mod client;
pub mod endpoints;
pub mod error;
pub mod health;
pub mod requests;

// Cross-cutting concerns
pub mod config;
pub mod observability;
pub mod resilience;

pub use client::{ClientError, EtcdClient, EtcdResponse, ResponseHeaders};
pub use config::ClientConfig;
pub use endpoints::{Candidate, Endpoint, EndpointPool, EndpointVerifier, VerificationError, VerificationStrategy};
pub use error::{ErrorCode, ErrorKind, EtcdError, EtcdResult};
pub use health::{HealthProbe, HttpProbe, ProbeOutcome};
pub use requests::Operation;
