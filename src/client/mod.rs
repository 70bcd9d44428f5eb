//! Client subsystem.
//!
//! # Data Flow
//! ```text
//! ClientConfig
//!     → EtcdClient::connect (verify endpoints → EndpointPool)
//!     → EtcdClient::execute (selector → transport → classify)
//!     → EtcdResponse<T> { headers, value } | EtcdError
//! ```
//!
//! # Design Decisions
//! - Verification-time and request-time failures share one error taxonomy
//! - The pool is fixed for the client's lifetime; `reverify` builds a new client
//! - Configuration is read once per call from an immutable snapshot

pub mod etcd_client;
pub mod response;
pub mod selector;
pub mod transport;

use thiserror::Error;

use crate::config::ConfigError;
use crate::endpoints::{CandidateError, VerificationError};

pub use etcd_client::EtcdClient;
pub use response::{EtcdResponse, RawResponse, ResponseHeaders};
pub use selector::{EndpointSelector, Primary, RoundRobin};
pub use transport::{build_http_client, Transport};

/// Errors raised while building a client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Candidate(#[from] CandidateError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint pool is empty")]
    EmptyPool,
}
