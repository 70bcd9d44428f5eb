//! Response envelope and cluster metadata headers.

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::EtcdError;

pub const HEADER_CLUSTER_ID: &str = "X-Etcd-Cluster-Id";
pub const HEADER_ETCD_INDEX: &str = "X-Etcd-Index";
pub const HEADER_RAFT_INDEX: &str = "X-Raft-Index";
pub const HEADER_RAFT_TERM: &str = "X-Raft-Term";

/// Cluster metadata attached to every response.
/// Missing or unparsable headers are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResponseHeaders {
    pub cluster_id: Option<String>,
    pub etcd_index: Option<u64>,
    pub raft_index: Option<u64>,
    pub raft_term: Option<u64>,
}

impl ResponseHeaders {
    pub fn from_map(headers: &HeaderMap) -> Self {
        let text = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };
        let number = |name: &str| text(name).and_then(|v| v.parse::<u64>().ok());

        Self {
            cluster_id: text(HEADER_CLUSTER_ID).map(str::to_string),
            etcd_index: number(HEADER_ETCD_INDEX),
            raft_index: number(HEADER_RAFT_INDEX),
            raft_term: number(HEADER_RAFT_TERM),
        }
    }
}

/// A successful (2xx) response before decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Address of the endpoint that answered.
    pub endpoint: String,
    pub status: u16,
    pub headers: ResponseHeaders,
    pub body: String,
}

impl RawResponse {
    /// Decode the JSON body; failures are `MalformedResponse`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<EtcdResponse<T>, EtcdError> {
        let value = serde_json::from_str(&self.body).map_err(|e| {
            EtcdError::malformed(&self.endpoint, Some(self.status), format!("cannot decode body: {e}"))
        })?;
        Ok(EtcdResponse {
            headers: self.headers,
            value,
        })
    }

    /// Keep only the metadata, for operations answered with an empty body.
    pub fn discard_body(self) -> EtcdResponse<()> {
        EtcdResponse {
            headers: self.headers,
            value: (),
        }
    }
}

/// Decoded value plus the cluster metadata it was served with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EtcdResponse<T> {
    pub headers: ResponseHeaders,
    pub value: T,
}

impl<T> EtcdResponse<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}
