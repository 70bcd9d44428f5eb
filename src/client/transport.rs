//! HTTP transport.
//!
//! # Responsibilities
//! - Build the shared `reqwest::Client` from configuration
//! - Send one rendered request to one endpoint
//! - Classify every failure through `error::classify`

use std::time::Duration;

use reqwest::Client;

use crate::client::response::{RawResponse, ResponseHeaders};
use crate::config::ClientConfig;
use crate::endpoints::Endpoint;
use crate::error::classify::{classify_response, classify_transport};
use crate::error::EtcdError;
use crate::requests::{Body, RequestSpec};

const USER_AGENT: &str = concat!("etcd-draft/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by probes and requests.
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_millis(config.timeouts.connect_ms))
        .user_agent(USER_AGENT);
    if !config.transport.system_proxy {
        builder = builder.no_proxy();
    }
    builder.build()
}

#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
}

impl Transport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Send `spec` to `endpoint` using the timeouts and credentials in `config`.
    ///
    /// Long polls are not bounded by the request timeout.
    pub async fn send(
        &self,
        endpoint: &Endpoint,
        spec: &RequestSpec,
        config: &ClientConfig,
        long_poll: bool,
    ) -> Result<RawResponse, EtcdError> {
        let address = endpoint.as_str();
        let url = endpoint
            .candidate()
            .join_segments(spec.segments.iter().map(String::as_str));

        let mut request = self.client.request(spec.method.clone(), url);
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }

        let timeout = if long_poll {
            None
        } else {
            Some(Duration::from_millis(config.timeouts.request_ms))
        };
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        if let Some(creds) = &config.credentials {
            request = request.basic_auth(&creds.username, creds.password.as_ref());
        }

        request = match &spec.body {
            Body::Empty => request,
            Body::Form(fields) => request.form(fields),
            Body::Json(value) => request.json(value),
        };

        let response = request
            .send()
            .await
            .map_err(|e| classify_transport(address, &e, timeout))?;

        let status = response.status();
        let headers = ResponseHeaders::from_map(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport(address, &e, timeout))?;

        if !status.is_success() {
            return Err(classify_response(address, status.as_u16(), &body));
        }

        Ok(RawResponse {
            endpoint: address.to_string(),
            status: status.as_u16(),
            headers,
            body,
        })
    }
}
