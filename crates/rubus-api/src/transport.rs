// HTTP transport for the ubus JSON-RPC bridge
//
// One POST per send; no retries and no timeout policy beyond what the
// `TransportConfig` carries. Retry/backoff belongs to callers.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::rpc::RpcResponse;

/// Transport configuration for building the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout; a timeout surfaces as [`Error::Transport`].
    pub timeout: Duration,
    /// Verify TLS certificates. Routers commonly serve the bridge over
    /// plain HTTP or a self-signed cert, so this defaults to `false`.
    pub verify_tls: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            verify_tls: false,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("rubus/", env!("CARGO_PKG_VERSION")));

        if !self.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(Error::Transport)
    }
}

/// Stateless sender for single and batched JSON-RPC requests.
///
/// Owns nothing beyond the HTTP client handle and the `/ubus` endpoint URL;
/// session state lives in [`crate::client::UbusClient`].
pub struct Transport {
    http: reqwest::Client,
    endpoint: Url,
}

impl Transport {
    /// Create a transport for the given endpoint, e.g.
    /// `http://192.168.1.1/ubus`.
    pub fn new(endpoint: Url, config: &TransportConfig) -> Result<Self, Error> {
        let http = config.build_client()?;
        Ok(Self { http, endpoint })
    }

    /// Create a transport with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// The ubus endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Send one JSON-RPC envelope and deserialize the response object.
    pub async fn send(&self, envelope: &Value) -> Result<RpcResponse, Error> {
        let body = self.post(envelope).await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Send a JSON array of envelopes and deserialize the response array.
    ///
    /// Responses are index-aligned with the request array. Some firmwares
    /// degrade a failed batch to a single bare object (typically a
    /// permission error); that object is surfaced as a one-element vec for
    /// the caller to interpret.
    pub async fn send_batch(&self, envelopes: &[Value]) -> Result<Vec<RpcResponse>, Error> {
        let body = self.post(&Value::Array(envelopes.to_vec())).await?;

        if let Ok(responses) = serde_json::from_str::<Vec<RpcResponse>>(&body) {
            return Ok(responses);
        }

        let single: RpcResponse =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })?;
        debug!("batch response degraded to a single object");
        Ok(vec![single])
    }

    /// POST a JSON body to the endpoint and return the raw response text.
    async fn post(&self, body: &Value) -> Result<String, Error> {
        trace!(endpoint = %self.endpoint, "POST {body}");

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
            });
        }

        resp.text().await.map_err(Error::Transport)
    }
}
