//! Concurrent endpoint liveness probing.
//!
//! Given the candidate URLs advertised for one network, the prober issues a
//! minimal chain-height query to every probe-eligible candidate at once and
//! returns the first URL whose probe settles successfully. This is a race:
//! the winner follows completion order, not list order, and consumers must
//! not depend on a deterministic choice. Losing probes are dropped, which
//! cancels their in-flight requests.

use std::{sync::Arc, time::Duration};

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info};

use crate::{
    catalog::RpcEndpoint,
    types::{JsonRpcRequest, JsonRpcResponse},
    upstream::{
        errors::{ProbeError, TransportError},
        http_client::HttpClient,
    },
};

/// Per-probe timeout. A candidate that has not answered the chain-height
/// query within this window counts as failed.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Races liveness probes across a network's candidate endpoints.
#[derive(Clone)]
pub struct EndpointProber {
    http: Arc<HttpClient>,
    probe_timeout: Duration,
}

impl EndpointProber {
    #[must_use]
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http, probe_timeout: DEFAULT_PROBE_TIMEOUT }
    }

    #[must_use]
    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    /// Resolves one currently-responsive endpoint URL from the candidates.
    ///
    /// All probe-eligible candidates are probed concurrently; the first
    /// success wins. URLs with unresolved template placeholders or streaming
    /// transports are skipped without a request.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::NoWorkingEndpoint`] when no candidate is
    /// probe-eligible, or when every probe fails or exceeds the per-probe
    /// timeout.
    pub async fn resolve(&self, candidates: &[RpcEndpoint]) -> Result<String, ProbeError> {
        let eligible: Vec<&str> = candidates
            .iter()
            .filter(|rpc| rpc.probe_eligible())
            .map(|rpc| rpc.url.as_str())
            .collect();

        if eligible.is_empty() {
            return Err(ProbeError::NoWorkingEndpoint { candidates: 0 });
        }

        let total = eligible.len();
        let mut probes: FuturesUnordered<_> = eligible
            .into_iter()
            .map(|url| {
                let http = Arc::clone(&self.http);
                let probe_timeout = self.probe_timeout;
                async move {
                    let outcome = tokio::time::timeout(
                        probe_timeout,
                        Self::probe_one(&http, url, probe_timeout),
                    )
                    .await
                    .unwrap_or(Err(TransportError::Timeout));
                    (url, outcome)
                }
            })
            .collect();

        while let Some((url, outcome)) = probes.next().await {
            match outcome {
                Ok(()) => {
                    info!(url = url, candidates = total, "endpoint probe succeeded");
                    return Ok(url.to_string());
                }
                Err(e) => {
                    debug!(url = url, error = %e, "endpoint probe failed");
                }
            }
        }

        Err(ProbeError::NoWorkingEndpoint { candidates: total })
    }

    /// One liveness probe: a chain-height query whose reply must be HTTP 2xx
    /// with no JSON-RPC error envelope.
    async fn probe_one(
        http: &HttpClient,
        url: &str,
        timeout: Duration,
    ) -> Result<(), TransportError> {
        let request = JsonRpcRequest::block_number_probe();
        let body = serde_json::to_vec(&request)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let response_bytes = http.send_request(url, bytes::Bytes::from(body), timeout).await?;

        let response: JsonRpcResponse = serde_json::from_slice(&response_bytes)
            .map_err(|e| TransportError::InvalidResponse(format!("invalid JSON: {e}")))?;

        if let Some(error) = response.error {
            return Err(TransportError::RpcError(error.code, error.message));
        }

        Ok(())
    }
}
