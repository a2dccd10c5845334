//! Shared HTTP transport with semaphore-based concurrency control.

use reqwest::{Client, ClientBuilder};
use std::{sync::Arc, time::Duration};
use tokio::sync::Semaphore;

use crate::upstream::errors::TransportError;

/// Configuration for HTTP client concurrency and timeout behavior.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum number of concurrent HTTP requests allowed
    pub concurrent_limit: usize,
    /// Permit acquisition timeout in milliseconds
    pub permit_timeout_ms: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self { concurrent_limit: 256, permit_timeout_ms: 500 }
    }
}

/// HTTP client used for every JSON-RPC POST this crate issues.
///
/// A probing round can fan out to dozens of public endpoints at once, so the
/// client caps in-flight requests with a semaphore. There is no retry logic:
/// redundancy comes from racing candidates, not from retrying one.
pub struct HttpClient {
    client: Client,
    concurrent_limit: Arc<Semaphore>,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Creates a new HTTP client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Creates a new HTTP client with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to build.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .pool_idle_timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent("chainglass/0.1.0")
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build http client");
                TransportError::ConnectionFailed(format!("HTTP client build failed: {e}"))
            })?;

        Ok(Self {
            client,
            concurrent_limit: Arc::new(Semaphore::new(config.concurrent_limit)),
            config,
        })
    }

    /// Sanitizes network errors to prevent information disclosure.
    fn sanitize_network_error(error: &reqwest::Error) -> String {
        if error.is_connect() {
            "connection refused or unreachable".to_string()
        } else if error.is_timeout() {
            "connection timed out".to_string()
        } else if error.is_request() {
            "request failed".to_string()
        } else if error.is_body() {
            "response body error".to_string()
        } else if error.is_decode() {
            "response decode error".to_string()
        } else if error.is_redirect() {
            "too many redirects".to_string()
        } else {
            "network error".to_string()
        }
    }

    /// Sends one HTTP POST with a JSON body and returns the raw response
    /// bytes.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Timeout`] if permit acquisition or the request times out
    /// - [`TransportError::ConcurrencyLimit`] if the semaphore is closed
    /// - [`TransportError::HttpError`] for non-success HTTP status codes
    /// - [`TransportError::ConnectionFailed`] for network-related failures
    pub async fn send_request(
        &self,
        url: &str,
        body: bytes::Bytes,
        timeout: Duration,
    ) -> Result<bytes::Bytes, TransportError> {
        let _permit = tokio::time::timeout(
            Duration::from_millis(self.config.permit_timeout_ms),
            Arc::clone(&self.concurrent_limit).acquire_owned(),
        )
        .await
        .map_err(|_| {
            tracing::warn!(
                url = url,
                available_permits = self.concurrent_limit.available_permits(),
                "http client semaphore acquisition timeout"
            );
            TransportError::Timeout
        })?
        .map_err(|_| TransportError::ConcurrencyLimit(url.to_string()))?;

        let result = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .body(body)
            .timeout(timeout)
            .send()
            .await;

        match result {
            Ok(response) => {
                if response.status().is_success() {
                    return response.bytes().await.map_err(TransportError::Network);
                }

                let status = response.status().as_u16();
                let raw_text = response.text().await.unwrap_or_default();
                let sanitized_text = if raw_text.len() > 256 {
                    format!("{}... (truncated)", &raw_text[..256])
                } else {
                    raw_text
                };
                Err(TransportError::HttpError(status, sanitized_text))
            }
            Err(e) => {
                if e.is_timeout() {
                    return Err(TransportError::Timeout);
                }
                Err(TransportError::ConnectionFailed(Self::sanitize_network_error(&e)))
            }
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn available_permits(&self) -> usize {
        self.concurrent_limit.available_permits()
    }
}
