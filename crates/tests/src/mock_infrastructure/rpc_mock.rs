//! RPC Mock Builder for Ethereum JSON-RPC Testing
//!
//! Wraps mockito to provide Ethereum-specific response builders for the
//! methods the core issues: the liveness probe, balance reads, and
//! transaction/block lookups.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};

/// Builder for creating mock Ethereum RPC responses.
///
/// Uses mockito internally but provides method-specific helpers so tests
/// read as scenarios rather than regex plumbing.
pub struct RpcMockBuilder {
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl RpcMockBuilder {
    /// Creates a new RPC mock builder with a fresh mockito server.
    pub async fn new() -> Self {
        Self { server: Server::new_async().await, mocks: Vec::new() }
    }

    /// Returns the URL of the mock server.
    #[must_use]
    pub fn url(&self) -> String {
        self.server.url()
    }

    fn success_body(result: &Value) -> String {
        json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string()
    }

    fn error_body(code: i64, message: &str) -> String {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": code, "message": message }
        })
        .to_string()
    }

    async fn mock_method(&mut self, method: &str, body: String) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(Matcher::Regex(format!(r#""method"\s*:\s*"{method}""#)))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }

    /// Mocks `eth_blockNumber` (the liveness probe) with a healthy reply.
    pub async fn mock_block_number(&mut self, height: u64) -> &mut Self {
        self.mock_method("eth_blockNumber", Self::success_body(&json!(format!("0x{height:x}"))))
            .await
    }

    /// Mocks `eth_blockNumber` answering with a JSON-RPC error envelope.
    /// The HTTP status is 200; the probe must still treat this as a failure.
    pub async fn mock_block_number_rpc_error(&mut self, code: i64, message: &str) -> &mut Self {
        self.mock_method("eth_blockNumber", Self::error_body(code, message)).await
    }

    /// Mocks `eth_getBalance` with a raw wei quantity.
    pub async fn mock_get_balance(&mut self, wei_hex: &str) -> &mut Self {
        self.mock_method("eth_getBalance", Self::success_body(&json!(wei_hex))).await
    }

    /// Mocks `eth_call` (the ERC-20 `balanceOf` read) with a raw amount,
    /// encoded as the 32-byte word a contract returns.
    pub async fn mock_token_balance(&mut self, raw: u128) -> &mut Self {
        self.mock_method("eth_call", Self::success_body(&json!(format!("0x{raw:064x}")))).await
    }

    /// Mocks `eth_call` answering with a JSON-RPC error envelope.
    pub async fn mock_token_balance_rpc_error(&mut self, code: i64, message: &str) -> &mut Self {
        self.mock_method("eth_call", Self::error_body(code, message)).await
    }

    /// Mocks `eth_getTransactionByHash` for a specific hash.
    pub async fn mock_transaction(&mut self, hash: &str, response: &Value) -> &mut Self {
        let body = Self::success_body(response);
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(Matcher::Regex(format!(
                r#""method"\s*:\s*"eth_getTransactionByHash".*"params"\s*:\s*\["{hash}""#
            )))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }

    /// Mocks `eth_getBlockByNumber` for a specific hex-encoded block number.
    pub async fn mock_block_by_number(&mut self, number_hex: &str, response: &Value) -> &mut Self {
        let body = Self::success_body(response);
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(Matcher::Regex(format!(
                r#""method"\s*:\s*"eth_getBlockByNumber".*"params"\s*:\s*\["{number_hex}",false"#
            )))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }

    /// Mocks `eth_getBlockByHash` for a specific block hash.
    pub async fn mock_block_by_hash(&mut self, hash: &str, response: &Value) -> &mut Self {
        let body = Self::success_body(response);
        let mock = self
            .server
            .mock("POST", "/")
            .match_body(Matcher::Regex(format!(
                r#""method"\s*:\s*"eth_getBlockByHash".*"params"\s*:\s*\["{hash}",false"#
            )))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }

    /// Mocks every POST with an HTTP-level error status.
    pub async fn mock_http_error(&mut self, status: usize) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .with_status(status)
            .with_body("upstream unavailable")
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }

    /// Registers a catch-all expectation that this server receives zero
    /// requests. Verify with [`RpcMockBuilder::assert_all`].
    pub async fn expect_no_requests(&mut self) -> &mut Self {
        let mock = self
            .server
            .mock("POST", "/")
            .expect(0)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;
        self.mocks.push(mock);
        self
    }

    /// Asserts every registered mock's expectations.
    pub async fn assert_all(&self) {
        for mock in &self.mocks {
            mock.assert_async().await;
        }
    }
}
