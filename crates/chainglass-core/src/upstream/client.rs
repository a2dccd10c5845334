//! JSON-RPC client facade bound to one resolved endpoint.
//!
//! A thin capability over the shared [`HttpClient`]: native and ERC-20
//! balance reads, transaction lookup, and block lookup by hash or number.
//! The facade keeps no state between calls beyond the bound URL.

use std::{sync::Arc, time::Duration};

use alloy_primitives::{Address, U256};
use serde_json::{json, Value};

use crate::{
    types::{Hash32, JsonRpcRequest, JsonRpcResponse},
    upstream::{
        errors::{BlockIdError, ClientError, TransportError},
        http_client::HttpClient,
    },
};

/// Function selector for the minimal ERC-20 read interface:
/// `balanceOf(address)`.
const BALANCE_OF_SELECTOR: &str = "70a08231";

/// Block identifier accepted by the block lookup: a `0x`-prefixed hash or a
/// base-10 block number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockId {
    Hash(String),
    Number(u64),
}

impl BlockId {
    /// Disambiguates a raw search string.
    ///
    /// A string beginning with the `0x` hex prefix is treated as a block
    /// hash; anything else must parse as a base-10 block number.
    ///
    /// # Errors
    /// Returns [`BlockIdError::InvalidBlockIdentifier`] for non-numeric,
    /// non-prefixed input.
    pub fn parse(input: &str) -> Result<Self, BlockIdError> {
        if input.starts_with("0x") {
            return Ok(Self::Hash(input.to_string()));
        }
        input
            .parse::<u64>()
            .map(Self::Number)
            .map_err(|_| BlockIdError::InvalidBlockIdentifier(input.to_string()))
    }

    /// The canonical JSON-RPC parameter encoding: the hash verbatim, or the
    /// hex-encoded block number (`12345` becomes `"0x3039"`).
    #[must_use]
    pub fn to_param(&self) -> String {
        match self {
            Self::Hash(hash) => hash.clone(),
            Self::Number(number) => format!("0x{number:x}"),
        }
    }
}

/// Client facade bound to one resolved endpoint URL.
pub struct ChainClient {
    url: String,
    http: Arc<HttpClient>,
}

impl ChainClient {
    #[must_use]
    pub fn new(url: impl Into<String>, http: Arc<HttpClient>) -> Self {
        Self { url: url.into(), http }
    }

    /// The endpoint URL this client is bound to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the timeout duration for a given RPC method.
    ///
    /// Fast methods like `eth_blockNumber` get 5s, standard queries get 10s.
    fn timeout_for_method(method: &str) -> Duration {
        match method {
            "eth_blockNumber" | "eth_chainId" | "eth_gasPrice" => Duration::from_secs(5),
            _ => Duration::from_secs(10),
        }
    }

    /// Sends one JSON-RPC call and returns the raw `result` value.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::RpcError`] when the provider answers with an
    /// error envelope, [`TransportError::InvalidResponse`] when the body is
    /// not a JSON-RPC response, and the underlying transport errors
    /// otherwise.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        let request = JsonRpcRequest::new(method, Some(params), json!(1));
        let body = serde_json::to_vec(&request)
            .map_err(|e| TransportError::InvalidRequest(format!("failed to serialize: {e}")))?;

        let response_bytes = self
            .http
            .send_request(&self.url, bytes::Bytes::from(body), Self::timeout_for_method(method))
            .await?;

        let response: JsonRpcResponse = serde_json::from_slice(&response_bytes)
            .map_err(|e| TransportError::InvalidResponse(format!("invalid JSON: {e}")))?;

        if let Some(error) = response.error {
            return Err(TransportError::RpcError(error.code, error.message));
        }

        Ok(response.result.unwrap_or(Value::Null))
    }

    /// Fetches the native-currency balance of `address` in its smallest unit.
    ///
    /// # Errors
    /// Returns a [`TransportError`] wrapped in [`ClientError`] on network or
    /// protocol failure.
    pub async fn get_native_balance(&self, address: &Address) -> Result<U256, ClientError> {
        let result = self
            .call("eth_getBalance", json!([address.to_checksum(None), "latest"]))
            .await?;
        let balance = decode_quantity(&result).map_err(TransportError::InvalidResponse)?;
        Ok(balance)
    }

    /// Fetches an ERC-20 balance via a read-only `balanceOf(address)` call
    /// against `contract`.
    ///
    /// # Errors
    /// Returns [`ClientError::ContractCall`] when the return data cannot be
    /// decoded (including empty return data from an address with no code),
    /// and a transport error otherwise.
    pub async fn get_token_balance(
        &self,
        contract: &Address,
        owner: &Address,
    ) -> Result<U256, ClientError> {
        let data = format!(
            "0x{BALANCE_OF_SELECTOR}000000000000000000000000{}",
            hex::encode(owner.as_slice())
        );
        let params = json!([{ "to": contract.to_checksum(None), "data": data }, "latest"]);

        let result = self.call("eth_call", params).await?;
        decode_quantity(&result).map_err(ClientError::ContractCall)
    }

    /// Fetches a transaction by hash. A JSON `null` result (unknown hash)
    /// maps to `None`.
    ///
    /// # Errors
    /// Returns a transport error on network or protocol failure.
    pub async fn get_transaction(&self, hash: &Hash32) -> Result<Option<Value>, ClientError> {
        let result = self.call("eth_getTransactionByHash", json!([hash.to_string()])).await?;
        Ok(non_null(result))
    }

    /// Fetches a block by hash or number, transaction bodies omitted.
    /// A JSON `null` result (unknown block) maps to `None`.
    ///
    /// # Errors
    /// Returns a transport error on network or protocol failure.
    pub async fn get_block(&self, id: &BlockId) -> Result<Option<Value>, ClientError> {
        let method = match id {
            BlockId::Hash(_) => "eth_getBlockByHash",
            BlockId::Number(_) => "eth_getBlockByNumber",
        };
        let result = self.call(method, json!([id.to_param(), false])).await?;
        Ok(non_null(result))
    }
}

fn non_null(value: Value) -> Option<Value> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}

/// Decodes a hex-quantity JSON-RPC result (`"0x..."`) into a `U256`.
///
/// Accepts both minimal quantities (`"0x1f"`) and the 32-byte left-padded
/// words `eth_call` returns. Empty return data (`"0x"`) is an error: a
/// `balanceOf` call must yield one word.
fn decode_quantity(value: &Value) -> Result<U256, String> {
    let text = value.as_str().ok_or_else(|| format!("expected hex string, got {value}"))?;
    let digits = text.strip_prefix("0x").ok_or_else(|| format!("missing 0x prefix: {text}"))?;

    if digits.is_empty() {
        return Err("empty return data".to_string());
    }
    if digits.len() > 64 {
        return Err(format!("return data too long: {} hex digits", digits.len()));
    }

    U256::from_str_radix(digits, 16).map_err(|e| format!("invalid hex quantity: {e}"))
}
