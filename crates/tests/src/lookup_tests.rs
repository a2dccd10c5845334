//! Integration tests for transaction and block lookup dispatch.

use std::sync::Arc;
use std::time::Duration;

use chainglass_core::catalog::{NetworkInfo, RpcEndpoint};
use chainglass_core::lookup::{LookupError, LookupKind, LookupService};
use chainglass_core::upstream::{EndpointProber, HttpClient};
use serde_json::json;

use crate::mock_infrastructure::RpcMockBuilder;

fn network(url: String) -> NetworkInfo {
    NetworkInfo {
        key: "ethereum".to_string(),
        name: "Ethereum".to_string(),
        chain_id: 1,
        rpcs: vec![RpcEndpoint::new(url)],
        block_explorer: "https://etherscan.io/tx/".to_string(),
        native_symbol: Some("ETH".to_string()),
    }
}

fn service() -> LookupService {
    let http = Arc::new(HttpClient::new().unwrap());
    let prober =
        EndpointProber::new(Arc::clone(&http)).with_probe_timeout(Duration::from_millis(500));
    LookupService::new(http).with_prober(prober)
}

fn tx_hash() -> String {
    format!("0x{}", "ab".repeat(32))
}

#[tokio::test]
async fn test_transaction_found() {
    let hash = tx_hash();
    let tx = json!({
        "hash": hash,
        "from": "0x0000000000000000000000000000000000000001",
        "to": "0x0000000000000000000000000000000000000002",
        "value": "0xde0b6b3a7640000",
        "blockNumber": "0x64"
    });

    let mut server = RpcMockBuilder::new().await;
    server.mock_block_number(100).await.mock_transaction(&hash, &tx).await;

    let result = service().lookup_transaction(&network(server.url()), &hash).await.unwrap();
    assert_eq!(result["hash"], hash);
    assert_eq!(result["blockNumber"], "0x64");
}

#[tokio::test]
async fn test_unknown_transaction_is_not_found() {
    let hash = tx_hash();
    let mut server = RpcMockBuilder::new().await;
    server.mock_block_number(100).await.mock_transaction(&hash, &json!(null)).await;

    let err = service().lookup_transaction(&network(server.url()), &hash).await.unwrap_err();
    assert!(matches!(err, LookupError::NotFound(LookupKind::Transaction)));
}

#[tokio::test]
async fn test_decimal_block_number_dispatches_as_hex() {
    // "12345" must reach the node as "0x3039"; the mock only matches that
    // exact parameter encoding.
    let block = json!({
        "number": "0x3039",
        "hash": format!("0x{}", "cd".repeat(32)),
        "timestamp": "0x5f5e100",
        "transactions": []
    });

    let mut server = RpcMockBuilder::new().await;
    server.mock_block_number(100).await.mock_block_by_number("0x3039", &block).await;

    let result = service().lookup_block(&network(server.url()), "12345").await.unwrap();
    assert_eq!(result["number"], "0x3039");
}

#[tokio::test]
async fn test_hash_prefixed_value_dispatches_by_hash() {
    let hash = format!("0x{}", "cd".repeat(32));
    let block = json!({ "number": "0x64", "hash": hash, "transactions": [] });

    let mut server = RpcMockBuilder::new().await;
    server.mock_block_number(100).await.mock_block_by_hash(&hash, &block).await;

    let result = service().lookup_block(&network(server.url()), &hash).await.unwrap();
    assert_eq!(result["hash"], hash);
}

#[tokio::test]
async fn test_unknown_block_is_not_found() {
    let mut server = RpcMockBuilder::new().await;
    server.mock_block_number(100).await.mock_block_by_number("0x3039", &json!(null)).await;

    let err = service().lookup_block(&network(server.url()), "12345").await.unwrap_err();
    assert!(matches!(err, LookupError::NotFound(LookupKind::Block)));
}

#[tokio::test]
async fn test_invalid_inputs_issue_zero_requests() {
    let mut server = RpcMockBuilder::new().await;
    server.expect_no_requests().await;
    let net = network(server.url());

    let err = service().lookup_transaction(&net, "0x1234").await.unwrap_err();
    assert!(matches!(err, LookupError::InvalidInput(_)));

    let err = service().lookup_block(&net, "not-a-block").await.unwrap_err();
    assert!(matches!(err, LookupError::InvalidInput(_)));

    server.assert_all().await;
}

#[tokio::test]
async fn test_transport_failure_classified() {
    let mut server = RpcMockBuilder::new().await;
    server.mock_http_error(503).await;

    let err = service().lookup_transaction(&network(server.url()), &tx_hash()).await.unwrap_err();
    // The probe fails first: the network has no working endpoint.
    assert!(matches!(err, LookupError::NoWorkingEndpoint(_)));
}
