//! Integration tests for the balance aggregator batch semantics.

use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;
use chainglass_core::balance::{
    AggregateTotal, BalanceAggregator, BalanceError, BalanceResult, NetworkBalance,
};
use chainglass_core::catalog::{NetworkInfo, RpcEndpoint};
use chainglass_core::tokens::TokenSelection;
use chainglass_core::upstream::{EndpointProber, HttpClient};

use crate::mock_infrastructure::{HangingServer, RpcMockBuilder};

const ADDRESS: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

const ONE_ETHER_HEX: &str = "0xde0b6b3a7640000"; // 10^18
const HALF_ETHER: u128 = 500_000_000_000_000_000;

fn network(key: &str, url: String) -> NetworkInfo {
    NetworkInfo {
        key: key.to_string(),
        name: key.to_string(),
        chain_id: 1,
        rpcs: vec![RpcEndpoint::new(url)],
        block_explorer: String::new(),
        native_symbol: Some("ETH".to_string()),
    }
}

fn aggregator() -> BalanceAggregator {
    let http = Arc::new(HttpClient::new().unwrap());
    let prober =
        EndpointProber::new(Arc::clone(&http)).with_probe_timeout(Duration::from_millis(500));
    BalanceAggregator::new(http).with_prober(prober)
}

#[tokio::test]
async fn test_invalid_address_issues_zero_network_calls() {
    let mut server = RpcMockBuilder::new().await;
    server.expect_no_requests().await;

    let net = network("ethereum", server.url());
    let selection = TokenSelection::single("ETH").unwrap();

    let err = aggregator()
        .fetch_balances("0x123", &[&net], &selection)
        .await
        .unwrap_err();

    assert!(matches!(err, BalanceError::InvalidAddress(_)));
    server.assert_all().await;
}

#[tokio::test]
async fn test_single_token_batch_with_totals() {
    let mut first = RpcMockBuilder::new().await;
    first.mock_block_number(100).await.mock_get_balance(ONE_ETHER_HEX).await;

    let mut second = RpcMockBuilder::new().await;
    second
        .mock_block_number(200)
        .await
        .mock_get_balance("0x6f05b59d3b20000") // 0.5 ether
        .await;

    let ethereum = network("ethereum", first.url());
    let sepolia = network("sepolia", second.url());
    let selection = TokenSelection::single("ETH").unwrap();

    let report = aggregator()
        .fetch_balances(ADDRESS, &[&ethereum, &sepolia], &selection)
        .await
        .unwrap();

    let NetworkBalance::Single(BalanceResult::Amount(amount)) = &report.results["ethereum"]
    else {
        panic!("expected an amount for ethereum, got {:?}", report.results["ethereum"]);
    };
    assert_eq!(amount.format(), "1");

    assert!(report.errors.is_empty());
    assert!(report.error_summary().is_none());

    match report.total().unwrap() {
        AggregateTotal::Single { symbol, total } => {
            assert_eq!(symbol, "ETH");
            assert_eq!(total.format(), "1.5");
        }
        AggregateTotal::Pair { .. } => panic!("expected single total"),
    }
}

#[tokio::test]
async fn test_native_token_unavailable_short_circuits() {
    let mut server = RpcMockBuilder::new().await;
    server.expect_no_requests().await;

    // Native currency is not ETH-compatible: no probe, no balance call.
    let mut net = network("polygon", server.url());
    net.native_symbol = Some("POL".to_string());
    let selection = TokenSelection::single("ETH").unwrap();

    let report = aggregator().fetch_balances(ADDRESS, &[&net], &selection).await.unwrap();

    assert_eq!(report.results["polygon"], NetworkBalance::Single(BalanceResult::NotAvailable));
    assert!(report.errors.is_empty());
    assert!(report.total().is_none());
    server.assert_all().await;
}

#[tokio::test]
async fn test_partial_failure_is_isolated() {
    let mut healthy = RpcMockBuilder::new().await;
    healthy.mock_block_number(100).await.mock_get_balance(ONE_ETHER_HEX).await;

    let mut broken = RpcMockBuilder::new().await;
    broken.mock_http_error(503).await;

    let ethereum = network("ethereum", healthy.url());
    let sepolia = network("sepolia", broken.url());
    let selection = TokenSelection::single("ETH").unwrap();

    let report = aggregator()
        .fetch_balances(ADDRESS, &[&ethereum, &sepolia], &selection)
        .await
        .unwrap();

    assert!(matches!(
        &report.results["ethereum"],
        NetworkBalance::Single(BalanceResult::Amount(_))
    ));
    assert!(matches!(
        &report.results["sepolia"],
        NetworkBalance::Single(BalanceResult::Error(_))
    ));

    let summary = report.error_summary().unwrap();
    assert!(summary.contains("sepolia"));
    assert!(!summary.contains("ethereum:"));

    // The failed network never taints the total.
    match report.total().unwrap() {
        AggregateTotal::Single { total, .. } => assert_eq!(total.format(), "1"),
        AggregateTotal::Pair { .. } => panic!("expected single total"),
    }
}

#[tokio::test]
async fn test_pair_fetch_reports_both_halves() {
    let mut server = RpcMockBuilder::new().await;
    server
        .mock_block_number(100)
        .await
        .mock_get_balance(ONE_ETHER_HEX)
        .await
        .mock_token_balance(HALF_ETHER)
        .await;

    let ethereum = network("ethereum", server.url());
    let selection = TokenSelection::pair("ETH", "WETH").unwrap();

    let report = aggregator().fetch_balances(ADDRESS, &[&ethereum], &selection).await.unwrap();

    let NetworkBalance::Pair { first, second } = &report.results["ethereum"] else {
        panic!("expected a pair result");
    };
    let (BalanceResult::Amount(eth), BalanceResult::Amount(weth)) = (first, second) else {
        panic!("expected both halves fetched, got {first:?} / {second:?}");
    };
    assert_eq!(eth.format(), "1");
    assert_eq!(weth.format(), "0.5");

    match report.total().unwrap() {
        AggregateTotal::Pair { first, second, combined, .. } => {
            assert_eq!(first.format(), "1");
            assert_eq!(second.format(), "0.5");
            assert_eq!(combined.format(), "1.5");
        }
        AggregateTotal::Single { .. } => panic!("expected pair total"),
    }
}

#[tokio::test]
async fn test_pair_with_one_failing_half_has_no_combined_total() {
    let mut server = RpcMockBuilder::new().await;
    server
        .mock_block_number(100)
        .await
        .mock_get_balance(ONE_ETHER_HEX)
        .await
        .mock_token_balance_rpc_error(-32000, "execution aborted")
        .await;

    let ethereum = network("ethereum", server.url());
    let selection = TokenSelection::pair("ETH", "WETH").unwrap();

    let report = aggregator().fetch_balances(ADDRESS, &[&ethereum], &selection).await.unwrap();

    let NetworkBalance::Pair { first, second } = &report.results["ethereum"] else {
        panic!("expected a pair result");
    };
    let BalanceResult::Amount(eth) = first else {
        panic!("successful half must report its amount, got {first:?}");
    };
    assert_eq!(eth.format(), "1");
    assert!(second.is_error(), "failing half must be an error marker");

    assert!(
        report.total().is_none(),
        "an errored half must leave the pair total uncomputed"
    );
    assert!(!report.errors.is_empty());
}

#[tokio::test]
async fn test_slow_network_times_out_without_delaying_others() {
    let hanging = HangingServer::start().await.unwrap();

    let mut fast_a = RpcMockBuilder::new().await;
    fast_a.mock_block_number(100).await.mock_get_balance(ONE_ETHER_HEX).await;
    let mut fast_b = RpcMockBuilder::new().await;
    fast_b.mock_block_number(100).await.mock_get_balance(ONE_ETHER_HEX).await;

    let slow = network("ethereum", hanging.url());
    let sepolia = network("sepolia", fast_a.url());
    let holesky = network("holesky", fast_b.url());

    let http = Arc::new(HttpClient::new().unwrap());
    // Probe timeout longer than the network budget: the wall-clock race must
    // fire first and cover endpoint resolution too.
    let prober = EndpointProber::new(Arc::clone(&http)).with_probe_timeout(Duration::from_secs(5));
    let aggregator = BalanceAggregator::new(http)
        .with_prober(prober)
        .with_network_timeout(Duration::from_millis(600));

    let selection = TokenSelection::single("ETH").unwrap();
    let started = std::time::Instant::now();
    let report = aggregator
        .fetch_balances(ADDRESS, &[&slow, &sepolia, &holesky], &selection)
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert!(matches!(
        &report.results["ethereum"],
        NetworkBalance::Single(BalanceResult::Error(message)) if message == "Timeout"
    ));
    assert!(matches!(
        &report.results["sepolia"],
        NetworkBalance::Single(BalanceResult::Amount(_))
    ));
    assert!(matches!(
        &report.results["holesky"],
        NetworkBalance::Single(BalanceResult::Amount(_))
    ));

    assert!(
        elapsed < Duration::from_secs(3),
        "batch must settle near the timeout bound, took {elapsed:?}"
    );

    let summary = report.error_summary().unwrap();
    assert!(summary.contains("ethereum: Timeout"));
}

#[tokio::test]
async fn test_repeated_batches_yield_identical_amounts() {
    let mut server = RpcMockBuilder::new().await;
    server.mock_block_number(100).await.mock_get_balance(ONE_ETHER_HEX).await;

    let ethereum = network("ethereum", server.url());
    let selection = TokenSelection::single("ETH").unwrap();
    let aggregator = aggregator();

    let first = aggregator.fetch_balances(ADDRESS, &[&ethereum], &selection).await.unwrap();
    let second = aggregator.fetch_balances(ADDRESS, &[&ethereum], &selection).await.unwrap();

    // Endpoint choice may vary between runs; the amounts must not.
    let amount = |report: &chainglass_core::balance::BalanceReport| match &report.results
        ["ethereum"]
    {
        NetworkBalance::Single(BalanceResult::Amount(amount)) => amount.raw(),
        other => panic!("expected amount, got {other:?}"),
    };
    assert_eq!(amount(&first), amount(&second));
    assert_eq!(amount(&first), U256::from(1_000_000_000_000_000_000u128));
}

#[tokio::test]
async fn test_erc20_token_unavailable_on_network() {
    let mut server = RpcMockBuilder::new().await;
    server.expect_no_requests().await;

    // USDCe has no contract configured on ethereum.
    let ethereum = network("ethereum", server.url());
    let selection = TokenSelection::single("USDCe").unwrap();

    let report = aggregator().fetch_balances(ADDRESS, &[&ethereum], &selection).await.unwrap();

    assert_eq!(
        report.results["ethereum"],
        NetworkBalance::Single(BalanceResult::NotAvailable)
    );
    server.assert_all().await;
}
