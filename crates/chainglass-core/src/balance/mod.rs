//! Batch balance aggregation across networks.
//!
//! One user action triggers one batch: for every selected network, resolve a
//! working endpoint, fetch the selected token balance (or both halves of a
//! combinable pair), and fold the outcomes into a [`BalanceReport`]. Each
//! network runs independently and concurrently under its own wall-clock
//! timeout; a failure on one network never taints another. Totals are
//! computed on demand from the raw integer amounts.

pub mod amount;

pub use amount::{AmountError, TokenAmount};

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use alloy_primitives::{Address, U256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    catalog::NetworkInfo,
    tokens::{is_eth_compatible_symbol, TokenInfo, TokenSelection},
    upstream::{client::ChainClient, http_client::HttpClient, prober::EndpointProber, ClientError},
};

/// Wall-clock budget for one network's whole fetch: endpoint resolution plus
/// the balance call(s).
pub const NETWORK_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that abort a batch before any network activity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Outcome of one balance fetch for one token on one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceResult {
    /// The fetched raw amount at the token's native precision.
    Amount(TokenAmount),
    /// The token has no contract on this network, or the network's native
    /// currency is not compatible. No call was attempted.
    NotAvailable,
    /// The fetch failed; the message is shown in place of a balance.
    Error(String),
}

impl BalanceResult {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    #[must_use]
    pub fn is_amount(&self) -> bool {
        matches!(self, Self::Amount(_))
    }

    fn amount_or_zero(&self, decimals: u8) -> TokenAmount {
        match self {
            Self::Amount(amount) => *amount,
            Self::NotAvailable | Self::Error(_) => TokenAmount::zero(decimals),
        }
    }
}

/// Per-network result: one balance in single mode, both halves in pair mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkBalance {
    Single(BalanceResult),
    Pair { first: BalanceResult, second: BalanceResult },
}

impl NetworkBalance {
    fn error_messages(&self) -> Vec<&str> {
        let halves: Vec<&BalanceResult> = match self {
            Self::Single(result) => vec![result],
            Self::Pair { first, second } => vec![first, second],
        };
        halves
            .into_iter()
            .filter_map(|result| match result {
                BalanceResult::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Grand total for one batch, derived on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateTotal {
    Single {
        symbol: &'static str,
        total: TokenAmount,
    },
    Pair {
        first_symbol: &'static str,
        second_symbol: &'static str,
        first: TokenAmount,
        second: TokenAmount,
        combined: TokenAmount,
    },
}

/// Everything one fetch batch produced. Replaced wholesale by the next batch.
#[derive(Debug, Clone)]
pub struct BalanceReport {
    pub selection: TokenSelection,
    /// Per-network outcomes, keyed by network key.
    pub results: BTreeMap<String, NetworkBalance>,
    /// Per-network error messages, in settlement order.
    pub errors: Vec<String>,
}

impl BalanceReport {
    /// Joins the per-network errors into one human-readable summary,
    /// supplementing (not replacing) the inline markers.
    #[must_use]
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(format!(
            "Failed to fetch balances for some networks: {}",
            self.errors.join(", ")
        ))
    }

    /// Computes the grand total across all networks as exact scaled integers.
    ///
    /// Single mode sums every `Amount` result, skipping errors and
    /// unavailable networks. Pair mode sums a network only when neither half
    /// errored (an unavailable half contributes zero). Returns `None` when
    /// nothing summable was fetched.
    #[must_use]
    pub fn total(&self) -> Option<AggregateTotal> {
        let decimals = self.selection.decimals();
        match &self.selection {
            TokenSelection::Single(token) => {
                let mut total = TokenAmount::zero(decimals);
                let mut has_valid = false;
                for balance in self.results.values() {
                    if let NetworkBalance::Single(BalanceResult::Amount(amount)) = balance {
                        total = add_saturating(total, *amount);
                        has_valid = true;
                    }
                }
                has_valid.then_some(AggregateTotal::Single { symbol: token.symbol, total })
            }
            TokenSelection::Pair(first_token, second_token) => {
                let mut first_total = TokenAmount::zero(decimals);
                let mut second_total = TokenAmount::zero(decimals);
                let mut has_valid = false;
                for balance in self.results.values() {
                    let NetworkBalance::Pair { first, second } = balance else {
                        continue;
                    };
                    if first.is_error() || second.is_error() {
                        continue;
                    }
                    first_total = add_saturating(first_total, first.amount_or_zero(decimals));
                    second_total = add_saturating(second_total, second.amount_or_zero(decimals));
                    has_valid |= first.is_amount() || second.is_amount();
                }
                has_valid.then(|| AggregateTotal::Pair {
                    first_symbol: first_token.symbol,
                    second_symbol: second_token.symbol,
                    first: first_total,
                    second: second_total,
                    combined: add_saturating(first_total, second_total),
                })
            }
        }
    }
}

fn add_saturating(a: TokenAmount, b: TokenAmount) -> TokenAmount {
    a.checked_add(&b)
        .unwrap_or_else(|_| TokenAmount::new(U256::MAX, a.decimals()))
}

/// Orchestrates one balance batch: per-network endpoint resolution plus
/// balance fetches, concurrent and independently timed out.
pub struct BalanceAggregator {
    http: Arc<HttpClient>,
    prober: EndpointProber,
    network_timeout: Duration,
}

impl BalanceAggregator {
    #[must_use]
    pub fn new(http: Arc<HttpClient>) -> Self {
        let prober = EndpointProber::new(Arc::clone(&http));
        Self { http, prober, network_timeout: NETWORK_FETCH_TIMEOUT }
    }

    #[must_use]
    pub fn with_prober(mut self, prober: EndpointProber) -> Self {
        self.prober = prober;
        self
    }

    #[must_use]
    pub fn with_network_timeout(mut self, network_timeout: Duration) -> Self {
        self.network_timeout = network_timeout;
        self
    }

    /// Runs one fetch batch.
    ///
    /// The address is validated before any network activity; everything after
    /// that is per-network and failure-isolated. The batch waits for every
    /// network to settle and never short-circuits on a failure.
    ///
    /// # Errors
    ///
    /// Returns [`BalanceError::InvalidAddress`] (and performs zero network
    /// calls) when the address fails format or checksum validation.
    pub async fn fetch_balances(
        &self,
        address_input: &str,
        networks: &[&NetworkInfo],
        selection: &TokenSelection,
    ) -> Result<BalanceReport, BalanceError> {
        let address = validate_address(address_input)?;

        let fetches = networks.iter().map(|network| async move {
            let outcome = tokio::time::timeout(
                self.network_timeout,
                self.fetch_network(network, &address, selection),
            )
            .await
            .unwrap_or_else(|_| {
                warn!(network = %network.key, "balance fetch timed out");
                Err("Timeout".to_string())
            });
            (network.key.clone(), outcome)
        });

        let settled = futures::future::join_all(fetches).await;

        let mut results = BTreeMap::new();
        let mut errors = Vec::new();
        for (key, outcome) in settled {
            match outcome {
                Ok(balance) => {
                    for message in balance.error_messages() {
                        errors.push(format!("{key}: {message}"));
                    }
                    results.insert(key, balance);
                }
                Err(message) => {
                    errors.push(format!("{key}: {message}"));
                    results.insert(key, whole_network_error(selection, message));
                }
            }
        }

        Ok(BalanceReport { selection: selection.clone(), results, errors })
    }

    /// Fetches one network's balance(s): endpoint resolution, then the call
    /// or calls. An `Err` here means the whole network failed (no endpoint,
    /// or a single-mode fetch error); pair halves fold their own failures.
    async fn fetch_network(
        &self,
        network: &NetworkInfo,
        address: &Address,
        selection: &TokenSelection,
    ) -> Result<NetworkBalance, String> {
        match selection {
            TokenSelection::Single(token) => {
                if !token_available(token, network) {
                    debug!(network = %network.key, token = token.symbol, "token not available");
                    return Ok(NetworkBalance::Single(BalanceResult::NotAvailable));
                }

                let url = self.prober.resolve(&network.rpcs).await.map_err(|e| e.to_string())?;
                let client = ChainClient::new(url, Arc::clone(&self.http));

                let amount = fetch_token(&client, token, address, network)
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(NetworkBalance::Single(BalanceResult::Amount(amount)))
            }
            TokenSelection::Pair(first_token, second_token) => {
                let url = self.prober.resolve(&network.rpcs).await.map_err(|e| e.to_string())?;
                let client = ChainClient::new(url, Arc::clone(&self.http));

                let (first, second) = tokio::join!(
                    fetch_half(&client, first_token, address, network),
                    fetch_half(&client, second_token, address, network),
                );
                Ok(NetworkBalance::Pair { first, second })
            }
        }
    }
}

/// One half of a pair fetch: failures stay inside the half's result.
async fn fetch_half(
    client: &ChainClient,
    token: &TokenInfo,
    address: &Address,
    network: &NetworkInfo,
) -> BalanceResult {
    if !token_available(token, network) {
        return BalanceResult::NotAvailable;
    }
    match fetch_token(client, token, address, network).await {
        Ok(amount) => BalanceResult::Amount(amount),
        Err(e) => {
            warn!(
                network = %network.key,
                token = token.symbol,
                error = %e,
                "balance fetch failed"
            );
            BalanceResult::Error(format!("{}: {e}", token.symbol))
        }
    }
}

async fn fetch_token(
    client: &ChainClient,
    token: &TokenInfo,
    address: &Address,
    network: &NetworkInfo,
) -> Result<TokenAmount, ClientError> {
    let raw = if token.is_native() {
        client.get_native_balance(address).await?
    } else {
        let Some(contract_str) = token.contract_address(&network.key) else {
            return Err(ClientError::ContractCall(format!(
                "{} has no contract on {}",
                token.symbol, network.key
            )));
        };
        let contract: Address = contract_str
            .parse()
            .map_err(|e| ClientError::ContractCall(format!("bad contract address: {e}")))?;
        client.get_token_balance(&contract, address).await?
    };
    Ok(TokenAmount::new(raw, token.decimals))
}

/// Whether a token can be fetched on a network at all. `false` short-circuits
/// to `NotAvailable` with no network call.
fn token_available(token: &TokenInfo, network: &NetworkInfo) -> bool {
    if token.is_native() {
        network
            .native_symbol
            .as_deref()
            .is_some_and(is_eth_compatible_symbol)
    } else {
        token.contract_address(&network.key).is_some()
    }
}

fn whole_network_error(selection: &TokenSelection, message: String) -> NetworkBalance {
    match selection {
        TokenSelection::Single(_) => NetworkBalance::Single(BalanceResult::Error(message)),
        TokenSelection::Pair(_, _) => NetworkBalance::Pair {
            first: BalanceResult::Error(message.clone()),
            second: BalanceResult::Error(message),
        },
    }
}

/// Validates an account address before any network call.
///
/// Requires `0x` plus 40 hex digits. Mixed-case input must match its EIP-55
/// checksum; all-lowercase and all-uppercase forms are accepted unchecked.
fn validate_address(input: &str) -> Result<Address, BalanceError> {
    let digits = input
        .strip_prefix("0x")
        .ok_or_else(|| BalanceError::InvalidAddress(input.to_string()))?;
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BalanceError::InvalidAddress(input.to_string()));
    }

    let address: Address = input
        .parse()
        .map_err(|_| BalanceError::InvalidAddress(input.to_string()))?;

    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    if has_upper && has_lower && address.to_checksum(None) != input {
        return Err(BalanceError::InvalidAddress(input.to_string()));
    }

    Ok(address)
}
