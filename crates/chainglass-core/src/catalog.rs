//! Network reference-data catalogue.
//!
//! Merges the static reference sources (chain-id table, primary chain list,
//! supplementary RPC list, priority ordering, exclusion list) into one
//! immutable [`NetworkCatalog`]: network key to display name, chain id,
//! candidate RPC URLs, and block-explorer URL.
//!
//! The loader never fails: unparseable core sources degrade to a minimal
//! built-in catalogue so the tools stay usable, and two testnets (Sepolia,
//! Holesky) are injected from hard-coded entries to guard against upstream
//! data-source drift. Pure data transform, no network I/O.

use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// One candidate RPC endpoint for a network.
///
/// The supplementary source may tag endpoints with a tracking/privacy
/// classification; the tag is preserved for display but never consulted
/// during endpoint selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcEndpoint {
    pub url: String,
    pub tracking: Option<String>,
}

impl RpcEndpoint {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), tracking: None }
    }

    /// Whether this URL may be probed.
    ///
    /// URLs carrying an unresolved `${...}` template placeholder (API-key
    /// substitution) or using a streaming transport are excluded from probing
    /// but retained for informational display.
    #[must_use]
    pub fn probe_eligible(&self) -> bool {
        !self.url.contains("${") && !self.url.starts_with("wss://")
    }
}

/// Immutable descriptor for one network, built once at load time.
#[derive(Debug, Clone)]
pub struct NetworkInfo {
    /// Stable short identifier, e.g. `"ethereum"`.
    pub key: String,
    /// Human-readable display name, e.g. `"Ethereum"`.
    pub name: String,
    pub chain_id: u64,
    /// Candidate endpoints, probe-ineligible URLs included.
    pub rpcs: Vec<RpcEndpoint>,
    /// Base URL for linking transactions on the network's block explorer.
    pub block_explorer: String,
    /// Native-currency ticker from the primary chain list, when known.
    pub native_symbol: Option<String>,
}

impl NetworkInfo {
    /// The subset of candidate endpoints eligible for liveness probing.
    #[must_use]
    pub fn probe_candidates(&self) -> Vec<&RpcEndpoint> {
        self.rpcs.iter().filter(|rpc| rpc.probe_eligible()).collect()
    }
}

/// The five static JSON documents the loader consumes.
///
/// All are externally supplied reference data, read once at startup. The
/// ordering and exclusion documents affect display only; the other three
/// define the catalogue itself.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSources {
    /// Chain-id to network-key table: `{"1": "ethereum", ...}`.
    pub chain_ids: String,
    /// Primary chain list: `[{"chainId": 1, "rpc": [...], "nativeCurrency": {"symbol": "ETH"}}]`.
    pub chains: String,
    /// Supplementary RPC list: `{"1": {"rpcs": ["url" | {"url": ..., "tracking": ...}]}}`.
    pub extra_rpcs: String,
    /// Priority ordering: `{"priorityNetworks": ["ethereum", ...]}`.
    pub priorities: String,
    /// Exclusions: `{"excludedNetworks": [...]}`.
    pub exclusions: String,
}

#[derive(Debug, Deserialize)]
struct ChainEntry {
    #[serde(rename = "chainId")]
    chain_id: u64,
    #[serde(default)]
    rpc: Vec<serde_json::Value>,
    #[serde(rename = "nativeCurrency", default)]
    native_currency: Option<NativeCurrency>,
}

#[derive(Debug, Deserialize)]
struct NativeCurrency {
    #[serde(default)]
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct ExtraRpcEntry {
    #[serde(default)]
    rpcs: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PriorityDoc {
    #[serde(rename = "priorityNetworks", default)]
    priority_networks: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ExclusionDoc {
    #[serde(rename = "excludedNetworks", default)]
    excluded_networks: Vec<String>,
}

/// Priority ordering applied when the ordering document is missing or broken.
const DEFAULT_PRIORITY_NETWORKS: &[&str] =
    &["ethereum", "sepolia", "holesky", "arbitrum", "optimism", "polygon", "base"];

/// The read-only network catalogue shared by the aggregator and lookup
/// services. Built once from the static sources, never mutated.
#[derive(Debug, Clone)]
pub struct NetworkCatalog {
    networks: HashMap<String, NetworkInfo>,
    display_order: Vec<String>,
}

impl NetworkCatalog {
    /// Builds the catalogue from the static reference sources.
    ///
    /// Infallible by design: if any of the three core documents is
    /// unparseable the minimal built-in catalogue is returned instead, so a
    /// broken upstream data file degrades the tools rather than breaking
    /// them.
    #[must_use]
    pub fn load(sources: &ReferenceSources) -> Self {
        match Self::try_load(sources) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "reference data unparseable, using fallback catalogue");
                Self::fallback()
            }
        }
    }

    fn try_load(sources: &ReferenceSources) -> Result<Self, serde_json::Error> {
        let chain_ids: HashMap<String, String> = serde_json::from_str(&sources.chain_ids)?;
        let chains: Vec<ChainEntry> = serde_json::from_str(&sources.chains)?;
        let extra_rpcs: HashMap<String, ExtraRpcEntry> = serde_json::from_str(&sources.extra_rpcs)?;

        let priorities = parse_priorities(&sources.priorities);
        let exclusions = parse_exclusions(&sources.exclusions);
        let explorers = explorer_table(&chain_ids);

        let mut networks: HashMap<String, NetworkInfo> = HashMap::new();

        // Guaranteed testnet entries, present even if the merged sources drop them.
        for pinned in [sepolia_entry(), holesky_entry()] {
            networks.insert(pinned.key.clone(), pinned);
        }

        // Primary chain list.
        for chain in &chains {
            let Some(key) = chain_ids.get(&chain.chain_id.to_string()) else {
                continue;
            };
            let urls: Vec<String> = chain
                .rpc
                .iter()
                .filter_map(|value| value.as_str().map(str::to_string))
                .collect();
            if urls.is_empty() {
                continue;
            }

            let entry = networks.entry(key.clone()).or_insert_with(|| NetworkInfo {
                key: key.clone(),
                name: display_name_for_key(key),
                chain_id: chain.chain_id,
                rpcs: Vec::new(),
                block_explorer: explorers.get(key).cloned().unwrap_or_default(),
                native_symbol: None,
            });
            if entry.native_symbol.is_none() {
                entry.native_symbol =
                    chain.native_currency.as_ref().map(|currency| currency.symbol.clone());
            }
            for url in urls {
                merge_url(&mut entry.rpcs, RpcEndpoint::new(url));
            }
        }

        // Supplementary list; richer entries may carry a tracking tag.
        for (chain_id, extra) in &extra_rpcs {
            let Some(key) = chain_ids.get(chain_id) else {
                continue;
            };
            let endpoints: Vec<RpcEndpoint> = extra
                .rpcs
                .iter()
                .filter_map(|value| match value {
                    serde_json::Value::String(url) => Some(RpcEndpoint::new(url.clone())),
                    serde_json::Value::Object(obj) => {
                        obj.get("url").and_then(|u| u.as_str()).map(|url| RpcEndpoint {
                            url: url.to_string(),
                            tracking: obj
                                .get("tracking")
                                .and_then(|t| t.as_str())
                                .map(str::to_string),
                        })
                    }
                    _ => None,
                })
                .collect();
            if endpoints.is_empty() {
                continue;
            }

            let chain_id_num = chain_id.parse::<u64>().unwrap_or_default();
            let entry = networks.entry(key.clone()).or_insert_with(|| NetworkInfo {
                key: key.clone(),
                name: display_name_for_key(key),
                chain_id: chain_id_num,
                rpcs: Vec::new(),
                block_explorer: explorers.get(key).cloned().unwrap_or_default(),
                native_symbol: None,
            });
            for endpoint in endpoints {
                merge_url(&mut entry.rpcs, endpoint);
            }
        }

        let display_order = ordered_keys(&chain_ids, &priorities, &exclusions);

        Ok(Self { networks, display_order })
    }

    /// Minimal built-in catalogue used when the reference sources are broken.
    #[must_use]
    pub fn fallback() -> Self {
        let mut networks = HashMap::new();
        let ethereum = NetworkInfo {
            key: "ethereum".to_string(),
            name: "Ethereum".to_string(),
            chain_id: 1,
            rpcs: vec![
                RpcEndpoint::new("https://eth.llamarpc.com"),
                RpcEndpoint::new("https://cloudflare-eth.com"),
            ],
            block_explorer: "https://etherscan.io/tx/".to_string(),
            native_symbol: Some("ETH".to_string()),
        };
        networks.insert(ethereum.key.clone(), ethereum);
        for pinned in [sepolia_entry(), holesky_entry()] {
            networks.insert(pinned.key.clone(), pinned);
        }

        Self {
            networks,
            display_order: vec![
                "ethereum".to_string(),
                "sepolia".to_string(),
                "holesky".to_string(),
            ],
        }
    }

    /// Looks up one network by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&NetworkInfo> {
        self.networks.get(key)
    }

    /// Network keys in display order: priority networks first, the remainder
    /// alphabetical, exclusions removed.
    #[must_use]
    pub fn display_order(&self) -> &[String] {
        &self.display_order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

/// Appends `endpoint` unless the URL is already present (duplicates from the
/// two sources collapse; the first occurrence keeps its tracking tag).
fn merge_url(rpcs: &mut Vec<RpcEndpoint>, endpoint: RpcEndpoint) {
    if !rpcs.iter().any(|existing| existing.url == endpoint.url) {
        rpcs.push(endpoint);
    }
}

fn parse_priorities(doc: &str) -> Vec<String> {
    match serde_json::from_str::<PriorityDoc>(doc) {
        Ok(parsed) if !parsed.priority_networks.is_empty() => parsed.priority_networks,
        _ => DEFAULT_PRIORITY_NETWORKS.iter().map(|s| (*s).to_string()).collect(),
    }
}

fn parse_exclusions(doc: &str) -> BTreeSet<String> {
    serde_json::from_str::<ExclusionDoc>(doc)
        .map(|parsed| parsed.excluded_networks.into_iter().collect())
        .unwrap_or_default()
}

fn ordered_keys(
    chain_ids: &HashMap<String, String>,
    priorities: &[String],
    exclusions: &BTreeSet<String>,
) -> Vec<String> {
    let mut all: BTreeSet<String> = chain_ids.values().cloned().collect();
    all.insert("sepolia".to_string());
    all.insert("holesky".to_string());

    let mut ordered: Vec<String> = priorities
        .iter()
        .filter(|key| all.contains(*key))
        .cloned()
        .collect();
    // BTreeSet iteration keeps the remainder alphabetical.
    ordered.extend(all.iter().filter(|key| !priorities.contains(*key)).cloned());
    ordered.retain(|key| !exclusions.contains(key));
    ordered
}

/// Explorer transaction-URL table for well-known networks, with a
/// `https://{key}scan.io/tx/` default for the rest.
fn explorer_table(chain_ids: &HashMap<String, String>) -> HashMap<String, String> {
    let mut explorers = HashMap::new();
    for key in chain_ids.values() {
        let url = match key.as_str() {
            "ethereum" => "https://etherscan.io/tx/".to_string(),
            "polygon" => "https://polygonscan.com/tx/".to_string(),
            "arbitrum" => "https://arbiscan.io/tx/".to_string(),
            "optimism" => "https://optimistic.etherscan.io/tx/".to_string(),
            "base" => "https://basescan.org/tx/".to_string(),
            "sepolia" => "https://sepolia.etherscan.io/tx/".to_string(),
            "holesky" => "https://holesky.etherscan.io/tx/".to_string(),
            other => format!("https://{other}scan.io/tx/"),
        };
        explorers.insert(key.clone(), url);
    }
    explorers
}

/// Derives a display name from a network key.
///
/// A handful of networks have established names that title-casing would
/// mangle; everything else is underscore-split title case.
fn display_name_for_key(key: &str) -> String {
    match key {
        "ethereum" => "Ethereum".to_string(),
        "binance" | "bsc" => "BNB Chain".to_string(),
        "xdai" => "Gnosis Chain".to_string(),
        "ethereumclassic" => "Ethereum Classic".to_string(),
        "okexchain" => "OKX Chain".to_string(),
        "zksync era" => "zkSync Era".to_string(),
        "polygon zkevm" => "Polygon zkEVM".to_string(),
        "op_bnb" => "opBNB".to_string(),
        "arbitrum nova" => "Arbitrum Nova".to_string(),
        "nova network" => "Nova Network".to_string(),
        other => other
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn sepolia_entry() -> NetworkInfo {
    NetworkInfo {
        key: "sepolia".to_string(),
        name: "Sepolia".to_string(),
        chain_id: 11_155_111,
        rpcs: [
            "https://rpc.sepolia.org",
            "https://ethereum-sepolia.blockpi.network/v1/rpc/public",
            "https://sepolia.infura.io/v3/9aa3d95b3bc440fa88ea12eaa4456161",
            "https://rpc2.sepolia.org",
            "https://eth-sepolia.public.blastapi.io",
        ]
        .into_iter()
        .map(RpcEndpoint::new)
        .collect(),
        block_explorer: "https://sepolia.etherscan.io/tx/".to_string(),
        native_symbol: Some("ETH".to_string()),
    }
}

fn holesky_entry() -> NetworkInfo {
    NetworkInfo {
        key: "holesky".to_string(),
        name: "Holesky".to_string(),
        chain_id: 17_000,
        rpcs: [
            "https://ethereum-holesky.publicnode.com",
            "https://holesky.blockpi.network/v1/rpc/public",
            "https://holesky.infura.io/v3/9aa3d95b3bc440fa88ea12eaa4456161",
            "https://ethereum-holesky.blockpi.network/v1/rpc/public",
            "https://1rpc.io/holesky",
        ]
        .into_iter()
        .map(RpcEndpoint::new)
        .collect(),
        block_explorer: "https://holesky.etherscan.io/tx/".to_string(),
        native_symbol: Some("ETH".to_string()),
    }
}
