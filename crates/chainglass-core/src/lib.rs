//! # Chainglass Core
//!
//! Core library for the chainglass multi-chain tools (balance checker,
//! onchain viewer). The front-end tabs are thin consumers; everything with
//! real coordination lives here:
//!
//! - **[`catalog`]**: merges the static reference sources (chain-id table,
//!   primary and supplementary RPC lists, priority ordering, exclusions) into
//!   one immutable [`catalog::NetworkCatalog`], with a built-in fallback so a
//!   broken data source degrades instead of failing.
//!
//! - **[`upstream`]**: HTTP transport, endpoint probing, and the per-endpoint
//!   JSON-RPC client facade. The prober races a liveness call against every
//!   eligible candidate URL concurrently and returns whichever answers first.
//!
//! - **[`tokens`]**: the static token registry (ETH/WETH/USDC/USDCe) and the
//!   [`tokens::TokenSelection`] state distinguishing single-token from
//!   combined-pair fetches.
//!
//! - **[`balance`]**: the batch balance aggregator — per-network concurrent
//!   fetches under a wall-clock timeout, independent failure isolation, and
//!   exact scaled-integer totals.
//!
//! - **[`lookup`]**: single-network transaction and block lookup with input
//!   validation ahead of any network activity.
//!
//! ## Request Flow
//!
//! ```text
//! ReferenceSources ──► NetworkCatalog (built once, read-only)
//!                              │
//!            per user action   ▼
//!               ┌──────────────────────────────┐
//!               │ BalanceAggregator / Lookup   │
//!               └──────────────┬───────────────┘
//!                              ▼
//!                    EndpointProber (race)
//!                              │ winning URL
//!                              ▼
//!                        ChainClient ──► JSON-RPC provider
//! ```
//!
//! Concurrency is cooperative: network calls are the only suspension points,
//! the catalogue is immutable after load, and no mutable state is shared
//! across in-flight operations.

pub mod balance;
pub mod catalog;
pub mod lookup;
pub mod tokens;
pub mod types;
pub mod upstream;

pub use balance::{BalanceAggregator, BalanceReport, BalanceResult, NetworkBalance};
pub use catalog::{NetworkCatalog, NetworkInfo, ReferenceSources};
pub use lookup::{LookupError, LookupService};
pub use tokens::TokenSelection;
pub use upstream::{ChainClient, EndpointProber, HttpClient};
