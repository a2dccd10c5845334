//! Upstream RPC endpoint communication.
//!
//! This module owns everything that touches the network:
//!
//! - HTTP transport with concurrency control ([`http_client`])
//! - Concurrent endpoint liveness probing ([`prober`])
//! - The per-endpoint JSON-RPC client facade ([`client`])
//!
//! # Endpoint Selection
//!
//! Public RPC providers are redundant and unreliable: for any network,
//! several of the advertised endpoints are slow, rate-limited, or dead at any
//! given moment. Probing them sequentially would pay one timeout per dead
//! endpoint in the worst realistic case, so the prober races all eligible
//! candidates at once and takes whichever settles successfully first.
//! Selection therefore follows completion order, not input order, and may
//! differ between identical invocations. Winners are not cached: every
//! operation re-verifies liveness from scratch.

pub mod client;
pub mod errors;
pub mod http_client;
pub mod prober;

pub use client::{BlockId, ChainClient};
pub use errors::{BlockIdError, ClientError, ProbeError, TransportError};
pub use http_client::{HttpClient, HttpClientConfig};
pub use prober::EndpointProber;
