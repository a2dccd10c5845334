//! Single-network transaction and block lookup.
//!
//! One network, one value, no aggregation: validate the input, resolve a
//! working endpoint, make one call. Unlike the balance aggregator there is no
//! wall-clock race layered over the call; only the transport's own request
//! timeout bounds it.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    catalog::NetworkInfo,
    types::Hash32,
    upstream::{
        client::{BlockId, ChainClient},
        errors::{ClientError, ProbeError},
        http_client::HttpClient,
        prober::EndpointProber,
    },
};

/// What a lookup was asked to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Transaction,
    Block,
}

impl LookupKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::Block => "block",
        }
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    /// The search value is neither a valid hash nor (for blocks) a valid
    /// number. Surfaced before any network activity.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The node reports no such entity.
    #[error("{} not found", .0.as_str())]
    NotFound(LookupKind),

    /// No candidate endpoint for the network is currently responsive.
    #[error(transparent)]
    NoWorkingEndpoint(#[from] ProbeError),

    /// Lower-level transport or contract failure.
    #[error(transparent)]
    Transport(#[from] ClientError),
}

/// Orchestrates endpoint resolution plus a single transaction or block fetch.
pub struct LookupService {
    http: Arc<HttpClient>,
    prober: EndpointProber,
}

impl LookupService {
    #[must_use]
    pub fn new(http: Arc<HttpClient>) -> Self {
        let prober = EndpointProber::new(Arc::clone(&http));
        Self { http, prober }
    }

    #[must_use]
    pub fn with_prober(mut self, prober: EndpointProber) -> Self {
        self.prober = prober;
        self
    }

    /// Looks up a transaction by hash on one network.
    ///
    /// # Errors
    ///
    /// [`LookupError::InvalidInput`] for a malformed hash (no request made),
    /// [`LookupError::NoWorkingEndpoint`] when probing fails,
    /// [`LookupError::NotFound`] when the node knows no such transaction, and
    /// [`LookupError::Transport`] for lower-level failures.
    pub async fn lookup_transaction(
        &self,
        network: &NetworkInfo,
        hash_input: &str,
    ) -> Result<Value, LookupError> {
        let hash = Hash32::try_from(hash_input)
            .map_err(|e| LookupError::InvalidInput(format!("{hash_input}: {e}")))?;

        let client = self.resolve_client(network).await?;
        debug!(network = %network.key, hash = %hash, "fetching transaction");

        let transaction = client
            .get_transaction(&hash)
            .await?
            .ok_or(LookupError::NotFound(LookupKind::Transaction))?;

        info!(network = %network.key, hash = %hash, "transaction found");
        Ok(transaction)
    }

    /// Looks up a block by hash or decimal number on one network.
    ///
    /// A `0x`-prefixed value dispatches by hash; anything else must be a
    /// base-10 block number, converted to the canonical hex encoding before
    /// dispatch. Transaction bodies are omitted.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`LookupService::lookup_transaction`], with
    /// [`LookupError::InvalidInput`] covering non-numeric, non-hash values.
    pub async fn lookup_block(
        &self,
        network: &NetworkInfo,
        id_input: &str,
    ) -> Result<Value, LookupError> {
        let id = BlockId::parse(id_input).map_err(|e| LookupError::InvalidInput(e.to_string()))?;

        let client = self.resolve_client(network).await?;
        debug!(network = %network.key, block = %id.to_param(), "fetching block");

        let block =
            client.get_block(&id).await?.ok_or(LookupError::NotFound(LookupKind::Block))?;

        info!(network = %network.key, block = %id.to_param(), "block found");
        Ok(block)
    }

    async fn resolve_client(&self, network: &NetworkInfo) -> Result<ChainClient, LookupError> {
        let url = self.prober.resolve(&network.rpcs).await?;
        Ok(ChainClient::new(url, Arc::clone(&self.http)))
    }
}
