//! Error types for upstream communication.

use thiserror::Error;

/// Errors that can occur when talking to an RPC endpoint.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TransportError {
    /// Request exceeded the configured timeout duration.
    #[error("request timeout")]
    Timeout,

    /// Failed to establish a connection to the endpoint.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP-level error occurred (non-2xx status code).
    ///
    /// First field is the HTTP status code, second is the response text.
    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    /// JSON-RPC error envelope returned by the provider.
    ///
    /// First field is the RPC error code, second is the error message.
    #[error("RPC error {0}: {1}")]
    RpcError(i32, String),

    /// Network-level error from the underlying HTTP client.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request body could not be serialized.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Response could not be parsed or was malformed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The transport's concurrency limit could not be acquired.
    #[error("concurrency limit reached: {0}")]
    ConcurrencyLimit(String),
}

/// Error produced by a probing round.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Every probe-eligible candidate failed, timed out, or no candidate was
    /// eligible in the first place.
    #[error("no working RPC endpoint ({candidates} candidates probed)")]
    NoWorkingEndpoint { candidates: usize },
}

/// Errors from the chain client facade.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A read-only contract call returned data that could not be decoded.
    #[error("contract call failed: {0}")]
    ContractCall(String),
}

/// A block identifier that is neither a hash nor a base-10 number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockIdError {
    #[error("invalid block identifier: {0}")]
    InvalidBlockIdentifier(String),
}
