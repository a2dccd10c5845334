//! Mock Infrastructure for Testing
//!
//! Reusable mock types for exercising upstream interactions without real
//! network connections.
//!
//! ## Components
//!
//! - [`RpcMockBuilder`]: wraps mockito to provide Ethereum-specific response
//!   builders for the RPC methods the core issues
//! - [`HangingServer`]: accepts connections and never answers, for timeout
//!   and race tests

pub mod hanging_server;
pub mod rpc_mock;

pub use hanging_server::HangingServer;
pub use rpc_mock::RpcMockBuilder;
