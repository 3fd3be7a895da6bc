#![warn(missing_docs)]

//! Typed client for the Infura JSON-RPC gateway.
//!
//! Wraps the generic cached transport from `infura_rpc_client` with one
//! method per supported Ethereum read operation.

mod block_spec;
/// The typed gateway client.
pub mod client;
mod config;
mod network;
/// Hex-encoded integer wire types.
pub mod quantity;
mod request_methods;

pub use infura_rpc_client::{CacheBackend, CacheConfig, RpcClientError};

pub use self::{
    block_spec::{BlockSpec, BlockTag},
    client::InfuraRpcClient,
    config::ClientConfig,
    network::{InvalidNetworkError, Network},
    request_methods::RequestMethod,
};
