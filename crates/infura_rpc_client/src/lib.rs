#![warn(missing_docs)]

//! JSON-RPC client over HTTP with a time-bounded response cache.

/// Types for configuring and fingerprinting the response cache.
pub mod cache;
mod client;
/// Types specific to JSON-RPC
pub mod jsonrpc;
mod reqwest_error;

pub use self::{
    cache::{CacheBackend, CacheConfig, CacheKeyHasher},
    client::{header, HeaderMap, RpcClient, RpcClientError, RpcMethod},
    reqwest_error::ReqwestError,
};
