use std::{marker::PhantomData, time::Duration};

use hyper::header::HeaderValue;
pub use hyper::{header, HeaderMap};
use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    cache::{self, CacheConfig, CacheKeyHasher, ResponseCache},
    jsonrpc, ReqwestError,
};

// The gateway ignores the envelope id for plain HTTP transports; responses
// are matched to requests by the exchange itself. A constant id also keeps
// the serialized body stable, which the cache fingerprint relies on.
const REQUEST_ID: u64 = 1;

/// Specialized error types
#[derive(Debug, thiserror::Error)]
pub enum RpcClientError {
    /// The message could not be sent to the remote node
    #[error(transparent)]
    FailedToSend(ReqwestError),

    /// The remote node failed to reply with the body of the response
    #[error("The response text was corrupted: {0}.")]
    CorruptedResponse(ReqwestError),

    /// The server returned an error code.
    #[error("The Http server returned error status code: {0}")]
    HttpStatus(ReqwestError),

    /// The request cannot be serialized as JSON.
    #[error(transparent)]
    InvalidJsonRequest(serde_json::Error),

    /// The server returned an invalid JSON-RPC response.
    #[error("Response '{response}' failed to parse with expected type '{expected_type}', due to error: '{error}'")]
    InvalidResponse {
        /// The response text
        response: String,
        /// The expected type of the response
        expected_type: &'static str,
        /// The parse error
        error: serde_json::Error,
    },

    /// Invalid URL format
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    /// The JSON-RPC returned an error.
    #[error("{error}. Request: {request}")]
    JsonRpcError {
        /// The JSON-RPC error
        error: jsonrpc::Error,
        /// The request JSON
        request: String,
    },

    /// There was a problem with the local cache.
    #[error("{message} for '{cache_key}' with error: '{error}'")]
    CacheError {
        /// Description of the cache error
        message: String,
        /// The cache key for the error
        cache_key: String,
        /// The underlying error
        error: cache::Error,
    },
}

/// Trait for JSON-RPC method types.
pub trait RpcMethod {
    /// Returns the JSON-RPC name of the method, e.g. `eth_getBalance`.
    fn name(&self) -> &'static str;
}

/// A client for executing JSON-RPC methods on a remote gateway, with a
/// time-bounded response cache in front of the network.
///
/// Requests are values built fresh per call; a single instance is safe to
/// share across concurrent callers.
#[derive(Debug)]
pub struct RpcClient<MethodT: RpcMethod + Serialize> {
    url: url::Url,
    client: HttpClient,
    cache: ResponseCache,
    _phantom: PhantomData<MethodT>,
}

impl<MethodT: RpcMethod + Serialize> RpcClient<MethodT> {
    /// Creates a new instance, given a remote gateway URL, a cache policy,
    /// and an optional request timeout.
    pub fn new(
        url: &str,
        cache_config: CacheConfig,
        timeout: Option<Duration>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<Self, RpcClientError> {
        let mut headers = extra_headers.unwrap_or_default();
        headers.append(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.append(
            header::USER_AGENT,
            HeaderValue::from_str(&format!("infura_rpc {}", env!("CARGO_PKG_VERSION")))
                .expect("Version string is valid header value"),
        );

        let mut builder = HttpClient::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .expect("Default construction nor setting default headers can cause an error");

        Ok(RpcClient {
            url: url.parse()?,
            client,
            cache: ResponseCache::new(cache_config),
            _phantom: PhantomData,
        })
    }

    fn parse_response_str<SuccessT: DeserializeOwned>(
        response: String,
    ) -> Result<jsonrpc::Response<SuccessT>, RpcClientError> {
        serde_json::from_str(&response).map_err(|error| RpcClientError::InvalidResponse {
            response,
            expected_type: std::any::type_name::<jsonrpc::Response<SuccessT>>(),
            error,
        })
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
    async fn send_request_body(
        &self,
        request_body: &SerializedRequest,
    ) -> Result<String, RpcClientError> {
        self.client
            .post(self.url.clone())
            .body(request_body.to_json_string())
            .send()
            .await
            .map_err(|err| RpcClientError::FailedToSend(err.into()))?
            .error_for_status()
            .map_err(|err| RpcClientError::HttpStatus(err.into()))?
            .text()
            .await
            .map_err(|err| RpcClientError::CorruptedResponse(err.into()))
    }

    async fn send_request_and_extract_result<SuccessT: DeserializeOwned>(
        &self,
        request: &SerializedRequest,
    ) -> Result<SuccessT, RpcClientError> {
        self.send_request_body(request)
            .await
            .and_then(Self::parse_response_str)?
            .data
            .into_result()
            .map_err(|error| RpcClientError::JsonRpcError {
                error,
                request: request.to_json_string(),
            })
    }

    fn serialize_request(method: &MethodT) -> Result<SerializedRequest, RpcClientError> {
        let request = serde_json::to_value(jsonrpc::Request {
            version: jsonrpc::Version::V2_0,
            id: jsonrpc::Id::Num(REQUEST_ID),
            method,
        })
        .map_err(RpcClientError::InvalidJsonRequest)?;

        Ok(SerializedRequest(request))
    }

    fn cache_key(&self, request: &SerializedRequest) -> String {
        CacheKeyHasher::new()
            .hash_str(self.url.as_str())
            .hash_str(&request.to_json_string())
            .finalize()
    }

    /// Calls the provided JSON-RPC method and returns the result.
    ///
    /// A fresh cached response is returned without touching the network; a
    /// miss is fetched from the gateway and written back to the cache. An
    /// `error` envelope surfaces as [`RpcClientError::JsonRpcError`].
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
    pub async fn call<SuccessT: DeserializeOwned + Serialize>(
        &self,
        method: MethodT,
    ) -> Result<SuccessT, RpcClientError> {
        let request = Self::serialize_request(&method)?;
        let cache_key = self.cache_key(&request);

        if let Some(cached) = self.cache.read(&cache_key).await {
            match serde_json::from_value(cached) {
                Ok(result) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!("Cache hit: {}", method.name());
                    return Ok(result);
                }
                Err(error) => {
                    // The entry was stored under an older layout of the
                    // expected type. Drop it and fetch from the gateway.
                    log::error!(
                        "Failed to deserialize item from RPC response cache. error: '{error}' expected type: '{expected_type}'",
                        expected_type = std::any::type_name::<SuccessT>()
                    );
                    self.cache.remove(&cache_key).await;
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!("Cache miss: {}", method.name());

        let result: SuccessT = self.send_request_and_extract_result(&request).await?;

        let value = serde_json::to_value(&result).expect(
            "result serializes successfully as it was just deserialized from a JSON string",
        );
        self.cache.write(&cache_key, &value).await?;

        Ok(result)
    }
}

#[derive(Debug, Clone)]
#[repr(transparent)]
struct SerializedRequest(serde_json::Value);

impl SerializedRequest {
    fn to_json_string(&self) -> String {
        self.0.to_string()
    }
}
