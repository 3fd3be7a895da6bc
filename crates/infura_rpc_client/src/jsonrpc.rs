use serde::{Deserialize, Serialize};

/// The version of the JSON-RPC protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum Version {
    /// Version 2.0 of the JSON-RPC specification, the only one the gateway
    /// speaks.
    #[serde(rename = "2.0")]
    V2_0,
}

/// An identifier correlating a request with its response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Id {
    /// A numeric id.
    Num(u64),
    /// A string id.
    Str(String),
}

/// A JSON-RPC request envelope.
///
/// The `method` and `params` fields come from flattening the method type,
/// which is expected to serialize with `tag = "method", content = "params"`.
#[derive(Debug, Serialize)]
pub struct Request<MethodT> {
    /// The JSON-RPC version string.
    #[serde(rename = "jsonrpc")]
    pub version: Version,
    /// The request id.
    pub id: Id,
    /// The method invocation, providing `method` and `params`.
    #[serde(flatten)]
    pub method: MethodT,
}

/// A JSON-RPC response envelope.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Response<T> {
    /// The JSON-RPC version string.
    #[serde(rename = "jsonrpc")]
    pub version: Version,
    /// The id of the request this response answers.
    pub id: Id,
    /// The response payload, either a `result` or an `error`.
    #[serde(flatten)]
    pub data: ResponseData<T>,
}

/// The payload of a JSON-RPC response: exactly one of `result` or `error`.
// The error variant must come first: with an untagged enum serde tries the
// variants in order, and a generic success payload such as
// `serde_json::Value` would otherwise swallow error envelopes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ResponseData<T> {
    /// The method invocation failed on the remote side.
    Error {
        /// The reported failure.
        error: Error,
    },
    /// The method invocation succeeded.
    Success {
        /// The value produced by the method.
        result: T,
    },
}

impl<T> ResponseData<T> {
    /// Converts the payload into a [`Result`], forcing the caller through the
    /// error branch.
    pub fn into_result(self) -> Result<T, Error> {
        match self {
            ResponseData::Success { result } => Ok(result),
            ResponseData::Error { error } => Err(error),
        }
    }
}

/// A JSON-RPC error object.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error, Deserialize, Serialize)]
#[error("JSON-RPC error {code}: {message}")]
pub struct Error {
    /// The error code reported by the gateway.
    pub code: i64,
    /// A short description of the error.
    pub message: String,
    /// Additional, method-specific error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}
