use infura_rpc_client::RpcMethod;
use serde::Serialize;

use crate::{
    block_spec::BlockSpec,
    quantity::{U128, U64},
};

/// Helper module for serializing `()` into `[]`, so zero-parameter methods
/// send `"params": []` rather than `"params": null`.
mod empty_params {
    use serde::{ser::SerializeSeq, Serialize, Serializer};

    pub fn serialize<SerializerT, T>(
        _val: &T,
        s: SerializerT,
    ) -> Result<SerializerT::Ok, SerializerT::Error>
    where
        SerializerT: Serializer,
        T: Serialize,
    {
        let seq = s.serialize_seq(Some(0))?;
        seq.end()
    }
}

/// Helper module for serializing a single value into a sequence, so
/// one-parameter methods send `"params": [value]` rather than
/// `"params": value`.
mod sequence {
    use serde::{ser::SerializeSeq, Serialize, Serializer};

    pub fn serialize<SerializerT, T>(
        val: &T,
        s: SerializerT,
    ) -> Result<SerializerT::Ok, SerializerT::Error>
    where
        SerializerT: Serializer,
        T: Serialize,
    {
        let mut seq = s.serialize_seq(Some(1))?;
        seq.serialize_element(val)?;
        seq.end()
    }
}

/// For invoking a JSON-RPC method on the Infura gateway.
///
/// Addresses, transaction hashes, and call data are passed through as
/// unvalidated strings; the gateway is the authority on their shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum RequestMethod {
    /// `eth_blockNumber`
    #[serde(rename = "eth_blockNumber", serialize_with = "empty_params::serialize")]
    BlockNumber(()),
    /// `eth_call` with the full positional argument list the gateway
    /// accepts: from, to, gas, gas price, value, call data.
    #[serde(rename = "eth_call")]
    Call(String, String, U64, U128, U128, String),
    /// `eth_call` with only a target contract and call data, the shape
    /// ERC-20 read functions expect.
    #[serde(rename = "eth_call")]
    CallErc20(String, String),
    /// `eth_gasPrice`
    #[serde(rename = "eth_gasPrice", serialize_with = "empty_params::serialize")]
    GasPrice(()),
    /// `eth_getBalance`
    #[serde(rename = "eth_getBalance")]
    GetBalance(String, BlockSpec),
    /// `eth_getBlockByNumber`, with a flag selecting full transaction
    /// objects over bare hashes.
    #[serde(rename = "eth_getBlockByNumber")]
    GetBlockByNumber(U64, bool),
    /// `eth_getCode`
    #[serde(rename = "eth_getCode")]
    GetCode(String, BlockSpec),
    /// `eth_getTransactionReceipt`
    #[serde(
        rename = "eth_getTransactionReceipt",
        serialize_with = "sequence::serialize"
    )]
    GetTransactionReceipt(String),
}

impl RpcMethod for RequestMethod {
    fn name(&self) -> &'static str {
        match self {
            RequestMethod::BlockNumber(_) => "eth_blockNumber",
            RequestMethod::Call(..) | RequestMethod::CallErc20(..) => "eth_call",
            RequestMethod::GasPrice(_) => "eth_gasPrice",
            RequestMethod::GetBalance(..) => "eth_getBalance",
            RequestMethod::GetBlockByNumber(..) => "eth_getBlockByNumber",
            RequestMethod::GetCode(..) => "eth_getCode",
            RequestMethod::GetTransactionReceipt(_) => "eth_getTransactionReceipt",
        }
    }
}
