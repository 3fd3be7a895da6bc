use infura_rpc_client::{RpcClient, RpcClientError};

use crate::{
    block_spec::BlockSpec,
    config::ClientConfig,
    quantity::{U128, U64},
    request_methods::RequestMethod,
};

/// A typed client for the Infura JSON-RPC gateway.
///
/// One method per supported operation; numeric results are decoded from their
/// hex wire encoding, everything else is returned as the gateway sent it.
/// Responses are cached per the configured [`CacheConfig`](infura_rpc_client::CacheConfig).
#[derive(Debug)]
pub struct InfuraRpcClient {
    inner: RpcClient<RequestMethod>,
    config: ClientConfig,
    endpoint: String,
}

impl InfuraRpcClient {
    /// Creates a new instance from `config`, deriving the endpoint URL from
    /// the configured network and project id.
    pub fn new(config: ClientConfig) -> Result<Self, RpcClientError> {
        let endpoint = config.endpoint_url();
        let inner = RpcClient::new(&endpoint, config.cache.clone(), config.timeout, None)?;

        Ok(Self {
            inner,
            config,
            endpoint,
        })
    }

    /// Returns the endpoint URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the configuration the client was constructed from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Calls `eth_gasPrice` and returns the current gas price in wei.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub async fn gas_price(&self) -> Result<u128, RpcClientError> {
        self.inner
            .call::<U128>(RequestMethod::GasPrice(()))
            .await
            .map(|gas_price| gas_price.0)
    }

    /// Calls `eth_getBalance` and returns the balance in wei.
    ///
    /// `block` defaults to the latest block when `None`.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub async fn get_balance(
        &self,
        address: &str,
        block: Option<BlockSpec>,
    ) -> Result<u128, RpcClientError> {
        self.inner
            .call::<U128>(RequestMethod::GetBalance(
                address.to_string(),
                block.unwrap_or_else(BlockSpec::latest),
            ))
            .await
            .map(|balance| balance.0)
    }

    /// Calls `eth_blockNumber` and returns the number of the latest block.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub async fn block_number(&self) -> Result<u64, RpcClientError> {
        self.inner
            .call::<U64>(RequestMethod::BlockNumber(()))
            .await
            .map(|block_number| block_number.0)
    }

    /// Calls `eth_getBlockByNumber` and returns the block structure as the
    /// gateway sent it, with full transaction objects when
    /// `include_transactions` is set and bare hashes otherwise.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub async fn get_block_by_number(
        &self,
        block_number: u64,
        include_transactions: bool,
    ) -> Result<serde_json::Value, RpcClientError> {
        self.inner
            .call(RequestMethod::GetBlockByNumber(
                U64(block_number),
                include_transactions,
            ))
            .await
    }

    /// Calls `eth_getTransactionReceipt` and returns the receipt structure as
    /// the gateway sent it. The result is `null` for unknown hashes.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub async fn get_transaction_receipt(
        &self,
        transaction_hash: &str,
    ) -> Result<serde_json::Value, RpcClientError> {
        self.inner
            .call(RequestMethod::GetTransactionReceipt(
                transaction_hash.to_string(),
            ))
            .await
    }

    /// Calls `eth_getCode` and returns the hex-encoded bytecode, undecoded.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub async fn get_code(
        &self,
        address: &str,
        block: BlockSpec,
    ) -> Result<String, RpcClientError> {
        self.inner
            .call(RequestMethod::GetCode(address.to_string(), block))
            .await
    }

    /// Calls `eth_call` with the full positional argument list and returns
    /// the hex-encoded return data, undecoded.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub async fn call(
        &self,
        from: &str,
        to: &str,
        gas: u64,
        gas_price: u128,
        value: u128,
        data: &str,
    ) -> Result<String, RpcClientError> {
        self.inner
            .call(RequestMethod::Call(
                from.to_string(),
                to.to_string(),
                U64(gas),
                U128(gas_price),
                U128(value),
                data.to_string(),
            ))
            .await
    }

    /// Calls `eth_call` with only a target contract and call data, the shape
    /// ERC-20 read functions such as `balanceOf` expect. Returns the
    /// hex-encoded return data, undecoded.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip(self)))]
    pub async fn call_erc20(&self, to: &str, data: &str) -> Result<String, RpcClientError> {
        self.inner
            .call(RequestMethod::CallErc20(to.to_string(), data.to_string()))
            .await
    }
}
