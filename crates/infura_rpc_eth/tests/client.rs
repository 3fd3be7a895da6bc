use std::{ops::Deref, path::PathBuf, time::Duration};

use infura_rpc_eth::{
    BlockSpec, CacheBackend, CacheConfig, ClientConfig, InfuraRpcClient, Network, RpcClientError,
};
use mockito::Matcher;
use serde_json::json;
use tempfile::TempDir;

struct TestClient {
    client: InfuraRpcClient,

    // Need to keep the tempdir around to prevent it from being deleted
    cache_dir: TempDir,
}

impl TestClient {
    fn new(url: &str, expire_after: Duration) -> Self {
        let cache_dir = TempDir::new().expect("failed to create temp dir");

        let mut config = ClientConfig::new("test-project");
        config.cache = CacheConfig {
            backend: CacheBackend::Disk {
                dir: Some(cache_dir.path().to_path_buf()),
            },
            expire_after,
        };
        config.url_override = Some(url.to_string());

        Self {
            client: InfuraRpcClient::new(config).expect("url ok"),
            cache_dir,
        }
    }

    fn files_in_cache(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&self.cache_dir)
            .into_iter()
            .filter_map(Result::ok)
        {
            if entry.file_type().is_file() {
                files.push(entry.path().to_owned());
            }
        }
        files
    }
}

impl Deref for TestClient {
    type Target = InfuraRpcClient;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

fn envelope(method: &str, params: serde_json::Value) -> Matcher {
    Matcher::Json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    }))
}

#[test]
fn endpoint_is_derived_from_network_and_project_id() {
    for network in Network::ALL {
        let mut config = ClientConfig::new("my-project-id");
        config.network = network;
        config.cache = CacheConfig {
            backend: CacheBackend::Disabled,
            expire_after: Duration::from_secs(5),
        };

        let client = InfuraRpcClient::new(config).expect("construction succeeds");
        assert_eq!(
            client.endpoint(),
            format!("https://{network}.infura.io/v3/my-project-id")
        );
    }
}

#[test]
fn unknown_network_names_are_rejected() {
    let error = "goerli".parse::<Network>().expect_err("goerli is unsupported");
    assert!(error.to_string().contains("polygon-mainnet"));
}

#[tokio::test]
async fn gas_price_decodes_the_hex_result() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("content-type", "application/json")
        .match_header("user-agent", Matcher::Regex("^infura_rpc ".to_string()))
        .match_body(envelope("eth_gasPrice", json!([])))
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x3b9aca00"}"#)
        .create_async()
        .await;

    let gas_price = TestClient::new(&server.url(), Duration::from_secs(60))
        .gas_price()
        .await
        .expect("call succeeds");

    assert_eq!(gas_price, 1_000_000_000);
    mock.assert_async().await;
}

#[tokio::test]
async fn get_balance_sends_the_address_and_block_tag() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(envelope(
            "eth_getBalance",
            json!(["0xabc0000000000000000000000000000000000000", "latest"]),
        ))
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#)
        .create_async()
        .await;

    let balance = TestClient::new(&server.url(), Duration::from_secs(60))
        .get_balance("0xabc0000000000000000000000000000000000000", None)
        .await
        .expect("call succeeds");

    assert_eq!(balance, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn get_balance_accepts_a_numeric_block() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(envelope(
            "eth_getBalance",
            json!(["0xabc0000000000000000000000000000000000000", "0x7"]),
        ))
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x0"}"#)
        .create_async()
        .await;

    let balance = TestClient::new(&server.url(), Duration::from_secs(60))
        .get_balance(
            "0xabc0000000000000000000000000000000000000",
            Some(BlockSpec::number(7)),
        )
        .await
        .expect("call succeeds");

    assert_eq!(balance, 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn get_block_by_number_returns_the_raw_structure() {
    let block = json!({
        "number": "0x64",
        "hash": "0xe670ec64341771606e55d6b4ca35a1a6b75ee3d5145a99d05921026d15273311",
        "transactions": [],
    });

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(envelope("eth_getBlockByNumber", json!(["0x64", false])))
        .with_body(
            serde_json::to_string(&json!({"jsonrpc": "2.0", "id": 1, "result": block}))
                .expect("serialization succeeds"),
        )
        .create_async()
        .await;

    let result = TestClient::new(&server.url(), Duration::from_secs(60))
        .get_block_by_number(100, false)
        .await
        .expect("call succeeds");

    assert_eq!(result, block);
    mock.assert_async().await;
}

#[tokio::test]
async fn get_transaction_receipt_passes_null_results_through() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(envelope(
            "eth_getTransactionReceipt",
            json!(["0xc008e9f9bb92057dd0035496fbf4fb54f66b4b18b370928e46d6603933022222"]),
        ))
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":null}"#)
        .create_async()
        .await;

    let receipt = TestClient::new(&server.url(), Duration::from_secs(60))
        .get_transaction_receipt(
            "0xc008e9f9bb92057dd0035496fbf4fb54f66b4b18b370928e46d6603933022222",
        )
        .await
        .expect("call succeeds");

    assert_eq!(receipt, serde_json::Value::Null);
    mock.assert_async().await;
}

#[tokio::test]
async fn erc20_call_omits_sender_gas_and_value() {
    let return_data = "0x0000000000000000000000000000000000000000000000000000000000000001";

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(envelope(
            "eth_call",
            json!([
                "0x6b175474e89094c44da98b954eedeac495271d0f",
                "0x70a08231000000000000000000000000000000000000000000000000000000000000dead",
            ]),
        ))
        .with_body(
            serde_json::to_string(&json!({"jsonrpc": "2.0", "id": 1, "result": return_data}))
                .expect("serialization succeeds"),
        )
        .create_async()
        .await;

    let result = TestClient::new(&server.url(), Duration::from_secs(60))
        .call_erc20(
            "0x6b175474e89094c44da98b954eedeac495271d0f",
            "0x70a08231000000000000000000000000000000000000000000000000000000000000dead",
        )
        .await
        .expect("call succeeds");

    assert_eq!(result, return_data);
    mock.assert_async().await;
}

#[tokio::test]
async fn call_hex_encodes_gas_gas_price_and_value() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(envelope(
            "eth_call",
            json!([
                "0xf000000000000000000000000000000000000000",
                "0x7000000000000000000000000000000000000000",
                "0x5208",
                "0x3b9aca00",
                "0x0",
                "0xdeadbeef",
            ]),
        ))
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x"}"#)
        .create_async()
        .await;

    let result = TestClient::new(&server.url(), Duration::from_secs(60))
        .call(
            "0xf000000000000000000000000000000000000000",
            "0x7000000000000000000000000000000000000000",
            21_000,
            1_000_000_000,
            0,
            "0xdeadbeef",
        )
        .await
        .expect("call succeeds");

    assert_eq!(result, "0x");
    mock.assert_async().await;
}

#[tokio::test]
async fn repeated_requests_are_served_from_the_cache() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(envelope("eth_gasPrice", json!([])))
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x3b9aca00"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = TestClient::new(&server.url(), Duration::from_secs(60));

    let first = client.gas_price().await.expect("call succeeds");
    let second = client.gas_price().await.expect("call succeeds");

    assert_eq!(first, second);
    assert_eq!(client.files_in_cache().len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn expired_cache_entries_are_refetched() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(envelope("eth_gasPrice", json!([])))
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x3b9aca00"}"#)
        .expect(2)
        .create_async()
        .await;

    // A zero expiration makes every entry stale as soon as it is written.
    let client = TestClient::new(&server.url(), Duration::ZERO);

    client.gas_price().await.expect("call succeeds");
    client.gas_price().await.expect("call succeeds");

    mock.assert_async().await;
}

#[tokio::test]
async fn concurrent_calls_do_not_cross_contaminate() {
    let mut server = mockito::Server::new_async().await;
    let gas_price_mock = server
        .mock("POST", "/")
        .match_body(envelope("eth_gasPrice", json!([])))
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x3b9aca00"}"#)
        .create_async()
        .await;
    let block_number_mock = server
        .mock("POST", "/")
        .match_body(envelope("eth_blockNumber", json!([])))
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x64"}"#)
        .create_async()
        .await;

    let client = TestClient::new(&server.url(), Duration::from_secs(60));

    let (gas_price, block_number) = tokio::join!(client.gas_price(), client.block_number());

    assert_eq!(gas_price.expect("call succeeds"), 1_000_000_000);
    assert_eq!(block_number.expect("call succeeds"), 100);
    gas_price_mock.assert_async().await;
    block_number_mock.assert_async().await;
}

#[tokio::test]
async fn json_rpc_error_envelopes_surface_as_typed_errors() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_body(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"invalid argument 0: hex string of odd length"}}"#,
        )
        .create_async()
        .await;

    let error = TestClient::new(&server.url(), Duration::from_secs(60))
        .get_balance("0xabc", None)
        .await
        .expect_err("should have failed with a JSON-RPC error");

    if let RpcClientError::JsonRpcError { error, .. } = error {
        assert_eq!(error.code, -32602);
        assert!(error.message.contains("odd length"));
    } else {
        unreachable!("Invalid error: {error}");
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn malformed_hex_results_are_a_decoding_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"not hex"}"#)
        .create_async()
        .await;

    let error = TestClient::new(&server.url(), Duration::from_secs(60))
        .gas_price()
        .await
        .expect_err("should have failed to decode the result");

    assert!(matches!(error, RpcClientError::InvalidResponse { .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn http_error_statuses_surface_with_their_code() {
    const STATUS_CODE: u16 = 400;

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(STATUS_CODE.into())
        .with_header("content-type", "text/plain")
        .create_async()
        .await;

    let error = TestClient::new(&server.url(), Duration::from_secs(60))
        .block_number()
        .await
        .expect_err("should have failed due to a HTTP status error");

    if let RpcClientError::HttpStatus(error) = error {
        assert_eq!(
            reqwest::Error::from(error).status(),
            Some(reqwest::StatusCode::from_u16(STATUS_CODE).unwrap())
        );
    } else {
        unreachable!("Invalid error: {error}");
    }

    mock.assert_async().await;
}
