use std::collections::HashMap;
use std::time::Duration;

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use alloy::signers::local::PrivateKeySigner;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use evm_rescue_sweeper::{ChainClient, ChainConfig, ChainError};

const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn test_wallet() -> EthereumWallet {
    let signer: PrivateKeySigner = TEST_KEY.parse().unwrap();
    EthereumWallet::from(signer)
}

fn test_config(name: &str, rpc_urls: Vec<String>) -> ChainConfig {
    ChainConfig {
        name: name.to_string(),
        rpc_urls,
        chain_id: 1337,
        gas_price_gwei: 7.0,
        block_time_seconds: 1,
    }
}

/// JSON-RPC responder: answers each method from a canned result map, echoing
/// the request id, and returns a method-not-found error otherwise.
struct RpcResponder {
    results: HashMap<String, Value>,
}

impl RpcResponder {
    fn new(results: &[(&str, Value)]) -> Self {
        Self {
            results: results
                .iter()
                .map(|(m, v)| (m.to_string(), v.clone()))
                .collect(),
        }
    }
}

impl Respond for RpcResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let id = body.get("id").cloned().unwrap_or(json!(1));
        let rpc_method = body
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default();
        match self.results.get(rpc_method) {
            Some(result) => ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": result,
            })),
            None => ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": "Method not found" },
            })),
        }
    }
}

async fn mock_chain(results: &[(&str, Value)]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(RpcResponder::new(results))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_connect_uses_first_reachable_endpoint() {
    // first endpoint is down, second is healthy
    let broken = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&broken)
        .await;
    let healthy = mock_chain(&[("eth_chainId", json!("0x539"))]).await;

    let config = test_config("testnet", vec![broken.uri(), healthy.uri()]);
    let client = ChainClient::connect(&config, test_wallet()).await.unwrap();
    assert_eq!(client.chain_name, "testnet");
    assert_eq!(client.chain_id, 1337);
}

#[tokio::test]
async fn test_connect_rejects_chain_id_mismatch() {
    // endpoint answers, but for mainnet rather than the configured chain
    let wrong = mock_chain(&[("eth_chainId", json!("0x1"))]).await;

    let config = test_config("testnet", vec![wrong.uri()]);
    let result = ChainClient::connect(&config, test_wallet()).await;
    assert!(matches!(result, Err(ChainError::Unreachable { ref chain }) if chain == "testnet"));
}

#[tokio::test]
async fn test_block_number_and_balance_queries() {
    let server = mock_chain(&[
        ("eth_chainId", json!("0x539")),
        ("eth_blockNumber", json!("0x10")),
        ("eth_getBalance", json!("0xde0b6b3a7640000")),
        ("eth_getTransactionCount", json!("0x2a")),
    ])
    .await;

    let config = test_config("testnet", vec![server.uri()]);
    let client = ChainClient::connect(&config, test_wallet()).await.unwrap();
    let address: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        .parse()
        .unwrap();

    assert_eq!(client.block_number().await.unwrap(), 0x10);
    assert_eq!(
        client.native_balance(address).await.unwrap(),
        U256::from(10u64).pow(U256::from(18u64))
    );
    assert_eq!(client.transaction_count(address).await.unwrap(), 42);
}

#[tokio::test]
async fn test_query_failure_maps_to_rpc_error() {
    // chain id works, everything else errors
    let server = mock_chain(&[("eth_chainId", json!("0x539"))]).await;

    let config = test_config("testnet", vec![server.uri()]);
    let client = ChainClient::connect(&config, test_wallet()).await.unwrap();

    let result = client.block_number().await;
    assert!(matches!(result, Err(ChainError::Rpc(_))));
}

#[tokio::test]
async fn test_wait_for_receipt_times_out_when_no_receipt() {
    let server = mock_chain(&[
        ("eth_chainId", json!("0x539")),
        ("eth_getTransactionReceipt", json!(null)),
    ])
    .await;

    let config = test_config("testnet", vec![server.uri()]);
    let client = ChainClient::connect(&config, test_wallet()).await.unwrap();

    let tx_hash: TxHash =
        "0x1111111111111111111111111111111111111111111111111111111111111111"
            .parse()
            .unwrap();
    let result = client
        .wait_for_receipt(tx_hash, Duration::from_secs(0))
        .await;
    assert!(matches!(
        result,
        Err(ChainError::ConfirmationTimeout { seconds: 0 })
    ));
}

#[tokio::test]
async fn test_wait_for_receipt_returns_confirmed_receipt() {
    let tx_hash: TxHash =
        "0x2222222222222222222222222222222222222222222222222222222222222222"
            .parse()
            .unwrap();
    let receipt = json!({
        "transactionHash": "0x2222222222222222222222222222222222222222222222222222222222222222",
        "transactionIndex": "0x0",
        "blockHash": "0x3333333333333333333333333333333333333333333333333333333333333333",
        "blockNumber": "0x11",
        "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        "to": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "contractAddress": null,
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "status": "0x1",
        "effectiveGasPrice": "0x1a13b8600",
        "type": "0x0",
    });
    let server = mock_chain(&[
        ("eth_chainId", json!("0x539")),
        ("eth_getTransactionReceipt", receipt),
    ])
    .await;

    let config = test_config("testnet", vec![server.uri()]);
    let client = ChainClient::connect(&config, test_wallet()).await.unwrap();

    let receipt = client
        .wait_for_receipt(tx_hash, Duration::from_secs(5))
        .await
        .unwrap();
    assert!(receipt.status());
    assert_eq!(receipt.transaction_hash, tx_hash);
}
