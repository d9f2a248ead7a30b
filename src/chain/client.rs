use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::config::ChainConfig;
use crate::error::ChainError;

/// How often the receipt wait re-polls eth_getTransactionReceipt
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Signing chain client for one network, wrapping an alloy provider with the
/// source account's wallet attached.
#[derive(Clone)]
pub struct ChainClient {
    provider: DynProvider,
    pub chain_name: String,
    pub chain_id: u64,
}

impl ChainClient {
    /// Connect to the first reachable RPC endpoint of `config`, in configured
    /// order. An endpoint counts as reachable only if it answers eth_chainId
    /// with the configured chain id; all endpoints failing is a startup error.
    pub async fn connect(config: &ChainConfig, wallet: EthereumWallet) -> Result<Self, ChainError> {
        for rpc_url in &config.rpc_urls {
            match Self::try_connect(rpc_url, config.chain_id, wallet.clone()).await {
                Ok(provider) => {
                    info!("Connected to {}: {}", config.name, rpc_url);
                    return Ok(Self {
                        provider,
                        chain_name: config.name.clone(),
                        chain_id: config.chain_id,
                    });
                }
                Err(e) => {
                    warn!("Failed to connect to {} RPC {}: {}", config.name, rpc_url, e);
                }
            }
        }
        Err(ChainError::Unreachable {
            chain: config.name.clone(),
        })
    }

    async fn try_connect(
        rpc_url: &str,
        expected_chain_id: u64,
        wallet: EthereumWallet,
    ) -> Result<DynProvider, ChainError> {
        let url = rpc_url.parse().map_err(|e| ChainError::InvalidUrl {
            url: rpc_url.to_string(),
            reason: format!("{}", e),
        })?;

        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

        let actual = provider
            .get_chain_id()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;
        if actual != expected_chain_id {
            return Err(ChainError::ChainIdMismatch {
                url: rpc_url.to_string(),
                expected: expected_chain_id,
                actual,
            });
        }

        Ok(provider.erased())
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Current block height
    pub async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    /// Native balance of `address` in wei
    pub async fn native_balance(&self, address: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    /// Current nonce for `address`. Re-read fresh before every submission;
    /// nonce safety comes from the poller serializing submit and confirm.
    pub async fn transaction_count(&self, address: Address) -> Result<u64, ChainError> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    /// Sign and submit a fully-pinned transaction, returning its hash
    pub async fn send(&self, tx: TransactionRequest) -> Result<TxHash, ChainError> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;
        Ok(*pending.tx_hash())
    }

    /// Wait for the receipt of `tx_hash`, polling until `timeout` elapses.
    /// Transient receipt-query failures are retried until the deadline.
    pub async fn wait_for_receipt(
        &self,
        tx_hash: TxHash,
        timeout: Duration,
    ) -> Result<TransactionReceipt, ChainError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => {
                    debug!("{}: no receipt yet for {}", self.chain_name, tx_hash);
                }
                Err(e) => {
                    warn!(
                        "{}: receipt query for {} failed: {}",
                        self.chain_name, tx_hash, e
                    );
                }
            }
            if Instant::now() + RECEIPT_POLL_INTERVAL > deadline {
                return Err(ChainError::ConfirmationTimeout {
                    seconds: timeout.as_secs(),
                });
            }
            sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}
