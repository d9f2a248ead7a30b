use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash, U256};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::account::{validate_address, Account};
use crate::chain::ChainClient;
use crate::config::ChainConfig;
use crate::error::{ChainError, SweeperError};
use crate::sweep::submitter::{submit_native, submit_token};
use crate::sweep::sweeper::native_balance;
use crate::sweep::{CONFIRMATION_TIMEOUT_SECS, ERROR_BACKOFF_SECS};

/// Runtime binding of a chain config to a connected client, plus the only
/// piece of mutable per-chain state: the last block height already handled.
pub struct ChainSession {
    pub config: ChainConfig,
    pub client: ChainClient,
    pub last_seen_block: u64,
}

impl ChainSession {
    /// Connect to the chain and seed `last_seen_block` with the current
    /// height, so startup never replays old blocks.
    pub async fn connect(config: ChainConfig, wallet: EthereumWallet) -> Result<Self, ChainError> {
        let client = ChainClient::connect(&config, wallet).await?;
        let last_seen_block = client.block_number().await?;
        debug!(
            "{}: session starts at block {}",
            config.name, last_seen_block
        );
        Ok(Self {
            config,
            client,
            last_seen_block,
        })
    }
}

/// Per-chain polling loop. Each poller owns its session; transfers within one
/// chain are strictly serialized (submit, wait for receipt, next asset) so the
/// source account's nonce is never raced.
pub struct ChainPoller {
    session: ChainSession,
    account: Arc<Account>,
    tokens: Arc<Vec<String>>,
}

impl ChainPoller {
    pub fn new(session: ChainSession, account: Arc<Account>, tokens: Arc<Vec<String>>) -> Self {
        Self {
            session,
            account,
            tokens,
        }
    }

    pub fn last_seen_block(&self) -> u64 {
        self.session.last_seen_block
    }

    /// One polling iteration: read the height, and if it moved past
    /// `last_seen_block`, run one sweep cycle. Returns whether a cycle ran.
    /// The height is recorded before any transfer is attempted so a failed
    /// transfer never causes the same block to be processed twice.
    pub async fn poll_once(&mut self) -> Result<bool, SweeperError> {
        let current = self.session.client.block_number().await?;
        if current <= self.session.last_seen_block {
            return Ok(false);
        }

        info!(
            "{}: New block detected: {}",
            self.session.config.name, current
        );
        self.session.last_seen_block = current;
        self.sweep_cycle().await;
        Ok(true)
    }

    /// Run forever: poll, sweep on new blocks, sleep one block time between
    /// iterations, and back off after loop-level errors.
    pub async fn run(mut self) {
        info!(
            "{}: polling every {}s from block {}",
            self.session.config.name,
            self.session.config.block_time_seconds,
            self.session.last_seen_block
        );
        loop {
            if let Err(e) = self.poll_once().await {
                error!(
                    "{}: Error in polling loop: {}",
                    self.session.config.name, e
                );
                sleep(Duration::from_secs(ERROR_BACKOFF_SECS)).await;
                continue;
            }
            sleep(Duration::from_secs(self.session.config.block_time_seconds)).await;
        }
    }

    /// One sweep cycle: native first, then each configured token in list
    /// order. Failures are isolated per asset and never abort the cycle.
    async fn sweep_cycle(&self) {
        self.sweep_native().await;

        for raw in self.tokens.iter() {
            if !validate_address(raw) {
                error!(
                    "{}: Invalid token address: {}",
                    self.session.config.name, raw
                );
                continue;
            }
            match raw.trim().parse::<Address>() {
                Ok(token) => self.sweep_token(token).await,
                Err(_) => error!(
                    "{}: Invalid token address: {}",
                    self.session.config.name, raw
                ),
            }
        }
    }

    async fn sweep_native(&self) {
        let chain = &self.session.config;

        // a failed balance read means "nothing to sweep", not a dead cycle
        let balance = match native_balance(&self.session.client, self.account.source).await {
            Ok(balance) => balance,
            Err(e) => {
                error!("{}: Error checking balance: {}", chain.name, e);
                U256::ZERO
            }
        };
        if balance.is_zero() {
            info!("{}: No native tokens to transfer", chain.name);
            return;
        }

        match submit_native(
            &self.session.client,
            self.account.source,
            self.account.safe,
            balance,
            chain.chain_id,
            chain.gas_price_wei(),
        )
        .await
        {
            Ok(Some(tx_hash)) => self.await_confirmation(tx_hash, "native").await,
            Ok(None) => {}
            Err(e) => error!("{}: Native transfer failed: {}", chain.name, e),
        }
    }

    async fn sweep_token(&self, token: Address) {
        let chain = &self.session.config;

        match submit_token(
            &self.session.client,
            token,
            self.account.source,
            self.account.safe,
            chain.chain_id,
            chain.gas_price_wei(),
        )
        .await
        {
            Ok(Some(tx_hash)) => self.await_confirmation(tx_hash, "ERC-20").await,
            Ok(None) => {}
            Err(e) => error!(
                "{}: ERC-20 transfer failed for {}: {}",
                chain.name, token, e
            ),
        }
    }

    /// Block this chain's cycle until the transfer confirms, times out, or
    /// fails. None of these outcomes retries; unswept balances are picked up
    /// again on the next detected block.
    async fn await_confirmation(&self, tx_hash: TxHash, what: &str) {
        let chain = &self.session.config;
        info!(
            "{}: Waiting for {} transaction {} to confirm...",
            chain.name, what, tx_hash
        );
        match self
            .session
            .client
            .wait_for_receipt(tx_hash, Duration::from_secs(CONFIRMATION_TIMEOUT_SECS))
            .await
        {
            Ok(receipt) if receipt.status() => {
                info!("{}: {} transfer successful", chain.name, what);
            }
            Ok(_) => {
                error!(
                    "{}: {} transfer {} reverted on chain",
                    chain.name, what, tx_hash
                );
            }
            Err(e) => {
                error!(
                    "{}: {} transfer {} confirmation failed: {}",
                    chain.name, what, tx_hash, e
                );
            }
        }
    }
}
