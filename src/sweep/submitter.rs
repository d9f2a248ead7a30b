use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use log::{info, warn};

use crate::chain::{ChainClient, Erc20};
use crate::error::TransferError;
use crate::sweep::sweeper::{gas_reserve, sweepable_amount, token_balance};
use crate::sweep::{NATIVE_TRANSFER_GAS, TOKEN_TRANSFER_GAS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Native,
    Token,
}

/// Fully-pinned transfer envelope, built, signed, submitted and discarded
/// within one sweep cycle
#[derive(Debug, Clone)]
pub struct TransferIntent {
    pub kind: AssetKind,
    pub token: Option<Address>,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price_wei: u128,
    pub chain_id: u64,
}

impl TransferIntent {
    pub fn native(
        from: Address,
        to: Address,
        amount: U256,
        nonce: u64,
        gas_price_wei: u128,
        chain_id: u64,
    ) -> Self {
        Self {
            kind: AssetKind::Native,
            token: None,
            from,
            to,
            amount,
            nonce,
            gas_limit: NATIVE_TRANSFER_GAS,
            gas_price_wei,
            chain_id,
        }
    }

    pub fn token(
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
        nonce: u64,
        gas_price_wei: u128,
        chain_id: u64,
    ) -> Self {
        Self {
            kind: AssetKind::Token,
            token: Some(token),
            from,
            to,
            amount,
            nonce,
            gas_limit: TOKEN_TRANSFER_GAS,
            gas_price_wei,
            chain_id,
        }
    }

    /// Native transfer envelope for the provider to sign and submit
    pub fn to_request(&self) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(self.from)
            .with_to(self.to)
            .with_value(self.amount)
            .with_nonce(self.nonce)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(self.gas_price_wei)
            .with_chain_id(self.chain_id)
    }
}

/// Sweep the native balance of `from` to `to`, keeping back exactly the gas
/// reserve. `Ok(None)` means nothing was sent: the balance does not cover gas.
pub async fn submit_native(
    client: &ChainClient,
    from: Address,
    to: Address,
    balance: U256,
    chain_id: u64,
    gas_price_wei: u128,
) -> Result<Option<TxHash>, TransferError> {
    let amount = match sweepable_amount(balance, NATIVE_TRANSFER_GAS, gas_price_wei) {
        Some(amount) => amount,
        None => {
            warn!(
                "Insufficient balance for gas: {} wei <= {} wei reserve",
                balance,
                gas_reserve(NATIVE_TRANSFER_GAS, gas_price_wei)
            );
            return Ok(None);
        }
    };

    let nonce = client
        .transaction_count(from)
        .await
        .map_err(|e| TransferError::Query(e.to_string()))?;

    let intent = TransferIntent::native(from, to, amount, nonce, gas_price_wei, chain_id);
    let tx_hash = client
        .send(intent.to_request())
        .await
        .map_err(|e| TransferError::Submission(e.to_string()))?;

    info!("Native transaction sent: {}", tx_hash);
    Ok(Some(tx_hash))
}

/// Sweep the entire ERC-20 balance of `from` to `to`. `Ok(None)` means the
/// token balance is zero and no call was made.
pub async fn submit_token(
    client: &ChainClient,
    token: Address,
    from: Address,
    to: Address,
    chain_id: u64,
    gas_price_wei: u128,
) -> Result<Option<TxHash>, TransferError> {
    let balance = token_balance(client, token, from).await?;
    if balance.is_zero() {
        info!("No tokens to transfer for: {}", token);
        return Ok(None);
    }

    let nonce = client
        .transaction_count(from)
        .await
        .map_err(|e| TransferError::Query(e.to_string()))?;

    let intent = TransferIntent::token(token, from, to, balance, nonce, gas_price_wei, chain_id);
    let tx_hash = Erc20::new(token, client.clone())
        .transfer(
            intent.from,
            intent.to,
            intent.amount,
            intent.nonce,
            intent.gas_limit,
            intent.gas_price_wei,
            intent.chain_id,
        )
        .await
        .map_err(|e| TransferError::Submission(e.to_string()))?;

    info!("ERC-20 transaction sent: {} for token {}", tx_hash, token);
    Ok(Some(tx_hash))
}
