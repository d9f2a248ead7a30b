use alloy::primitives::{Address, U256};

use crate::chain::{ChainClient, Erc20};
use crate::error::TransferError;

/// Wei reserved to pay for one transfer at the configured gas price
pub fn gas_reserve(gas_limit: u64, gas_price_wei: u128) -> U256 {
    U256::from(gas_limit) * U256::from(gas_price_wei)
}

/// Maximum native amount that can be swept once gas is reserved.
/// `None` means the balance does not cover gas; that is a skip, not an error.
pub fn sweepable_amount(balance: U256, gas_limit: u64, gas_price_wei: u128) -> Option<U256> {
    let reserve = gas_reserve(gas_limit, gas_price_wei);
    if balance <= reserve {
        None
    } else {
        Some(balance - reserve)
    }
}

/// Native balance of `address` in wei
pub async fn native_balance(client: &ChainClient, address: Address) -> Result<U256, TransferError> {
    client
        .native_balance(address)
        .await
        .map_err(|e| TransferError::Query(e.to_string()))
}

/// ERC-20 balance of `address` for `token`
pub async fn token_balance(
    client: &ChainClient,
    token: Address,
    address: Address,
) -> Result<U256, TransferError> {
    Erc20::new(token, client.clone())
        .balance_of(address)
        .await
        .map_err(|e| TransferError::Query(e.to_string()))
}
