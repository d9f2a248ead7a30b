use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::DynProvider;
use alloy::sol;

use crate::chain::ChainClient;
use crate::error::ChainError;

sol! {
    #[sol(rpc)]
    contract IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// One ERC-20 token contract on one chain
#[derive(Clone)]
pub struct Erc20 {
    pub token: Address,
    client: ChainClient,
}

impl Erc20 {
    pub fn new(token: Address, client: ChainClient) -> Self {
        Self { token, client }
    }

    fn contract(&self) -> IERC20::IERC20Instance<DynProvider> {
        IERC20::new(self.token, self.client.provider().clone())
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256, ChainError> {
        self.contract()
            .balanceOf(account)
            .call()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    /// Submit `transfer(to, amount)` with every envelope field pinned so the
    /// wallet signs exactly what the poller serialized
    #[allow(clippy::too_many_arguments)]
    pub async fn transfer(
        &self,
        from: Address,
        to: Address,
        amount: U256,
        nonce: u64,
        gas_limit: u64,
        gas_price_wei: u128,
        chain_id: u64,
    ) -> Result<TxHash, ChainError> {
        let pending = self
            .contract()
            .transfer(to, amount)
            .from(from)
            .nonce(nonce)
            .gas(gas_limit)
            .gas_price(gas_price_wei)
            .chain_id(chain_id)
            .send()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))?;
        Ok(*pending.tx_hash())
    }
}
