use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use std::fmt;

use crate::error::ConfigError;

/// Returns true only for a syntactically valid, EIP-55 checksummed address.
/// Never panics; any parse failure is simply `false`.
pub fn validate_address(address: &str) -> bool {
    Address::parse_checksummed(address.trim(), None).is_ok()
}

/// The source account being rescued and the safe destination.
///
/// The private key lives only inside the signer; `Account` deliberately has no
/// derived Debug so the key cannot leak into logs.
pub struct Account {
    signer: PrivateKeySigner,
    pub source: Address,
    pub safe: Address,
}

impl Account {
    pub fn new(private_key: &str, safe_address: &str) -> Result<Self, ConfigError> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPrivateKey)?;

        if !validate_address(safe_address) {
            return Err(ConfigError::InvalidAddress(safe_address.to_string()));
        }
        let safe: Address = safe_address
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(safe_address.to_string()))?;

        let source = signer.address();
        Ok(Self {
            signer,
            source,
            safe,
        })
    }

    /// Wallet used by the provider to sign outgoing transactions
    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("source", &self.source)
            .field("safe", &self.safe)
            .finish_non_exhaustive()
    }
}
