pub mod poller;
pub mod submitter;
pub mod sweeper;

pub use poller::{ChainPoller, ChainSession};
pub use submitter::{AssetKind, TransferIntent};

/// Gas limit for a plain native value transfer
pub const NATIVE_TRANSFER_GAS: u64 = 21_000;
/// Gas limit for an ERC-20 transfer call
pub const TOKEN_TRANSFER_GAS: u64 = 100_000;
/// How long a submitted transfer is allowed to confirm before the cycle
/// moves on
pub const CONFIRMATION_TIMEOUT_SECS: u64 = 120;
/// Backoff after a loop-level polling error
pub const ERROR_BACKOFF_SECS: u64 = 10;
