pub mod account;
pub mod chain;
pub mod config;
pub mod error;
pub mod logging;
pub mod sweep;

pub use account::{validate_address, Account};
pub use chain::{ChainClient, Erc20};
pub use config::{ChainConfig, Settings};
pub use error::{ChainError, ConfigError, Result, SweeperError, TransferError};
pub use sweep::{ChainPoller, ChainSession};
