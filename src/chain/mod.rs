pub mod client;
pub mod erc20;

pub use client::ChainClient;
pub use erc20::Erc20;
