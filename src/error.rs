use thiserror::Error;

/// Top-level error type for the rescue sweeper
#[derive(Error, Debug)]
pub enum SweeperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),
}

/// Startup/configuration errors; all of these are fatal and exit the process
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key")]
    InvalidPrivateKey,

    #[error("Chains file not found: {0}")]
    FileNotFound(String),

    #[error("Chains file parsing failed: {0}")]
    Parsing(String),
}

/// Chain client errors
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Invalid RPC URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Could not connect to {chain}: all RPC endpoints failed")]
    Unreachable { chain: String },

    #[error("Chain id mismatch on {url}: expected {expected}, got {actual}")]
    ChainIdMismatch {
        url: String,
        expected: u64,
        actual: u64,
    },

    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("No receipt within {seconds} seconds")]
    ConfirmationTimeout { seconds: u64 },
}

/// Per-asset transfer failures, by kind, so callers can tell a failed balance
/// read apart from a rejected submission
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Balance query failed: {0}")]
    Query(String),

    #[error("Transaction build failed: {0}")]
    Build(String),

    #[error("Transaction submission failed: {0}")]
    Submission(String),

    #[error("Confirmation timed out after {seconds} seconds")]
    ConfirmationTimeout { seconds: u64 },

    #[error("Confirmation failed: {0}")]
    Confirmation(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SweeperError>;
