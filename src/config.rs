use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Static configuration for one supported chain
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// Chain name used in logs and in ACTIVE_CHAINS
    #[serde(default)]
    pub name: String,
    /// RPC endpoints, tried in order; the first reachable one wins
    pub rpc_urls: Vec<String>,
    /// Numeric chain identifier used in the transaction signing domain
    pub chain_id: u64,
    /// Gas price in gwei; fractional values are allowed (e.g. 0.3 on base)
    pub gas_price_gwei: f64,
    /// Block time in seconds, used as the polling interval
    pub block_time_seconds: u64,
}

impl ChainConfig {
    /// Configured gas price converted to wei
    pub fn gas_price_wei(&self) -> u128 {
        (self.gas_price_gwei * 1_000_000_000.0).round() as u128
    }
}

fn chain(
    name: &str,
    rpc_urls: &[&str],
    chain_id: u64,
    gas_price_gwei: f64,
    block_time_seconds: u64,
) -> (String, ChainConfig) {
    (
        name.to_string(),
        ChainConfig {
            name: name.to_string(),
            rpc_urls: rpc_urls.iter().map(|u| u.to_string()).collect(),
            chain_id,
            gas_price_gwei,
            block_time_seconds,
        },
    )
}

/// Built-in chain table; entries can be overridden or extended via a TOML
/// chains file
pub static BUILTIN_CHAINS: Lazy<BTreeMap<String, ChainConfig>> = Lazy::new(|| {
    BTreeMap::from([
        chain(
            "bsc",
            &[
                "https://bsc-dataseed.binance.org/",
                "https://bsc-dataseed1.defibit.io/",
                "https://bsc-dataseed1.ninicoin.io/",
                "https://bsc.publicnode.com",
            ],
            56,
            7.0,
            3,
        ),
        chain(
            "ethereum",
            &[
                "https://rpc.ankr.com/eth",
                "https://1rpc.io/eth",
                "https://api.zan.top/eth-mainnet",
                "https://eth.llamarpc.com",
            ],
            1,
            20.0,
            12,
        ),
        chain(
            "polygon",
            &[
                "https://rpc.ankr.com/polygon",
                "https://1rpc.io/matic",
                "https://polygon-bor-rpc.publicnode.com",
            ],
            137,
            50.0,
            3,
        ),
        chain(
            "linea",
            &[
                "https://linea.drpc.org",
                "https://rpc.linea.build/",
                "https://1rpc.io/linea",
            ],
            59144,
            2.0,
            3,
        ),
        chain(
            "sepolia",
            &[
                "https://ethereum-sepolia-rpc.publicnode.com",
                "https://1rpc.io/sepolia",
                "https://sepolia.drpc.org",
            ],
            11155111,
            2.0,
            3,
        ),
        chain(
            "base",
            &[
                "https://base-rpc.publicnode.com",
                "https://1rpc.io/base",
                "https://base.drpc.org",
            ],
            8453,
            0.3,
            3,
        ),
    ])
});

/// Optional TOML chains file: `[chains.<name>]` entries override or extend the
/// built-in table
#[derive(Debug, Deserialize)]
struct ChainsFile {
    #[serde(default)]
    chains: BTreeMap<String, ChainConfig>,
}

/// Process configuration, assembled from the environment, the optional chains
/// file and CLI overrides; loaded once at startup
pub struct Settings {
    pub private_key: String,
    pub safe_address: String,
    pub token_addresses: Vec<String>,
    pub active_chains: Vec<String>,
    pub chains: BTreeMap<String, ChainConfig>,
}

impl Settings {
    /// Load settings from the environment. `chains_override` (from the CLI)
    /// takes precedence over ACTIVE_CHAINS; `chains_file` extends the built-in
    /// chain table.
    pub fn load(
        chains_override: Option<&str>,
        chains_file: Option<&Path>,
    ) -> std::result::Result<Self, ConfigError> {
        let private_key = env::var("SOURCE_PRIVATE_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("SOURCE_PRIVATE_KEY".to_string()))?;
        let safe_address = env::var("SAFE_ADDRESS")
            .map_err(|_| ConfigError::MissingEnvVar("SAFE_ADDRESS".to_string()))?;

        let token_addresses = split_list(&env::var("TOKEN_ADDRESSES").unwrap_or_default());

        let active_env = env::var("ACTIVE_CHAINS").unwrap_or_else(|_| "bsc".to_string());
        let active_chains = split_list(chains_override.unwrap_or(&active_env));
        if active_chains.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "ACTIVE_CHAINS".to_string(),
                value: active_env,
            });
        }

        let mut chains = BUILTIN_CHAINS.clone();
        if let Some(path) = chains_file {
            for (name, config) in load_chains_file(path)? {
                chains.insert(name, config);
            }
        }

        let settings = Settings {
            private_key,
            safe_address,
            token_addresses,
            active_chains,
            chains,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Validate that every requested chain exists and is well-formed
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.private_key.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("SOURCE_PRIVATE_KEY".to_string()));
        }
        if self.safe_address.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("SAFE_ADDRESS".to_string()));
        }
        for name in &self.active_chains {
            let config = self
                .chains
                .get(name)
                .ok_or_else(|| ConfigError::UnknownChain(name.clone()))?;
            if config.rpc_urls.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: format!("chains.{}.rpc_urls", name),
                    value: "[]".to_string(),
                });
            }
            if config.block_time_seconds == 0 {
                return Err(ConfigError::InvalidValue {
                    key: format!("chains.{}.block_time_seconds", name),
                    value: "0".to_string(),
                });
            }
            if config.gas_price_gwei <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: format!("chains.{}.gas_price_gwei", name),
                    value: config.gas_price_gwei.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Configs for the active chains, in the requested order
    pub fn active_chain_configs(&self) -> Vec<ChainConfig> {
        self.active_chains
            .iter()
            .filter_map(|name| self.chains.get(name).cloned())
            .collect()
    }
}

fn load_chains_file(path: &Path) -> std::result::Result<BTreeMap<String, ChainConfig>, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
    let file: ChainsFile =
        toml::from_str(&content).map_err(|e| ConfigError::Parsing(e.to_string()))?;
    Ok(file
        .chains
        .into_iter()
        .map(|(name, mut config)| {
            config.name = name.clone();
            (name, config)
        })
        .collect())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
