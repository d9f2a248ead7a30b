use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use evm_rescue_sweeper::sweep::{ChainPoller, ChainSession};
use evm_rescue_sweeper::{logging, Account, Settings, SweeperError};

/// Funds-recovery sweeper: watches configured chains for new blocks and moves
/// the source account's native and ERC-20 balances to the safe address.
#[derive(Parser, Debug)]
#[command(name = "sweeper")]
struct Args {
    /// Comma-separated chain names to activate (overrides ACTIVE_CHAINS)
    #[arg(long)]
    chains: Option<String>,

    /// TOML file adding or overriding chain configurations
    #[arg(long)]
    chains_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init(&args.log_level);

    if let Err(e) = run(args).await {
        error!("{}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), SweeperError> {
    let settings = Settings::load(args.chains.as_deref(), args.chains_file.as_deref())?;
    let account = Arc::new(Account::new(&settings.private_key, &settings.safe_address)?);
    let tokens = Arc::new(settings.token_addresses.clone());

    info!(
        "Starting rescue sweeper for compromised wallet: {}",
        account.source
    );
    info!("Safe wallet: {}", account.safe);
    info!("Active chains: {}", settings.active_chains.join(", "));
    if !tokens.is_empty() {
        info!("Watching {} token contract(s)", tokens.len());
    }

    // Every chain must come up; an unreachable chain is a startup failure,
    // not a degraded mode.
    let mut sessions = Vec::new();
    for config in settings.active_chain_configs() {
        let session = ChainSession::connect(config, account.wallet()).await?;
        sessions.push(session);
    }

    let mut handles = Vec::new();
    for session in sessions {
        let poller = ChainPoller::new(session, Arc::clone(&account), Arc::clone(&tokens));
        handles.push(tokio::spawn(poller.run()));
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal, exiting"),
        Err(e) => error!("Unable to listen for shutdown signal: {}", e),
    }
    for handle in handles {
        handle.abort();
    }
    Ok(())
}
