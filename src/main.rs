//! Command-line front end for the transaction submitter.

use alloy::primitives::{Address, Bytes};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use tx_submitter::config::{load_config, ExecutionMode, SubmitterConfig};
use tx_submitter::lifecycle::signals::spawn_ctrl_c_handler;
use tx_submitter::observability::{logging, metrics};
use tx_submitter::{Providers, Shutdown, TransactionState, TxRequest, TxValue};

#[derive(Parser)]
#[command(name = "tx-submitter")]
#[command(about = "Submit Ethereum transactions via a local key or an extension wallet", long_about = None)]
struct Cli {
    /// Path to a TOML config file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a transaction and wait for its outcome
    Send {
        /// Destination address
        #[arg(long, conflicts_with = "json")]
        to: Option<Address>,
        /// Amount in wei (decimal or 0x-hex)
        #[arg(long)]
        value: Option<String>,
        /// Call data as hex
        #[arg(long)]
        data: Option<Bytes>,
        #[arg(long)]
        gas_limit: Option<u64>,
        #[arg(long)]
        nonce: Option<u64>,
        /// Read the whole request from a JSON file instead
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Print the sending address
    Address {
        /// Also query the balance
        #[arg(long)]
        balance: bool,
    },
    /// Request the extension wallet's account
    Connect,
    /// Revoke the extension wallet's permissions
    Disconnect,
    /// Check the active RPC endpoint
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => SubmitterConfig::default(),
    };

    logging::init_logging(&config.observability);

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &SubmitterConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let shutdown = Shutdown::new();
    let _signals = spawn_ctrl_c_handler(shutdown.clone());

    tracing::debug!(env = %config.env, "Configuration loaded");

    match command {
        Commands::Send { to, value, data, gas_limit, nonce, json } => {
            let request = match json {
                Some(path) => serde_json::from_str::<TxRequest>(&std::fs::read_to_string(path)?)?,
                None => TxRequest {
                    to,
                    value: value.map(TxValue::Text),
                    data,
                    gas_limit,
                    nonce,
                    ..Default::default()
                },
            };

            let providers = Providers::from_config(config, shutdown)?;
            if providers.mode() == ExecutionMode::PublicNetwork {
                providers.connect_extension_wallet().await;
            }

            let state = providers.send_transaction(request).await;
            println!("{}", state);
            Ok(if state == TransactionState::Sent { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Address { balance } => {
            let providers = Providers::from_config(config, shutdown)?;
            if providers.mode() == ExecutionMode::PublicNetwork {
                providers.connect_extension_wallet().await;
            }

            let Some(address) = providers.wallet_address() else {
                eprintln!("No wallet address available");
                return Ok(ExitCode::FAILURE);
            };
            println!("{}", address);

            if balance {
                let Some(connection) = providers.chain_connection() else {
                    eprintln!("No chain connection available");
                    return Ok(ExitCode::FAILURE);
                };
                println!("{} wei", connection.get_balance(address).await?);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Connect => {
            let providers = Providers::from_config(config, shutdown)?;
            match providers.connect_extension_wallet().await {
                Some(address) => {
                    println!("{}", address);
                    Ok(ExitCode::SUCCESS)
                }
                None => Ok(ExitCode::FAILURE),
            }
        }
        Commands::Disconnect => {
            let providers = Providers::from_config(config, shutdown)?;
            providers.disconnect_wallet().await;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Health => {
            let providers = Providers::from_config(config, shutdown)?;
            let Some(connection) = providers.chain_connection() else {
                eprintln!("No chain connection available");
                return Ok(ExitCode::FAILURE);
            };
            if !connection.is_healthy().await {
                eprintln!("{} node is unreachable", providers.mode());
                return Ok(ExitCode::FAILURE);
            }
            let chain_id = connection.get_chain_id().await?;
            let block = connection.get_block_number().await?;
            println!("{} chain_id={} block={}", providers.mode(), u64::from(chain_id), block);
            Ok(ExitCode::SUCCESS)
        }
    }
}
