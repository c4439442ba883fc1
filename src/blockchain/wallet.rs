//! Local wallet: key loading, signing and broadcasting.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::timeout;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::traits::{ChainConnection, LocalSigner};
use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Default environment variable holding the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "TX_SUBMITTER_PRIVATE_KEY";

/// Signing provider plus the read-only client for the same node.
#[derive(Clone)]
struct Binding {
    signing: Arc<dyn Provider + Send + Sync>,
    client: BlockchainClient,
}

/// Private-key wallet, optionally bound to a connection.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    binding: Option<Binding>,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Wallet initialized");

        Ok(Self { signer, binding: None })
    }

    /// Load the wallet key from the environment variable `var`.
    pub fn from_env(var: &str) -> BlockchainResult<Self> {
        let private_key = std::env::var(var).map_err(|_| {
            BlockchainError::Wallet(format!("Environment variable {} not set", var))
        })?;

        Self::from_private_key(&private_key)
    }

    /// Bind the wallet to the node `client` talks to.
    ///
    /// Transactions sent afterwards get nonce, gas and chain id filled in by
    /// the node before signing.
    pub fn connect(mut self, client: BlockchainClient) -> BlockchainResult<Self> {
        let url: url::Url = client.rpc_url().parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", client.rpc_url(), e))
        })?;

        let signing = ProviderBuilder::new()
            .wallet(EthereumWallet::from(self.signer.clone()))
            .connect_http(url);

        self.binding = Some(Binding {
            signing: Arc::new(signing) as Arc<dyn Provider + Send + Sync>,
            client,
        });
        Ok(self)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Whether [`Wallet::connect`] has been called.
    pub fn is_connected(&self) -> bool {
        self.binding.is_some()
    }
}

#[async_trait]
impl LocalSigner for Wallet {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let binding = self
            .binding
            .as_ref()
            .ok_or_else(|| BlockchainError::NotAvailable("wallet is not connected".to_string()))?;

        let limit = binding.client.timeout_duration();
        match timeout(limit, binding.signing.send_transaction(tx)).await {
            Ok(Ok(pending)) => {
                let tx_hash = *pending.tx_hash();
                tracing::info!(tx_hash = %tx_hash, from = %self.signer.address(), "Transaction broadcast");
                Ok(tx_hash)
            }
            Ok(Err(e)) => Err(BlockchainError::Rpc(format!("Broadcast failed: {}", e))),
            Err(_) => Err(BlockchainError::Timeout(limit.as_secs())),
        }
    }

    fn connection(&self) -> Option<Arc<dyn ChainConnection>> {
        self.binding
            .as_ref()
            .map(|b| Arc::new(b.client.clone()) as Arc<dyn ChainConnection>)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.signer.address())
            .field("rpc_url", &self.binding.as_ref().map(|b| b.client.rpc_url().to_string()))
            .finish()
    }
}
