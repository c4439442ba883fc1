//! Process-wide connection, wallet and extension handles.
//!
//! `Providers` is built once at startup and shared behind an `Arc`. It owns
//! the submitter for the configured execution mode and answers the
//! "who am I / what am I connected to" questions callers need.

use alloy::primitives::Address;
use arc_swap::ArcSwapOption;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::extension::RpcExtension;
use crate::blockchain::traits::{ChainConnection, ExtensionProvider, LocalSigner};
use crate::blockchain::transaction::TxRequest;
use crate::blockchain::types::{BlockchainError, BlockchainResult, TransactionState};
use crate::blockchain::wallet::Wallet;
use crate::config::{ConfirmationConfig, ExecutionMode, SubmitterConfig};
use crate::lifecycle::Shutdown;
use crate::submitter::{
    ConfirmationPoller, ExtensionSubmitter, LocalWalletSubmitter, TransactionSubmitter,
};

/// The connection handle active for the current execution mode.
#[derive(Clone)]
pub enum ActiveProvider {
    /// Public-network mode: the user's extension wallet.
    Extension(Arc<dyn ExtensionProvider>),
    /// Local mode: the connection the local wallet is bound to.
    Rpc(Arc<dyn ChainConnection>),
}

impl std::fmt::Debug for ActiveProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActiveProvider::Extension(_) => f.write_str("ActiveProvider::Extension"),
            ActiveProvider::Rpc(_) => f.write_str("ActiveProvider::Rpc"),
        }
    }
}

/// Shared handles plus the submitter selected for the execution mode.
pub struct Providers {
    mode: ExecutionMode,
    mainnet: Option<Arc<dyn ChainConnection>>,
    wallet: Option<Arc<dyn LocalSigner>>,
    extension: Option<Arc<dyn ExtensionProvider>>,
    extension_address: Arc<ArcSwapOption<Address>>,
    submitter: Box<dyn TransactionSubmitter>,
}

impl Providers {
    /// Start building a context for `mode`.
    pub fn builder(mode: ExecutionMode) -> ProvidersBuilder {
        ProvidersBuilder::new(mode)
    }

    /// Build the context described by `config`.
    ///
    /// Local mode requires the private key; in public-network mode a missing
    /// key only leaves the local wallet unset.
    pub fn from_config(config: &SubmitterConfig, shutdown: Shutdown) -> BlockchainResult<Self> {
        let mode = config.env;
        let mainnet = BlockchainClient::new(config.rpc.mainnet_endpoint())?;

        let wallet = match Wallet::from_env(&config.wallet.private_key_env) {
            Ok(wallet) => Some(wallet.connect(BlockchainClient::new(config.rpc.endpoint(mode))?)?),
            Err(e) if mode == ExecutionMode::Local => return Err(e),
            Err(e) => {
                tracing::debug!(error = %e, "No local wallet loaded");
                None
            }
        };

        let extension = match &config.extension.url {
            Some(url) => Some(RpcExtension::connect(
                url,
                Duration::from_secs(config.extension.request_timeout_secs),
            )?),
            None => {
                if mode == ExecutionMode::PublicNetwork {
                    tracing::warn!("No extension wallet configured");
                }
                None
            }
        };

        let mut builder = Providers::builder(mode)
            .mainnet(Arc::new(mainnet))
            .confirmation(config.confirmation.clone())
            .shutdown(shutdown);
        if let Some(wallet) = wallet {
            builder = builder.wallet(Arc::new(wallet));
        }
        if let Some(extension) = extension {
            builder = builder.extension(Arc::new(extension));
        }

        Ok(builder.build())
    }

    /// Execution mode this context was built for.
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Submit `request` on the configured path.
    pub async fn send_transaction(&self, request: TxRequest) -> TransactionState {
        let state = self.submitter.submit(request).await;
        tracing::info!(path = self.submitter.path(), state = %state, "Transaction submission finished");
        state
    }

    /// Read-only public network connection.
    pub fn mainnet_provider(&self) -> Option<Arc<dyn ChainConnection>> {
        self.mainnet.clone()
    }

    /// Chain connection used for reads in the current mode: the wallet's
    /// connection locally, the public network otherwise.
    pub fn chain_connection(&self) -> Option<Arc<dyn ChainConnection>> {
        match self.mode {
            ExecutionMode::Local => self.wallet.as_ref().and_then(|w| w.connection()),
            ExecutionMode::PublicNetwork => self.mainnet_provider(),
        }
    }

    /// Connection handle for the current mode.
    pub fn provider(&self) -> Option<ActiveProvider> {
        match self.mode {
            ExecutionMode::PublicNetwork => self.extension.clone().map(ActiveProvider::Extension),
            ExecutionMode::Local => self
                .wallet
                .as_ref()
                .and_then(|w| w.connection())
                .map(ActiveProvider::Rpc),
        }
    }

    /// Address transactions are sent from in the current mode.
    pub fn wallet_address(&self) -> Option<Address> {
        match self.mode {
            ExecutionMode::PublicNetwork => self.extension_address.load_full().map(|a| *a),
            ExecutionMode::Local => self.wallet.as_ref().map(|w| w.address()),
        }
    }

    /// Ask the extension wallet for its account and cache it.
    ///
    /// Returns `None` when there is no extension, the request fails, or the
    /// wallet does not expose exactly one account.
    pub async fn connect_extension_wallet(&self) -> Option<Address> {
        let Some(extension) = &self.extension else {
            tracing::warn!("Extension wallet is not available");
            return None;
        };

        let response = match extension.request("eth_requestAccounts", json!([])).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Account request failed");
                return None;
            }
        };

        let accounts = match parse_accounts(response) {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::warn!(error = %e, "Unexpected account list");
                return None;
            }
        };

        if accounts.len() != 1 {
            tracing::warn!(count = accounts.len(), "Expected exactly one extension account");
            return None;
        }

        let address = accounts[0];
        self.extension_address.store(Some(Arc::new(address)));
        tracing::info!(address = %address, "Extension wallet connected");
        Some(address)
    }

    /// Disconnect the extension wallet. Failures are logged, never returned.
    pub async fn disconnect_wallet(&self) {
        let Some(extension) = &self.extension else {
            tracing::warn!("Extension wallet is not available");
            return;
        };

        match extension.disconnect().await {
            Ok(()) => {
                self.extension_address.store(None);
                tracing::info!("Extension wallet disconnected");
            }
            Err(e) => tracing::error!(error = %e, "Error disconnecting wallet"),
        }
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers")
            .field("mode", &self.mode)
            .field("path", &self.submitter.path())
            .field("has_wallet", &self.wallet.is_some())
            .field("has_extension", &self.extension.is_some())
            .finish()
    }
}

fn parse_accounts(response: Value) -> BlockchainResult<Vec<Address>> {
    serde_json::from_value(response).map_err(|e| BlockchainError::Extension(e.to_string()))
}

/// Assembles a [`Providers`] from already-constructed handles.
pub struct ProvidersBuilder {
    mode: ExecutionMode,
    mainnet: Option<Arc<dyn ChainConnection>>,
    wallet: Option<Arc<dyn LocalSigner>>,
    extension: Option<Arc<dyn ExtensionProvider>>,
    confirmation: ConfirmationConfig,
    shutdown: Shutdown,
}

impl ProvidersBuilder {
    fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            mainnet: None,
            wallet: None,
            extension: None,
            confirmation: ConfirmationConfig::default(),
            shutdown: Shutdown::new(),
        }
    }

    pub fn mainnet(mut self, connection: Arc<dyn ChainConnection>) -> Self {
        self.mainnet = Some(connection);
        self
    }

    pub fn wallet(mut self, wallet: Arc<dyn LocalSigner>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn extension(mut self, extension: Arc<dyn ExtensionProvider>) -> Self {
        self.extension = Some(extension);
        self
    }

    pub fn confirmation(mut self, config: ConfirmationConfig) -> Self {
        self.confirmation = config;
        self
    }

    pub fn shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn build(self) -> Providers {
        let extension_address = Arc::new(ArcSwapOption::empty());

        let submitter: Box<dyn TransactionSubmitter> = match self.mode {
            ExecutionMode::PublicNetwork => Box::new(ExtensionSubmitter::new(
                self.extension.clone(),
                extension_address.clone(),
            )),
            ExecutionMode::Local => Box::new(LocalWalletSubmitter::new(
                self.wallet.clone(),
                ConfirmationPoller::new(self.confirmation, self.shutdown),
            )),
        };

        Providers {
            mode: self.mode,
            mainnet: self.mainnet,
            wallet: self.wallet,
            extension: self.extension,
            extension_address,
            submitter,
        }
    }
}
