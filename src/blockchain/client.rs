//! Read-only blockchain RPC client with timeout and failover.
//!
//! # Responsibilities
//! - Connect to a JSON-RPC endpoint (plus optional failovers)
//! - Query chain state (chain id, block number, balances, receipts)
//! - Handle timeouts and network errors gracefully

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::traits::ChainConnection;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, Receipt};
use crate::observability::metrics;

/// Where and how to reach a JSON-RPC node.
#[derive(Debug, Clone)]
pub struct RpcEndpoint {
    pub url: String,
    pub failover_urls: Vec<String>,
    pub timeout_secs: u64,
}

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    endpoint: RpcEndpoint,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new client.
    ///
    /// Nothing is sent over the wire here; an unreachable node only shows up
    /// on the first call.
    pub fn new(endpoint: RpcEndpoint) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(endpoint.timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = endpoint.url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", endpoint.url, e))
        })?;
        providers.push(Arc::new(ProviderBuilder::new().connect_http(primary_url)) as Arc<dyn Provider + Send + Sync>);

        for url_str in &endpoint.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        tracing::debug!(
            rpc_url = %endpoint.url,
            failovers = providers.len() - 1,
            "Blockchain client initialized"
        );

        Ok(Self {
            providers,
            endpoint,
            timeout_duration,
        })
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::Rpc("All RPC providers failed".to_string()))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_number();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get block number".to_string()))
    }

    /// Get the balance of an address.
    pub async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_balance(address);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get balance".to_string()))
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<Receipt>> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_receipt(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result.map(Receipt::from)),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get receipt".to_string()))
    }

    /// Check if the node is reachable.
    ///
    /// Returns true if we can query the block number.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.get_block_number().await.is_ok();
        metrics::record_backend_health(&self.endpoint.url, healthy);
        healthy
    }

    /// Primary RPC URL.
    pub fn rpc_url(&self) -> &str {
        &self.endpoint.url
    }

    /// Per-call timeout.
    pub fn timeout_duration(&self) -> Duration {
        self.timeout_duration
    }
}

#[async_trait]
impl ChainConnection for BlockchainClient {
    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<Receipt>> {
        BlockchainClient::get_transaction_receipt(self, tx_hash).await
    }

    async fn get_block_number(&self) -> BlockchainResult<u64> {
        BlockchainClient::get_block_number(self).await
    }

    async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        BlockchainClient::get_chain_id(self).await
    }

    async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        BlockchainClient::get_balance(self, address).await
    }

    async fn is_healthy(&self) -> bool {
        BlockchainClient::is_healthy(self).await
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.endpoint.url)
            .field("failover_urls", &self.endpoint.failover_urls)
            .field("timeout_secs", &self.endpoint.timeout_secs)
            .finish()
    }
}
