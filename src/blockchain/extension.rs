//! Extension wallet reached over a JSON-RPC bridge.
//!
//! Desktop and browser wallets can expose the same request/response surface
//! they inject into web pages (`eth_requestAccounts`, `eth_sendTransaction`)
//! on a local RPC port. Signing happens inside the wallet, behind a user
//! prompt; this side never sees key material.

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::traits::ExtensionProvider;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Extension wallet behind a JSON-RPC endpoint.
#[derive(Clone)]
pub struct RpcExtension {
    provider: DynProvider,
    url: String,
    /// User prompts can take a while; this bounds each request.
    request_timeout: Duration,
}

impl RpcExtension {
    /// Create a handle for the wallet bridge at `url`.
    pub fn connect(url: &str, request_timeout: Duration) -> BlockchainResult<Self> {
        let parsed: url::Url = url
            .parse()
            .map_err(|e| BlockchainError::Extension(format!("Invalid extension URL '{}': {}", url, e)))?;

        let provider = ProviderBuilder::new().connect_http(parsed).erased();

        tracing::info!(url = %url, "Extension wallet bridge configured");

        Ok(Self {
            provider,
            url: url.to_string(),
            request_timeout,
        })
    }

    /// Bridge URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ExtensionProvider for RpcExtension {
    async fn request(&self, method: &str, params: Value) -> BlockchainResult<Value> {
        tracing::debug!(method = %method, "Extension request");

        let call = self
            .provider
            .raw_request::<Value, Value>(method.to_string().into(), params);

        match timeout(self.request_timeout, call).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(BlockchainError::Extension(format!("{} failed: {}", method, e))),
            Err(_) => Err(BlockchainError::Timeout(self.request_timeout.as_secs())),
        }
    }

    async fn disconnect(&self) -> BlockchainResult<()> {
        // EIP-2255: revoking eth_accounts is the closest thing to a disconnect.
        self.request("wallet_revokePermissions", json!([{ "eth_accounts": {} }]))
            .await
            .map(|_| ())
    }
}

impl std::fmt::Debug for RpcExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcExtension")
            .field("url", &self.url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
