//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::blockchain::client::RpcEndpoint;
use crate::blockchain::wallet::PRIVATE_KEY_ENV_VAR;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SubmitterConfig {
    /// Which signing path to use.
    pub env: ExecutionMode,

    /// JSON-RPC endpoints.
    pub rpc: RpcConfig,

    /// Local wallet settings.
    pub wallet: WalletConfig,

    /// Extension wallet bridge.
    pub extension: ExtensionConfig,

    /// Receipt polling.
    pub confirmation: ConfirmationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Deployment target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// Sign with a local private key against a development node.
    #[default]
    Local,
    /// Let the user's extension wallet sign against the public network.
    #[serde(alias = "mainnet")]
    PublicNetwork,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Local => f.write_str("local"),
            ExecutionMode::PublicNetwork => f.write_str("public-network"),
        }
    }
}

/// RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Development node URL.
    pub local: String,

    /// Public network URL.
    pub mainnet: String,

    /// Failover URLs for the public network.
    pub mainnet_failover: Vec<String>,

    /// RPC request timeout in seconds.
    pub timeout_secs: u64,
}

impl RpcConfig {
    /// Endpoint the signing wallet talks to in `mode`.
    pub fn endpoint(&self, mode: ExecutionMode) -> RpcEndpoint {
        match mode {
            ExecutionMode::Local => RpcEndpoint {
                url: self.local.clone(),
                failover_urls: Vec::new(),
                timeout_secs: self.timeout_secs,
            },
            ExecutionMode::PublicNetwork => self.mainnet_endpoint(),
        }
    }

    /// Read-only public network endpoint.
    pub fn mainnet_endpoint(&self) -> RpcEndpoint {
        RpcEndpoint {
            url: self.mainnet.clone(),
            failover_urls: self.mainnet_failover.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            local: "http://localhost:8545".to_string(),
            mainnet: "https://eth.llamarpc.com".to_string(),
            mainnet_failover: Vec::new(),
            timeout_secs: 10,
        }
    }
}

/// Local wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Name of the environment variable holding the private key.
    pub private_key_env: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            private_key_env: PRIVATE_KEY_ENV_VAR.to_string(),
        }
    }
}

/// Extension wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// JSON-RPC bridge URL; absent means no extension is installed.
    pub url: Option<String>,

    /// Per-request timeout in seconds (covers the user's approval prompt).
    pub request_timeout_secs: u64,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            url: None,
            request_timeout_secs: 120,
        }
    }
}

/// Receipt polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Delay after the first empty poll, in milliseconds.
    pub poll_interval_ms: u64,

    /// Upper bound for the backoff delay, in milliseconds.
    pub max_poll_interval_ms: u64,

    /// Polls before giving up.
    pub max_attempts: u32,

    /// Deadline for the whole wait, in seconds.
    pub timeout_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            max_poll_interval_ms: 8_000,
            max_attempts: 120,
            timeout_secs: 180,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
