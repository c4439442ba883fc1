//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key), config (RPC / bridge URLs)
//!     → wallet.rs (key loading, signing, broadcast)
//!     → client.rs (read-only RPC with timeouts and failover)
//!     → extension.rs (user wallet over a JSON-RPC bridge)
//!     → transaction.rs (caller request → wire request)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod extension;
pub mod traits;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{BlockchainClient, RpcEndpoint};
pub use extension::RpcExtension;
pub use traits::{ChainConnection, ExtensionProvider, LocalSigner};
pub use transaction::{TxRequest, TxValue};
pub use types::{BlockchainError, BlockchainResult, ChainId, Receipt, TransactionState};
pub use wallet::Wallet;
