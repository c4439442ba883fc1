//! Seams between the submitters and the outside world.
//!
//! Each concrete adapter in this module tree implements one of these, and the
//! submitters only ever hold trait objects, so tests can swap in doubles.

use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::blockchain::types::{BlockchainResult, ChainId, Receipt};

/// Read access to chain state over an RPC transport.
#[async_trait]
pub trait ChainConnection: Send + Sync {
    /// Fetch the receipt for `tx_hash`, `None` while still pending.
    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<Receipt>>;

    /// Latest block number.
    async fn get_block_number(&self) -> BlockchainResult<u64>;

    async fn get_chain_id(&self) -> BlockchainResult<ChainId>;

    /// Balance of `address` in wei.
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256>;

    /// Whether the node answers a block number query.
    async fn is_healthy(&self) -> bool {
        self.get_block_number().await.is_ok()
    }
}

/// A wallet holding key material and bound to a connection.
#[async_trait]
pub trait LocalSigner: Send + Sync {
    fn address(&self) -> Address;

    /// Sign `tx` and broadcast it, returning the transaction hash.
    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash>;

    /// The connection this wallet broadcasts through, if it has one.
    fn connection(&self) -> Option<Arc<dyn ChainConnection>>;
}

/// A user-controlled wallet reached through request/response calls.
#[async_trait]
pub trait ExtensionProvider: Send + Sync {
    /// Issue a JSON-RPC style request such as `eth_requestAccounts`.
    async fn request(&self, method: &str, params: Value) -> BlockchainResult<Value>;

    /// Drop the permissions granted to this application.
    async fn disconnect(&self) -> BlockchainResult<()>;
}
