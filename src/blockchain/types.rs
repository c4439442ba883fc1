//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Invalid private key format or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The extension wallet refused or failed a request.
    #[error("Extension error: {0}")]
    Extension(String),

    /// A transaction value could not be converted to a 256-bit integer.
    #[error("Invalid transaction value '{0}'")]
    InvalidValue(String),

    /// Wallet, extension or connection not initialized.
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Terminal outcome of a submission.
///
/// `New` and `Sending` are part of the public vocabulary but the submitters
/// only ever report `Sent`, `Rejected`, `Failed` or `TimedOut`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionState {
    New,
    Sending,
    Sent,
    Rejected,
    Failed,
    /// Confirmation polling ran out of attempts or hit its deadline.
    TimedOut,
}

impl TransactionState {
    /// Stable lowercase label, used for metrics and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionState::New => "new",
            TransactionState::Sending => "sending",
            TransactionState::Sent => "sent",
            TransactionState::Rejected => "rejected",
            TransactionState::Failed => "failed",
            TransactionState::TimedOut => "timed_out",
        }
    }
}

impl std::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields of a transaction receipt this crate cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    /// `true` when the transaction executed successfully.
    pub status: bool,
    pub gas_used: u64,
}

impl From<alloy::rpc::types::TransactionReceipt> for Receipt {
    fn from(receipt: alloy::rpc::types::TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            status: receipt.status(),
            gas_used: receipt.gas_used,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(1u64);
        assert_eq!(chain_id.0, 1);
        assert_eq!(u64::from(chain_id), 1);
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = BlockchainError::InvalidValue("12abc".to_string());
        assert!(err.to_string().contains("12abc"));
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(TransactionState::Sent.to_string(), "sent");
        assert_eq!(TransactionState::TimedOut.as_str(), "timed_out");
    }
}
