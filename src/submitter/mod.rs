//! Transaction submission.
//!
//! # Data Flow
//! ```text
//! TxRequest
//!     → into_transaction_request (value → U256, once)
//!     → extension.rs: eth_sendTransaction via the user's wallet
//!       or
//!     → local.rs: sign + broadcast with the local wallet
//!                 → confirm.rs: poll for the receipt
//!     → TransactionState
//! ```
//!
//! The path is chosen when the submitter is built, never per call.

pub mod confirm;
pub mod extension;
pub mod local;

use async_trait::async_trait;

use crate::blockchain::transaction::TxRequest;
use crate::blockchain::types::TransactionState;

pub use confirm::{Confirmation, ConfirmationPoller};
pub use extension::ExtensionSubmitter;
pub use local::LocalWalletSubmitter;

/// Delivers a transaction and reports how it ended.
///
/// Implementations never fail: every error is logged and folded into the
/// returned state.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(&self, request: TxRequest) -> TransactionState;

    /// Short label for logs and metrics.
    fn path(&self) -> &'static str;
}
