//! Ethereum transaction submitter.
//!
//! Sends transactions either through a locally held private key (development
//! nodes) or through the user's extension wallet (public network), and
//! reports a single terminal [`TransactionState`] per submission.

pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod providers;
pub mod resilience;
pub mod submitter;

pub use blockchain::{TransactionState, TxRequest, TxValue};
pub use config::{ExecutionMode, SubmitterConfig};
pub use lifecycle::Shutdown;
pub use providers::{ActiveProvider, Providers};
pub use submitter::TransactionSubmitter;
