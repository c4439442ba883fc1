//! Submission through the locally held wallet.

use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::traits::LocalSigner;
use crate::blockchain::transaction::TxRequest;
use crate::blockchain::types::TransactionState;
use crate::observability::metrics;
use crate::submitter::confirm::{Confirmation, ConfirmationPoller};
use crate::submitter::TransactionSubmitter;

/// Signs with the local key, broadcasts, then waits for the receipt.
pub struct LocalWalletSubmitter {
    wallet: Option<Arc<dyn LocalSigner>>,
    poller: ConfirmationPoller,
}

impl LocalWalletSubmitter {
    pub fn new(wallet: Option<Arc<dyn LocalSigner>>, poller: ConfirmationPoller) -> Self {
        Self { wallet, poller }
    }

    async fn send(&self, request: TxRequest) -> TransactionState {
        let Some(wallet) = &self.wallet else {
            tracing::warn!("No local wallet configured");
            return TransactionState::Failed;
        };

        let tx = match request.into_transaction_request() {
            Ok(tx) => tx,
            Err(e) => {
                tracing::warn!(error = %e, "Transaction request could not be normalized");
                return TransactionState::Failed;
            }
        };

        let tx_hash = match wallet.send_transaction(tx).await {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(from = %wallet.address(), error = %e, "Broadcast failed");
                return TransactionState::Failed;
            }
        };

        let Some(connection) = wallet.connection() else {
            tracing::warn!(tx_hash = %tx_hash, "No connection to poll for the receipt");
            return TransactionState::Failed;
        };

        match self.poller.wait(connection.as_ref(), tx_hash).await {
            Confirmation::Confirmed(receipt) => {
                if !receipt.status {
                    tracing::warn!(
                        tx_hash = %tx_hash,
                        block_number = ?receipt.block_number,
                        "Transaction mined but reverted"
                    );
                } else {
                    tracing::info!(
                        tx_hash = %tx_hash,
                        block_number = ?receipt.block_number,
                        gas_used = receipt.gas_used,
                        "Transaction confirmed"
                    );
                }
                TransactionState::Sent
            }
            Confirmation::Errored(_) => TransactionState::Failed,
            Confirmation::TimedOut => TransactionState::TimedOut,
            Confirmation::Cancelled => TransactionState::Failed,
        }
    }
}

#[async_trait]
impl TransactionSubmitter for LocalWalletSubmitter {
    async fn submit(&self, request: TxRequest) -> TransactionState {
        let state = self.send(request).await;
        metrics::record_submission(self.path(), state);
        state
    }

    fn path(&self) -> &'static str {
        "local"
    }
}
