//! Waiting for a broadcast transaction to land.
//!
//! # Policy
//! - First receipt ends the wait, whatever its status
//! - A failed receipt query ends the wait (no retry)
//! - Empty polls back off exponentially, bounded by `max_attempts`
//! - The whole wait is bounded by `timeout_secs`
//! - A shutdown trigger cancels the wait

use alloy::primitives::TxHash;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::blockchain::traits::ChainConnection;
use crate::blockchain::types::{BlockchainError, Receipt};
use crate::config::ConfirmationConfig;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::resilience::calculate_backoff;

/// How a confirmation wait ended.
#[derive(Debug)]
pub enum Confirmation {
    Confirmed(Receipt),
    /// The receipt query itself failed.
    Errored(BlockchainError),
    TimedOut,
    Cancelled,
}

/// Polls a connection for a transaction receipt.
#[derive(Debug, Clone)]
pub struct ConfirmationPoller {
    config: ConfirmationConfig,
    shutdown: Shutdown,
}

impl ConfirmationPoller {
    pub fn new(config: ConfirmationConfig, shutdown: Shutdown) -> Self {
        Self { config, shutdown }
    }

    /// Wait for the receipt of `tx_hash`.
    pub async fn wait(&self, connection: &dyn ChainConnection, tx_hash: TxHash) -> Confirmation {
        // Subscribe before checking the latch so a concurrent trigger is not lost.
        let mut shutdown_rx = self.shutdown.subscribe();
        if self.shutdown.is_triggered() {
            return Confirmation::Cancelled;
        }

        let deadline = Duration::from_secs(self.config.timeout_secs);

        tokio::select! {
            result = timeout(deadline, self.poll(connection, tx_hash)) => match result {
                Ok(confirmation) => confirmation,
                Err(_) => {
                    tracing::warn!(
                        tx_hash = %tx_hash,
                        timeout_secs = self.config.timeout_secs,
                        "Confirmation deadline passed"
                    );
                    Confirmation::TimedOut
                }
            },
            _ = shutdown_rx.recv() => {
                tracing::info!(tx_hash = %tx_hash, "Confirmation wait cancelled");
                Confirmation::Cancelled
            }
        }
    }

    async fn poll(&self, connection: &dyn ChainConnection, tx_hash: TxHash) -> Confirmation {
        let base = Duration::from_millis(self.config.poll_interval_ms);
        let max = Duration::from_millis(self.config.max_poll_interval_ms);
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match connection.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    metrics::record_receipt_poll("receipt");
                    tracing::debug!(tx_hash = %tx_hash, attempt, "Receipt received");
                    return Confirmation::Confirmed(receipt);
                }
                Ok(None) => {
                    metrics::record_receipt_poll("pending");
                    tracing::debug!(tx_hash = %tx_hash, attempt, "Transaction pending");
                }
                Err(e) => {
                    metrics::record_receipt_poll("error");
                    tracing::warn!(tx_hash = %tx_hash, attempt, error = %e, "Receipt error");
                    return Confirmation::Errored(e);
                }
            }

            if attempt >= self.config.max_attempts {
                tracing::warn!(tx_hash = %tx_hash, attempts = attempt, "No receipt after max attempts");
                return Confirmation::TimedOut;
            }

            sleep(calculate_backoff(attempt, base, max)).await;
        }
    }
}
