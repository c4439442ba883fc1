//! Submission through the user's extension wallet.

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::rpc::types::TransactionInput;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::blockchain::traits::ExtensionProvider;
use crate::blockchain::transaction::TxRequest;
use crate::blockchain::types::TransactionState;
use crate::observability::metrics;
use crate::submitter::TransactionSubmitter;

/// Hands transactions to the extension in a single call; the user signs.
pub struct ExtensionSubmitter {
    extension: Option<Arc<dyn ExtensionProvider>>,
    /// Address from the last successful account request, shared with `Providers`.
    account: Arc<ArcSwapOption<Address>>,
}

impl ExtensionSubmitter {
    pub fn new(
        extension: Option<Arc<dyn ExtensionProvider>>,
        account: Arc<ArcSwapOption<Address>>,
    ) -> Self {
        Self { extension, account }
    }

    async fn send(&self, request: TxRequest) -> TransactionState {
        let Some(extension) = &self.extension else {
            tracing::warn!("No extension wallet available, transaction rejected");
            return TransactionState::Rejected;
        };

        let mut tx = match request.into_transaction_request() {
            Ok(tx) => tx,
            Err(e) => {
                tracing::warn!(error = %e, "Transaction request could not be normalized");
                return TransactionState::Failed;
            }
        };

        if tx.from.is_none() {
            if let Some(account) = self.account.load_full() {
                tx.set_from(*account);
            }
        }

        // Injected wallets read calldata from `data`, nodes from `input`.
        if let Some(data) = tx.input.input().cloned() {
            tx.input = TransactionInput::both(data);
        }

        let params = match serde_json::to_value([&tx]) {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!(error = %e, "Transaction request could not be encoded");
                return TransactionState::Failed;
            }
        };

        match extension.request("eth_sendTransaction", params).await {
            Ok(response) if is_truthy(&response) => {
                tracing::info!(response = %response, "Transaction accepted by extension wallet");
                TransactionState::Sent
            }
            Ok(response) => {
                tracing::warn!(response = %response, "Extension wallet returned an empty response");
                TransactionState::Failed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Extension wallet rejected transaction");
                TransactionState::Rejected
            }
        }
    }
}

#[async_trait]
impl TransactionSubmitter for ExtensionSubmitter {
    async fn submit(&self, request: TxRequest) -> TransactionState {
        let state = self.send(request).await;
        metrics::record_submission(self.path(), state);
        state
    }

    fn path(&self) -> &'static str {
        "extension"
    }
}

/// JavaScript-style truthiness of a JSON-RPC result.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
