//! Caller-facing transaction request and its conversion for the network layer.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use serde::{Deserialize, Serialize};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Amount of wei to send, as a caller wrote it.
///
/// JSON numbers and strings are both accepted; strings may be decimal or
/// `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TxValue {
    Numeric(u64),
    Text(String),
}

impl TxValue {
    /// Convert into the big-integer representation used on the wire.
    pub fn to_u256(&self) -> BlockchainResult<U256> {
        match self {
            TxValue::Numeric(n) => Ok(U256::from(*n)),
            TxValue::Text(s) => s
                .trim()
                .parse::<U256>()
                .map_err(|_| BlockchainError::InvalidValue(s.clone())),
        }
    }
}

impl From<u64> for TxValue {
    fn from(value: u64) -> Self {
        TxValue::Numeric(value)
    }
}

/// A transaction as described by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<TxValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

impl TxRequest {
    /// Simple value transfer to `to`.
    pub fn transfer(to: Address, value: impl Into<TxValue>) -> Self {
        Self {
            to: Some(to),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Normalize into the network layer's request type.
    ///
    /// Consumes the request, so a value is converted exactly once.
    pub fn into_transaction_request(self) -> BlockchainResult<TransactionRequest> {
        let mut tx = TransactionRequest::default();

        if let Some(value) = &self.value {
            tx.set_value(value.to_u256()?);
        }
        if let Some(from) = self.from {
            tx.set_from(from);
        }
        if let Some(to) = self.to {
            tx.set_to(to);
        }
        if let Some(data) = self.data {
            tx.set_input(data);
        }
        if let Some(gas_limit) = self.gas_limit {
            tx.set_gas_limit(gas_limit);
        }
        if let Some(gas_price) = self.gas_price {
            tx.set_gas_price(gas_price);
        }
        if let Some(max_fee) = self.max_fee_per_gas {
            tx.set_max_fee_per_gas(max_fee);
        }
        if let Some(priority_fee) = self.max_priority_fee_per_gas {
            tx.set_max_priority_fee_per_gas(priority_fee);
        }
        if let Some(nonce) = self.nonce {
            tx.set_nonce(nonce);
        }
        if let Some(chain_id) = self.chain_id {
            tx.set_chain_id(chain_id);
        }

        Ok(tx)
    }
}
