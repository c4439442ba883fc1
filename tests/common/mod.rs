//! In-memory doubles for the blockchain seams.

#![allow(dead_code)]

use alloy::primitives::{Address, TxHash, B256, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use tx_submitter::blockchain::{
    BlockchainError, BlockchainResult, ChainConnection, ChainId, ExtensionProvider, LocalSigner,
    Receipt,
};
use tx_submitter::config::ConfirmationConfig;

pub const TX_HASH: TxHash = B256::repeat_byte(0x11);

/// Anvil account #0.
pub fn test_address() -> Address {
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
}

/// Fast polling so tests do not depend on paused time.
pub fn fast_confirmation(max_attempts: u32) -> ConfirmationConfig {
    ConfirmationConfig {
        poll_interval_ms: 1,
        max_poll_interval_ms: 5,
        max_attempts,
        timeout_secs: 30,
    }
}

pub fn receipt(status: bool) -> Receipt {
    Receipt {
        transaction_hash: TX_HASH,
        block_number: Some(42),
        status,
        gas_used: 21_000,
    }
}

/// What a scripted receipt poll returns.
#[derive(Clone)]
pub enum Poll {
    Pending,
    Receipt(Receipt),
    Error,
}

pub const TEST_BALANCE: u64 = 1_000_000_000_000_000_000;

/// Connection that replays a script; pending once the script runs out.
#[derive(Default)]
pub struct MockConnection {
    script: Mutex<VecDeque<Poll>>,
    pub polls: AtomicU32,
    pub down: bool,
}

impl MockConnection {
    pub fn scripted(script: Vec<Poll>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            polls: AtomicU32::new(0),
            down: false,
        })
    }

    /// A node that refuses every read.
    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            down: true,
            ..Default::default()
        })
    }

    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainConnection for MockConnection {
    async fn get_transaction_receipt(&self, _tx_hash: TxHash) -> BlockchainResult<Option<Receipt>> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front().unwrap_or(Poll::Pending);
        match next {
            Poll::Pending => Ok(None),
            Poll::Receipt(r) => Ok(Some(r)),
            Poll::Error => Err(BlockchainError::Rpc("connection reset".to_string())),
        }
    }

    async fn get_block_number(&self) -> BlockchainResult<u64> {
        if self.down {
            return Err(BlockchainError::Rpc("connection refused".to_string()));
        }
        Ok(42)
    }

    async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        Ok(ChainId(31337))
    }

    async fn get_balance(&self, _address: Address) -> BlockchainResult<U256> {
        Ok(U256::from(TEST_BALANCE))
    }
}

/// Signer that records what it was asked to send.
pub struct MockSigner {
    pub address: Address,
    pub connection: Option<Arc<MockConnection>>,
    pub fail_broadcast: bool,
    pub sent: Mutex<Vec<TransactionRequest>>,
}

impl MockSigner {
    pub fn new(connection: Option<Arc<MockConnection>>) -> Arc<Self> {
        Arc::new(Self {
            address: test_address(),
            connection,
            fail_broadcast: false,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(connection: Arc<MockConnection>) -> Arc<Self> {
        Arc::new(Self {
            address: test_address(),
            connection: Some(connection),
            fail_broadcast: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl LocalSigner for MockSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        self.sent.lock().unwrap().push(tx);
        if self.fail_broadcast {
            return Err(BlockchainError::Rpc("nonce too low".to_string()));
        }
        Ok(TX_HASH)
    }

    fn connection(&self) -> Option<Arc<dyn ChainConnection>> {
        self.connection.clone().map(|c| c as Arc<dyn ChainConnection>)
    }
}

/// Extension that answers each method with a fixed result.
pub struct MockExtension {
    pub accounts: BlockchainResult<Value>,
    pub send_result: Result<Value, String>,
    pub disconnect_fails: bool,
    pub requests: Mutex<Vec<(String, Value)>>,
    pub disconnects: AtomicU32,
}

impl MockExtension {
    pub fn new(accounts: Value, send_result: Result<Value, String>) -> Arc<Self> {
        Arc::new(Self {
            accounts: Ok(accounts),
            send_result,
            disconnect_fails: false,
            requests: Mutex::new(Vec::new()),
            disconnects: AtomicU32::new(0),
        })
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtensionProvider for MockExtension {
    async fn request(&self, method: &str, params: Value) -> BlockchainResult<Value> {
        self.requests.lock().unwrap().push((method.to_string(), params));
        match method {
            "eth_requestAccounts" => match &self.accounts {
                Ok(v) => Ok(v.clone()),
                Err(e) => Err(BlockchainError::Extension(e.to_string())),
            },
            "eth_sendTransaction" => self.send_result.clone().map_err(BlockchainError::Extension),
            other => Err(BlockchainError::Extension(format!("unsupported method {}", other))),
        }
    }

    async fn disconnect(&self) -> BlockchainResult<()> {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
        if self.disconnect_fails {
            return Err(BlockchainError::Extension("user closed the wallet".to_string()));
        }
        Ok(())
    }
}
