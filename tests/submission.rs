//! End-to-end submission behaviour over in-memory doubles.

use alloy::primitives::{Address, Bytes, U256};
use serde_json::json;
use std::sync::Arc;

use tx_submitter::config::{ConfirmationConfig, ExecutionMode};
use tx_submitter::{Providers, Shutdown, TransactionState, TxRequest, TxValue};

mod common;
use common::{fast_confirmation, receipt, MockConnection, MockExtension, MockSigner, Poll};

fn destination() -> Address {
    "0x0000000000000000000000000000000000000abc".parse().unwrap()
}

fn local(signer: Arc<MockSigner>, confirmation: ConfirmationConfig) -> Providers {
    Providers::builder(ExecutionMode::Local)
        .wallet(signer)
        .confirmation(confirmation)
        .build()
}

fn public(extension: Option<Arc<MockExtension>>) -> Providers {
    let mut builder = Providers::builder(ExecutionMode::PublicNetwork);
    if let Some(extension) = extension {
        builder = builder.extension(extension);
    }
    builder.build()
}

#[tokio::test]
async fn test_local_receipt_on_third_poll() {
    let connection = MockConnection::scripted(vec![
        Poll::Pending,
        Poll::Pending,
        Poll::Receipt(receipt(true)),
    ]);
    let signer = MockSigner::new(Some(connection.clone()));
    let providers = local(signer.clone(), fast_confirmation(10));

    let request = TxRequest {
        to: Some(destination()),
        value: Some(TxValue::Numeric(100)),
        ..Default::default()
    };
    let state = providers.send_transaction(request).await;

    assert_eq!(state, TransactionState::Sent);
    assert_eq!(connection.poll_count(), 3);

    let sent = signer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].value, Some(U256::from(100u64)));
}

#[tokio::test]
async fn test_local_reverted_receipt_still_sent() {
    let connection = MockConnection::scripted(vec![Poll::Receipt(receipt(false))]);
    let providers = local(MockSigner::new(Some(connection.clone())), fast_confirmation(10));

    let state = providers.send_transaction(TxRequest::transfer(destination(), 1u64)).await;
    assert_eq!(state, TransactionState::Sent);
    assert_eq!(connection.poll_count(), 1);
}

#[tokio::test]
async fn test_local_without_connection_skips_polling() {
    let signer = MockSigner::new(None);
    let providers = local(signer.clone(), fast_confirmation(10));

    assert!(providers.provider().is_none());
    let state = providers.send_transaction(TxRequest::transfer(destination(), 5u64)).await;

    assert_eq!(state, TransactionState::Failed);
    // Broadcast happens before the connection is resolved.
    assert_eq!(signer.sent().len(), 1);
}

#[tokio::test]
async fn test_local_poll_error_fails() {
    for failing_attempt in 1..=3usize {
        let mut script = vec![Poll::Pending; failing_attempt - 1];
        script.push(Poll::Error);
        script.push(Poll::Receipt(receipt(true)));
        let connection = MockConnection::scripted(script);
        let providers = local(MockSigner::new(Some(connection.clone())), fast_confirmation(10));

        let state = providers.send_transaction(TxRequest::transfer(destination(), 1u64)).await;
        assert_eq!(state, TransactionState::Failed);
        assert_eq!(connection.poll_count() as usize, failing_attempt);
    }
}

#[tokio::test]
async fn test_local_broadcast_error_fails() {
    let connection = MockConnection::scripted(vec![Poll::Receipt(receipt(true))]);
    let providers = local(MockSigner::failing(connection.clone()), fast_confirmation(10));

    let state = providers.send_transaction(TxRequest::transfer(destination(), 1u64)).await;
    assert_eq!(state, TransactionState::Failed);
    assert_eq!(connection.poll_count(), 0);
}

#[tokio::test]
async fn test_local_invalid_value_never_broadcast() {
    let signer = MockSigner::new(Some(MockConnection::scripted(vec![])));
    let providers = local(signer.clone(), fast_confirmation(10));

    let request = TxRequest {
        to: Some(destination()),
        value: Some(TxValue::Text("ten".to_string())),
        ..Default::default()
    };
    assert_eq!(providers.send_transaction(request).await, TransactionState::Failed);
    assert!(signer.sent().is_empty());
}

#[tokio::test]
async fn test_local_times_out_after_attempts() {
    let connection = MockConnection::scripted(vec![]);
    let providers = local(MockSigner::new(Some(connection.clone())), fast_confirmation(4));

    let state = providers.send_transaction(TxRequest::transfer(destination(), 1u64)).await;
    assert_eq!(state, TransactionState::TimedOut);
    assert_eq!(connection.poll_count(), 4);
}

#[tokio::test]
async fn test_local_cancelled_by_shutdown() {
    let shutdown = Shutdown::new();
    shutdown.trigger();
    let connection = MockConnection::scripted(vec![Poll::Receipt(receipt(true))]);
    let providers = Providers::builder(ExecutionMode::Local)
        .wallet(MockSigner::new(Some(connection.clone())))
        .confirmation(fast_confirmation(10))
        .shutdown(shutdown)
        .build();

    let state = providers.send_transaction(TxRequest::transfer(destination(), 1u64)).await;
    assert_eq!(state, TransactionState::Failed);
    assert_eq!(connection.poll_count(), 0);
}

#[tokio::test]
async fn test_extension_truthy_response_sent() {
    let extension = MockExtension::new(json!([]), Ok(json!("0x5e1f")));
    let providers = public(Some(extension.clone()));

    let state = providers.send_transaction(TxRequest::transfer(destination(), 100u64)).await;
    assert_eq!(state, TransactionState::Sent);

    let requests = extension.requests();
    assert_eq!(requests.len(), 1);
    let (method, params) = &requests[0];
    assert_eq!(method, "eth_sendTransaction");
    // The value reaches the wallet as a hex quantity.
    assert_eq!(params[0]["value"], json!("0x64"));
}

#[tokio::test]
async fn test_extension_falsy_responses_fail() {
    for response in [json!(""), json!(null), json!(false), json!(0)] {
        let providers = public(Some(MockExtension::new(json!([]), Ok(response.clone()))));
        let state = providers.send_transaction(TxRequest::transfer(destination(), 1u64)).await;
        assert_eq!(state, TransactionState::Failed, "response {}", response);
    }
}

#[tokio::test]
async fn test_extension_error_rejected() {
    let extension = MockExtension::new(json!([]), Err("User denied transaction signature".to_string()));
    let providers = public(Some(extension));

    let state = providers.send_transaction(TxRequest::transfer(destination(), 1u64)).await;
    assert_eq!(state, TransactionState::Rejected);
}

#[tokio::test]
async fn test_missing_extension_rejected() {
    let providers = public(None);
    assert!(providers.provider().is_none());

    let state = providers.send_transaction(TxRequest::transfer(destination(), 1u64)).await;
    assert_eq!(state, TransactionState::Rejected);
}

#[tokio::test]
async fn test_extension_fills_sender_from_connected_account() {
    let account = common::test_address();
    let extension = MockExtension::new(json!([account]), Ok(json!("0x5e1f")));
    let providers = public(Some(extension.clone()));

    assert_eq!(providers.connect_extension_wallet().await, Some(account));
    let state = providers.send_transaction(TxRequest::transfer(destination(), 1u64)).await;
    assert_eq!(state, TransactionState::Sent);

    let requests = extension.requests();
    let (_, params) = requests.last().unwrap();
    let from: Address = serde_json::from_value(params[0]["from"].clone()).unwrap();
    assert_eq!(from, account);
}

#[tokio::test]
async fn test_extension_calldata_sent_as_data() {
    let extension = MockExtension::new(json!([]), Ok(json!("0x5e1f")));
    let providers = public(Some(extension.clone()));

    let request = TxRequest {
        data: Some(Bytes::from(vec![0x01, 0x02])),
        ..TxRequest::transfer(destination(), 1u64)
    };
    assert_eq!(providers.send_transaction(request).await, TransactionState::Sent);

    let requests = extension.requests();
    let (_, params) = &requests[0];
    assert_eq!(params[0]["data"], json!("0x0102"));
    assert_eq!(params[0]["input"], json!("0x0102"));
}

#[tokio::test]
async fn test_extension_invalid_value_never_requested() {
    let extension = MockExtension::new(json!([]), Ok(json!("0x5e1f")));
    let providers = public(Some(extension.clone()));

    let request = TxRequest {
        to: Some(destination()),
        value: Some(TxValue::Text("-1".to_string())),
        ..Default::default()
    };
    assert_eq!(providers.send_transaction(request).await, TransactionState::Failed);
    assert!(extension.requests().is_empty());
}

#[tokio::test]
async fn test_extension_keeps_explicit_sender() {
    let account = common::test_address();
    let explicit: Address = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap();
    let extension = MockExtension::new(json!([account]), Ok(json!("0x5e1f")));
    let providers = public(Some(extension.clone()));

    providers.connect_extension_wallet().await;
    let request = TxRequest {
        from: Some(explicit),
        ..TxRequest::transfer(destination(), 1u64)
    };
    assert_eq!(providers.send_transaction(request).await, TransactionState::Sent);

    let requests = extension.requests();
    let (_, params) = requests.last().unwrap();
    let from: Address = serde_json::from_value(params[0]["from"].clone()).unwrap();
    assert_eq!(from, explicit);
}
