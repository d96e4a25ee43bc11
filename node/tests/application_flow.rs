// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use beacon_proof_kernel::{Chunk, HeaderField};
use beacon_proof_node::app::Application;
use beacon_proof_node::errors::NodeError;
use common::{config_for, header_for, start, timestamp_of, CallFault, MockChain};

#[tokio::test]
async fn test_configured_slot_is_keyed_by_next_filled_slot() {
    let url = start(MockChain::with_slots(&[100, 102, 103])).await;
    let app = Application::new(config_for(&url)).unwrap();

    let proven = app.header_at(100).await.unwrap();
    assert_eq!(proven.slot, 100);
    assert_eq!(proven.header, header_for(100));
    assert_eq!(proven.timestamp, timestamp_of(100));
    assert_eq!(proven.oracle_key, timestamp_of(102));
    assert_eq!(proven.timestamp_gap(), 2 * 12);
    assert_eq!(proven.reported_root, Some(header_for(100).root()));
}

#[tokio::test]
async fn test_default_target_is_parent_of_head() {
    let url = start(MockChain::with_slots(&[100, 102, 105])).await;
    let app = Application::new(config_for(&url)).unwrap();

    let proven = app.resolve().await.unwrap();
    assert_eq!(proven.slot, 102);
    assert_eq!(proven.oracle_key, timestamp_of(105));
}

#[tokio::test]
async fn test_run_verifies_every_field_end_to_end() {
    let url = start(MockChain::with_slots(&[100, 102, 103])).await;
    let mut cfg = config_for(&url);
    cfg.slot = Some(100);
    let app = Application::connect(cfg).await.unwrap();
    assert!(app.remote_enabled());

    let summary = app.run().await.unwrap();
    assert_eq!(summary.slot, 100);
    assert_eq!(summary.oracle_key, timestamp_of(102));
    assert_eq!(summary.timestamp_gap, 24);
    assert_eq!(summary.outcomes.len(), HeaderField::ALL.len());
    for outcome in &summary.outcomes {
        assert_eq!(outcome.local, Some(true));
        assert_eq!(outcome.oracle, Some(true));
        assert_eq!(outcome.remote, Some(true));
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    }
    assert!(summary.all_passed());
}

#[tokio::test]
async fn test_run_from_head() {
    let url = start(MockChain::with_slots(&[100, 102, 103])).await;
    let app = Application::connect(config_for(&url)).await.unwrap();

    let summary = app.run().await.unwrap();
    assert_eq!(summary.slot, 102);
    assert!(summary.all_passed());
}

#[tokio::test]
async fn test_forged_oracle_root_fails_the_run() {
    let mut chain = MockChain::with_slots(&[100, 102]);
    chain.oracle.insert(timestamp_of(102), Chunk::filled(0x99));
    let url = start(chain).await;
    let mut cfg = config_for(&url);
    cfg.slot = Some(100);
    let app = Application::connect(cfg).await.unwrap();

    let summary = app.run().await.unwrap();
    for outcome in &summary.outcomes {
        assert_eq!(outcome.local, Some(true));
        assert_eq!(outcome.oracle, Some(false));
        assert_eq!(outcome.remote, Some(false));
    }
    assert_eq!(summary.failed(), summary.outcomes.len());
    assert!(!summary.all_passed());
}

#[tokio::test]
async fn test_missing_oracle_entry_is_recorded_per_field() {
    let mut chain = MockChain::with_slots(&[100, 102]);
    chain.oracle.clear();
    let url = start(chain).await;
    let mut cfg = config_for(&url);
    cfg.slot = Some(100);
    cfg.verification.fields_to_verify = vec![HeaderField::Slot, HeaderField::StateRoot];
    let app = Application::connect(cfg).await.unwrap();

    let summary = app.run().await.unwrap();
    assert_eq!(summary.outcomes.len(), 2);
    for outcome in &summary.outcomes {
        assert_eq!(outcome.local, Some(true));
        assert_eq!(outcome.oracle, None);
        assert_eq!(outcome.errors.len(), 2, "{:?}", outcome.errors);
        assert!(outcome.errors[0].contains("no root recorded"), "{:?}", outcome.errors);
        assert!(outcome.errors[1].contains("execution reverted"), "{:?}", outcome.errors);
    }
    assert!(!summary.all_passed());
}

#[tokio::test]
async fn test_unreachable_execution_node_skips_remote_checks() {
    let url = start(MockChain::with_slots(&[100, 102])).await;
    let mut cfg = config_for(&url);
    cfg.slot = Some(100);
    cfg.ethereum_node.endpoint = "http://127.0.0.1:1".to_string();
    let app = Application::connect(cfg).await.unwrap();
    assert!(!app.remote_enabled());

    let summary = app.run().await.unwrap();
    for outcome in &summary.outcomes {
        assert_eq!(outcome.local, Some(true));
        assert_eq!(outcome.oracle, None);
        assert_eq!(outcome.remote, None);
    }
    assert!(summary.all_passed());
}

#[tokio::test]
async fn test_chain_id_mismatch_still_connects() {
    let url = start(MockChain::with_slots(&[100, 102])).await;
    let mut cfg = config_for(&url);
    cfg.ethereum_node.chain_id = 1;
    let app = Application::connect(cfg).await.unwrap();
    assert!(app.remote_enabled());
}

#[tokio::test]
async fn test_unknown_slot_fails_resolution() {
    let url = start(MockChain::with_slots(&[100, 102])).await;
    let mut cfg = config_for(&url);
    cfg.slot = Some(90);
    cfg.beacon_api.retry_attempts = 2;
    let app = Application::new(cfg).unwrap();

    let err = app.run().await.unwrap_err();
    assert!(matches!(err, NodeError::SlotNotFound(_)), "{:?}", err);
}

#[tokio::test]
async fn test_malformed_call_answers_keep_their_own_errors() {
    let mut chain = MockChain::with_slots(&[100, 102]);
    chain.call_fault = Some(CallFault::Malformed);
    let url = start(chain).await;
    let mut cfg = config_for(&url);
    cfg.slot = Some(100);
    let app = Application::connect(cfg).await.unwrap();
    assert!(app.remote_enabled());

    let summary = app.run().await.unwrap();
    assert_eq!(summary.failed(), summary.outcomes.len());
    for outcome in &summary.outcomes {
        assert_eq!(outcome.local, Some(true));
        assert_eq!(outcome.oracle, None);
        assert_eq!(outcome.remote, None);
        assert_eq!(outcome.errors.len(), 2, "{:?}", outcome.errors);
        assert!(
            outcome.errors[0].contains("oracle returned 2 bytes, expected 32"),
            "{:?}",
            outcome.errors
        );
        assert!(outcome.errors[1].starts_with("ABI error"), "{:?}", outcome.errors);
        assert!(outcome.errors.iter().all(|e| !e.contains("no root recorded")));
    }
}

#[tokio::test]
async fn test_execution_node_fault_is_not_reported_as_missing_root() {
    let mut chain = MockChain::with_slots(&[100, 102]);
    chain.call_fault = Some(CallFault::NodeFault);
    let url = start(chain).await;
    let mut cfg = config_for(&url);
    cfg.slot = Some(100);
    cfg.verification.fields_to_verify = vec![HeaderField::BodyRoot];
    let app = Application::connect(cfg).await.unwrap();

    let summary = app.run().await.unwrap();
    let outcome = &summary.outcomes[0];
    assert!(!outcome.passed());
    assert!(outcome.errors[0].contains("-32000"), "{:?}", outcome.errors);
    assert!(outcome.errors.iter().all(|e| !e.contains("no root recorded")));
}
