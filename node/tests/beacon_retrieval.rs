// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use std::time::Duration;

use beacon_proof_kernel::codec::decode_header;
use beacon_proof_node::app::Application;
use beacon_proof_node::beacon::{BeaconClient, Direction};
use beacon_proof_node::errors::NodeError;
use common::{config_for, header_for, start, timestamp_of, MockChain, MockSlot};

#[tokio::test]
async fn test_fetch_header_decodes_fields_and_timestamp() {
    let url = start(MockChain::with_slots(&[100, 102])).await;
    let client = BeaconClient::new(&url, Duration::from_secs(2)).unwrap();

    let data = client.fetch_header("100").await.unwrap();
    assert_eq!(data.slot().unwrap(), 100);
    assert_eq!(data.timestamp, timestamp_of(100));
    assert_eq!(decode_header(&data.header).unwrap(), header_for(100));
    assert_eq!(data.block_root, header_for(100).root().to_hex());
}

#[tokio::test]
async fn test_head_resolves_to_highest_slot() {
    let url = start(MockChain::with_slots(&[5, 9, 7])).await;
    let client = BeaconClient::new(&url, Duration::from_secs(2)).unwrap();
    assert_eq!(client.fetch_header("head").await.unwrap().slot().unwrap(), 9);
}

#[tokio::test]
async fn test_missing_slot_is_not_found() {
    let url = start(MockChain::with_slots(&[100])).await;
    let client = BeaconClient::new(&url, Duration::from_secs(2)).unwrap();
    let err = client.fetch_header("101").await.unwrap_err();
    assert!(matches!(err, NodeError::SlotNotFound(_)), "{:?}", err);
}

#[tokio::test]
async fn test_block_without_execution_payload_has_no_timestamp() {
    let mut chain = MockChain::with_slots(&[100]);
    chain.slots.insert(
        50,
        MockSlot { header: header_for(50), timestamp: None },
    );
    let url = start(chain).await;
    let client = BeaconClient::new(&url, Duration::from_secs(2)).unwrap();

    let err = client.fetch_header("50").await.unwrap_err();
    assert!(matches!(err, NodeError::TimestampUnavailable { .. }), "{:?}", err);
}

#[test]
fn test_direction_targets() {
    assert_eq!(Direction::Next.target(10, 1), Some(11));
    assert_eq!(Direction::Next.target(10, 3), Some(13));
    assert_eq!(Direction::Previous.target(10, 2), Some(8));
    assert_eq!(Direction::Previous.target(1, 2), None);
    assert_eq!(Direction::Requested.target(10, 4), Some(10));
}

#[tokio::test]
async fn test_next_direction_skips_empty_slots() {
    let url = start(MockChain::with_slots(&[100, 103])).await;
    let app = Application::new(config_for(&url)).unwrap();

    let next = app.fetch_with_retry(100, Direction::Next).await.unwrap();
    assert_eq!(next.slot().unwrap(), 103);

    let prev = app.fetch_with_retry(103, Direction::Previous).await.unwrap();
    assert_eq!(prev.slot().unwrap(), 100);
}

#[tokio::test]
async fn test_retry_gives_up_after_configured_attempts() {
    let url = start(MockChain::with_slots(&[100, 110])).await;
    let mut cfg = config_for(&url);
    cfg.beacon_api.retry_attempts = 3;
    let app = Application::new(cfg).unwrap();

    let err = app.fetch_with_retry(100, Direction::Next).await.unwrap_err();
    assert!(matches!(err, NodeError::SlotNotFound(_)), "{:?}", err);
}

#[tokio::test]
async fn test_previous_stops_at_genesis() {
    let url = start(MockChain::with_slots(&[5])).await;
    let app = Application::new(config_for(&url)).unwrap();

    let err = app.fetch_with_retry(1, Direction::Previous).await.unwrap_err();
    assert!(matches!(err, NodeError::SlotNotFound(_)), "{:?}", err);
}

#[tokio::test]
async fn test_block_endpoint_failure_is_a_beacon_api_error() {
    let mut chain = MockChain::with_slots(&[100, 102]);
    chain.broken_blocks.insert(100);
    let url = start(chain).await;
    let client = BeaconClient::new(&url, Duration::from_secs(2)).unwrap();

    let err = client.fetch_header("100").await.unwrap_err();
    assert!(matches!(err, NodeError::BeaconApi { status: 500 }), "{:?}", err);
}

#[test]
fn test_base_url_drops_trailing_slash() {
    let client = BeaconClient::new("http://beacon:5052/", Duration::from_secs(2)).unwrap();
    assert_eq!(client.base_url(), "http://beacon:5052");
}
