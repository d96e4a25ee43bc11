// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! In-process stand-ins for a beacon node and an execution node.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use ethers_core::abi::{encode, Token};
use ethers_core::types::U256;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use beacon_proof_kernel::verify::verify_proof;
use beacon_proof_kernel::{Chunk, HeaderRecord, RawHeader};
use beacon_proof_node::chain::verifier::{decode_call, verify_function};
use beacon_proof_node::config::{NodeConfig, BEACON_ROOTS_ADDRESS, DEFAULT_VERIFIER_ADDRESS};

pub const GENESIS_TIME: u64 = 1_700_000_000;
pub const CHAIN_ID: u64 = 17000;

pub fn timestamp_of(slot: u64) -> u64 {
    GENESIS_TIME + 12 * slot
}

pub fn header_for(slot: u64) -> HeaderRecord {
    HeaderRecord {
        slot,
        proposer_index: slot % 1000 + 7,
        parent_root: Chunk::filled((slot % 251) as u8),
        state_root: Chunk::filled(0xaa),
        body_root: Chunk::filled(0xbb),
    }
}

pub fn raw_header(h: &HeaderRecord) -> RawHeader {
    RawHeader {
        slot: h.slot.to_string(),
        proposer_index: h.proposer_index.to_string(),
        parent_root: h.parent_root.to_hex(),
        state_root: h.state_root.to_hex(),
        body_root: h.body_root.to_hex(),
    }
}

#[derive(Debug, Clone)]
pub struct MockSlot {
    pub header: HeaderRecord,
    /// `None` models a pre-merge block.
    pub timestamp: Option<u64>,
}

/// How `eth_call` misbehaves, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallFault {
    /// Answers with two bytes of data.
    Malformed,
    /// Fails with a node-side JSON-RPC error that is not a revert.
    NodeFault,
}

/// A chain of filled slots. Each block's root is recorded by the oracle
/// under its child's timestamp, as the beacon roots contract does.
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    pub slots: BTreeMap<u64, MockSlot>,
    pub oracle: HashMap<u64, Chunk>,
    /// Slots whose block endpoint answers 500.
    pub broken_blocks: HashSet<u64>,
    pub call_fault: Option<CallFault>,
}

impl MockChain {
    pub fn with_slots(filled: &[u64]) -> Self {
        let mut chain = MockChain::default();
        for &slot in filled {
            chain.slots.insert(
                slot,
                MockSlot {
                    header: header_for(slot),
                    timestamp: Some(timestamp_of(slot)),
                },
            );
        }
        let ordered: Vec<u64> = chain.slots.keys().copied().collect();
        for pair in ordered.windows(2) {
            let root = chain.slots[&pair[0]].header.root();
            chain.oracle.insert(timestamp_of(pair[1]), root);
        }
        chain
    }

    fn lookup(&self, id: &str) -> Option<&MockSlot> {
        if id == "head" {
            return self.slots.values().next_back();
        }
        self.slots.get(&id.parse::<u64>().ok()?)
    }
}

type Shared = Arc<MockChain>;

async fn headers(State(chain): State<Shared>, Path(id): Path<String>) -> impl IntoResponse {
    match chain.lookup(&id) {
        Some(slot) => (
            StatusCode::OK,
            Json(json!({
                "data": {
                    "root": slot.header.root().to_hex(),
                    "header": { "message": raw_header(&slot.header) }
                }
            })),
        ),
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "NOT_FOUND" }))),
    }
}

async fn blocks(State(chain): State<Shared>, Path(id): Path<String>) -> impl IntoResponse {
    if id.parse::<u64>().map_or(false, |slot| chain.broken_blocks.contains(&slot)) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "boom" })));
    }
    match chain.lookup(&id) {
        Some(MockSlot { timestamp: Some(ts), .. }) => (
            StatusCode::OK,
            Json(json!({
                "data": { "message": { "body": {
                    "execution_payload": { "timestamp": ts.to_string() }
                } } }
            })),
        ),
        Some(_) => (
            StatusCode::OK,
            Json(json!({ "data": { "message": { "body": {} } } })),
        ),
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "NOT_FOUND" }))),
    }
}

fn rpc_result(id: &Value, result: Value) -> Json<Value> {
    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

fn rpc_revert(id: &Value, message: &str) -> Json<Value> {
    Json(json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": 3, "message": format!("execution reverted: {}", message) }
    }))
}

fn same_address(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

async fn rpc(State(chain): State<Shared>, Json(req): Json<Value>) -> Json<Value> {
    let id = req["id"].clone();
    match req["method"].as_str() {
        Some("eth_chainId") => rpc_result(&id, json!(format!("0x{:x}", CHAIN_ID))),
        Some("eth_call") => {
            match chain.call_fault {
                Some(CallFault::Malformed) => return rpc_result(&id, json!("0x1234")),
                Some(CallFault::NodeFault) => {
                    return Json(json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": { "code": -32000, "message": "header not found" }
                    }))
                }
                None => {}
            }
            let to = req["params"][0]["to"].as_str().unwrap_or_default();
            let data = req["params"][0]["data"].as_str().unwrap_or_default();
            let data = hex::decode(data.trim_start_matches("0x")).unwrap_or_default();

            if same_address(to, BEACON_ROOTS_ADDRESS) {
                if data.len() != 32 {
                    return rpc_revert(&id, "bad calldata");
                }
                let ts = U256::from_big_endian(&data).low_u64();
                match chain.oracle.get(&ts) {
                    Some(root) => rpc_result(&id, json!(root.to_hex())),
                    None => rpc_revert(&id, "no root"),
                }
            } else if same_address(to, DEFAULT_VERIFIER_ADDRESS) {
                let function = verify_function().unwrap();
                let call = match decode_call(&function, &data) {
                    Ok(call) => call,
                    Err(_) => return rpc_revert(&id, "bad call"),
                };
                if call.field_index >= 5 {
                    return rpc_revert(&id, "field index out of range");
                }
                let Some(root) = chain.oracle.get(&call.beacon_timestamp.low_u64()) else {
                    return rpc_revert(&id, "no root");
                };
                let valid = verify_proof(
                    root,
                    u64::from(call.field_index),
                    &call.expected_value,
                    &call.merkle_proof,
                );
                let out = encode(&[Token::Bool(valid)]);
                rpc_result(&id, json!(format!("0x{}", hex::encode(out))))
            } else {
                rpc_result(&id, json!("0x"))
            }
        }
        _ => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32601, "message": "method not found" }
        })),
    }
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Serves both the beacon API and the JSON-RPC endpoint; returns the base URL.
pub async fn start(chain: MockChain) -> String {
    let router = Router::new()
        .route("/eth/v1/beacon/headers/:id", get(headers))
        .route("/eth/v2/beacon/blocks/:id", get(blocks))
        .route("/", post(rpc))
        .with_state(Arc::new(chain));
    format!("http://{}", spawn(router).await)
}

pub fn config_for(url: &str) -> NodeConfig {
    let mut cfg = NodeConfig::default();
    cfg.beacon_api.endpoints = vec![url.to_string()];
    cfg.beacon_api.request_timeout_ms = 2000;
    cfg
}
