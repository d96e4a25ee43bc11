// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ethers_core::types::Address;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{NodeError, NodeResult};

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Just enough JSON-RPC for read-only contract calls.
#[derive(Debug)]
pub struct RpcClient {
    url: String,
    client: Client,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str, timeout: Duration) -> NodeResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.to_string(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn request(&self, method: &str, params: Value) -> NodeResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let resp = self.client.post(&self.url).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(NodeError::Network(format!("{} returned {}", method, resp.status())));
        }
        let parsed: RpcResponse = resp.json().await?;

        if let Some(err) = parsed.error {
            return Err(NodeError::Rpc { code: err.code, message: err.message });
        }
        parsed
            .result
            .ok_or_else(|| NodeError::Network(format!("{} response has neither result nor error", method)))
    }

    /// `eth_call` against the latest block.
    pub async fn eth_call(&self, to: Address, data: &[u8]) -> NodeResult<Vec<u8>> {
        let params = json!([
            {
                "to": format!("0x{}", hex::encode(to.as_bytes())),
                "data": format!("0x{}", hex::encode(data)),
            },
            "latest"
        ]);
        let result = self.request("eth_call", params).await?;
        decode_hex_value(&result)
    }

    pub async fn chain_id(&self) -> NodeResult<u64> {
        let result = self.request("eth_chainId", json!([])).await?;
        let s = result
            .as_str()
            .ok_or_else(|| NodeError::Network("eth_chainId result is not a string".into()))?;
        u64::from_str_radix(s.trim_start_matches("0x"), 16)
            .map_err(|e| NodeError::Network(format!("bad chain id {:?}: {}", s, e)))
    }
}

fn decode_hex_value(value: &Value) -> NodeResult<Vec<u8>> {
    let s = value
        .as_str()
        .ok_or_else(|| NodeError::Network("eth_call result is not a string".into()))?;
    hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| NodeError::Network(format!("eth_call result is not hex: {}", e)))
}
