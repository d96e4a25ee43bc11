// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Beacon node REST client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use beacon_proof_kernel::RawHeader;

use crate::errors::{NodeError, NodeResult};

#[derive(Debug, Deserialize)]
struct HeaderResponse {
    data: HeaderEnvelope,
}

#[derive(Debug, Deserialize)]
struct HeaderEnvelope {
    #[serde(default)]
    root: String,
    header: SignedHeader,
}

#[derive(Debug, Deserialize)]
struct SignedHeader {
    message: RawHeader,
}

#[derive(Debug, Deserialize)]
struct BlockResponse {
    data: BlockData,
}

#[derive(Debug, Deserialize)]
struct BlockData {
    message: BlockMessage,
}

#[derive(Debug, Deserialize)]
struct BlockMessage {
    body: BlockBody,
}

#[derive(Debug, Deserialize)]
struct BlockBody {
    // Absent before the merge.
    execution_payload: Option<ExecutionPayload>,
}

#[derive(Debug, Deserialize)]
struct ExecutionPayload {
    timestamp: String,
}

/// A header as fetched, still in API string form, plus the execution
/// timestamp of its block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderData {
    pub header: RawHeader,
    /// Root the beacon node reports for this block.
    pub block_root: String,
    pub timestamp: u64,
}

impl HeaderData {
    pub fn slot(&self) -> NodeResult<u64> {
        self.header
            .slot
            .parse()
            .map_err(|_| NodeError::InvalidInput(format!("slot {:?} is not a number", self.header.slot)))
    }
}

/// Which neighbour of a slot to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
    Requested,
}

impl Direction {
    /// Slot to try on `attempt` (1-based), or `None` once `Previous` runs
    /// below genesis.
    pub fn target(self, slot: u64, attempt: u32) -> Option<u64> {
        match self {
            Direction::Previous => slot.checked_sub(u64::from(attempt)),
            Direction::Next => slot.checked_add(u64::from(attempt)),
            Direction::Requested => Some(slot),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BeaconClient {
    base_url: String,
    client: Client,
}

impl BeaconClient {
    pub fn new(url: &str, timeout: Duration) -> NodeResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the header and the execution timestamp for `block_id`
    /// (`head`, a slot number, or a root).
    ///
    /// A block without a readable timestamp is an error: the timestamp is the
    /// oracle key and there is no safe substitute for it.
    pub async fn fetch_header(&self, block_id: &str) -> NodeResult<HeaderData> {
        let url = format!("{}/eth/v1/beacon/headers/{}", self.base_url, block_id);
        tracing::debug!("GET {}", url);
        let resp = self.client.get(&url).send().await?;
        check_status(resp.status(), block_id)?;
        let header: HeaderResponse = resp.json().await?;

        let url = format!("{}/eth/v2/beacon/blocks/{}", self.base_url, block_id);
        tracing::debug!("GET {}", url);
        let resp = self.client.get(&url).send().await?;
        check_status(resp.status(), block_id)?;
        let block: BlockResponse = resp.json().await?;

        let timestamp = block
            .data
            .message
            .body
            .execution_payload
            .and_then(|p| p.timestamp.parse::<u64>().ok())
            .ok_or_else(|| NodeError::TimestampUnavailable { slot: block_id.to_string() })?;

        Ok(HeaderData {
            header: header.data.header.message,
            block_root: header.data.root,
            timestamp,
        })
    }
}

fn check_status(status: StatusCode, block_id: &str) -> NodeResult<()> {
    if status == StatusCode::NOT_FOUND {
        return Err(NodeError::SlotNotFound(block_id.to_string()));
    }
    if !status.is_success() {
        return Err(NodeError::BeaconApi { status: status.as_u16() });
    }
    Ok(())
}
