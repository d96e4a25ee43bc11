// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Timestamp → root oracle backed by the EIP-4788 beacon roots contract.
//!
//! The contract takes the raw 32-byte big-endian timestamp as calldata (no
//! selector) and returns the parent beacon block root recorded for the
//! block with that timestamp. Unknown timestamps revert.

use std::sync::Arc;

use ethers_core::abi::{encode, Token};
use ethers_core::types::{Address, U256};
use beacon_proof_kernel::Chunk;

use crate::chain::rpc::RpcClient;
use crate::errors::{NodeError, NodeResult};

#[derive(Debug, Clone)]
pub struct BeaconRootsOracle {
    rpc: Arc<RpcClient>,
    address: Address,
}

/// Calldata for a lookup.
pub fn encode_lookup(timestamp: u64) -> Vec<u8> {
    encode(&[Token::Uint(U256::from(timestamp))])
}

/// Geth and most clients report a revert as code 3; others only say so in
/// the message.
fn is_revert(code: i64, message: &str) -> bool {
    code == 3 || message.contains("execution reverted")
}

impl BeaconRootsOracle {
    pub fn new(rpc: Arc<RpcClient>, address: Address) -> Self {
        Self { rpc, address }
    }

    /// Trusted root for `timestamp`.
    ///
    /// A revert and an all-zero answer both mean "nothing recorded" and
    /// become `OracleUnavailable`; a zero root must never be checked against
    /// a proof. Any other RPC failure is returned as is.
    pub async fn trusted_root(&self, timestamp: u64) -> NodeResult<Chunk> {
        let output = match self.rpc.eth_call(self.address, &encode_lookup(timestamp)).await {
            Ok(output) => output,
            Err(NodeError::Rpc { code, message }) if is_revert(code, &message) => {
                tracing::warn!("Oracle lookup for {} reverted ({}: {})", timestamp, code, message);
                return Err(NodeError::OracleUnavailable { timestamp });
            }
            Err(e) => return Err(e),
        };

        let root = Chunk::from_slice(&output).ok_or_else(|| {
            NodeError::Abi(format!("oracle returned {} bytes, expected 32", output.len()))
        })?;
        if root.is_zero() {
            return Err(NodeError::OracleUnavailable { timestamp });
        }
        Ok(root)
    }
}
