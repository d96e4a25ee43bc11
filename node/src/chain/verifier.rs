// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Remote Verification Adapter.
//!
//! Packs a [`ProofBundle`] into a `verifyHeaderField` call and reads back
//! the boolean. The contract looks up the trusted root for the timestamp
//! itself and replays the proof with the same bit-ordering rule as
//! `beacon_proof_kernel::verify`.

use std::sync::Arc;
use std::time::Instant;

use ethers_core::abi::{parse_abi, Abi, Function, Token};
use ethers_core::types::{Address, U256};
use beacon_proof_kernel::{Chunk, ProofBundle};

use crate::chain::rpc::RpcClient;
use crate::errors::{NodeError, NodeResult};
use crate::telemetry;

pub const VERIFY_FUNCTION: &str = "verifyHeaderField";

const VERIFIER_ABI: &[&str] = &[
    "function verifyHeaderField(uint256 beaconTimestamp, uint8 fieldIndex, bytes32 expectedValue, bytes32[] merkleProof) external view returns (bool)",
];

/// The `verifyHeaderField` ABI entry.
pub fn verify_function() -> NodeResult<Function> {
    let abi: Abi = parse_abi(VERIFIER_ABI).map_err(|e| NodeError::Abi(e.to_string()))?;
    abi.function(VERIFY_FUNCTION)
        .cloned()
        .map_err(|e| NodeError::Abi(e.to_string()))
}

/// Call arguments, as the contract sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCall {
    pub beacon_timestamp: U256,
    pub field_index: u8,
    pub expected_value: Chunk,
    pub merkle_proof: Vec<Chunk>,
}

pub fn encode_call(function: &Function, bundle: &ProofBundle) -> NodeResult<Vec<u8>> {
    let proof = bundle
        .merkle_proof
        .iter()
        .map(|c| Token::FixedBytes(c.0.to_vec()))
        .collect();
    let tokens = [
        Token::Uint(U256::from(bundle.beacon_timestamp)),
        Token::Uint(U256::from(bundle.field_index)),
        Token::FixedBytes(bundle.field_value.0.to_vec()),
        Token::Array(proof),
    ];
    function
        .encode_input(&tokens)
        .map_err(|e| NodeError::Abi(e.to_string()))
}

/// Inverse of [`encode_call`]. Rejects anything that is not a well-formed
/// call, including proof elements that are not 32 bytes.
pub fn decode_call(function: &Function, data: &[u8]) -> NodeResult<VerifyCall> {
    if data.len() < 4 || data[..4] != function.short_signature() {
        return Err(NodeError::Abi("selector mismatch".into()));
    }
    let tokens = function
        .decode_input(&data[4..])
        .map_err(|e| NodeError::Abi(e.to_string()))?;

    match tokens.as_slice() {
        [Token::Uint(ts), Token::Uint(index), Token::FixedBytes(value), Token::Array(proof)] => {
            let field_index = u8::try_from(index.low_u64())
                .ok()
                .filter(|_| *index <= U256::from(u8::MAX))
                .ok_or_else(|| NodeError::Abi("fieldIndex exceeds uint8".into()))?;
            let expected_value = fixed_bytes(value)?;
            let merkle_proof = proof
                .iter()
                .map(|t| match t {
                    Token::FixedBytes(b) => fixed_bytes(b),
                    _ => Err(NodeError::Abi("proof element is not bytes32".into())),
                })
                .collect::<NodeResult<Vec<_>>>()?;
            Ok(VerifyCall {
                beacon_timestamp: *ts,
                field_index,
                expected_value,
                merkle_proof,
            })
        }
        _ => Err(NodeError::Abi("unexpected argument layout".into())),
    }
}

pub fn decode_result(function: &Function, output: &[u8]) -> NodeResult<bool> {
    let tokens = function
        .decode_output(output)
        .map_err(|e| NodeError::Abi(e.to_string()))?;
    match tokens.as_slice() {
        [Token::Bool(valid)] => Ok(*valid),
        _ => Err(NodeError::Abi("verifyHeaderField did not return a bool".into())),
    }
}

fn fixed_bytes(bytes: &[u8]) -> NodeResult<Chunk> {
    Chunk::from_slice(bytes)
        .ok_or_else(|| NodeError::Abi(format!("expected 32 bytes, got {}", bytes.len())))
}

#[derive(Debug, Clone)]
pub struct RemoteVerifier {
    rpc: Arc<RpcClient>,
    address: Address,
    function: Function,
}

impl RemoteVerifier {
    pub fn new(rpc: Arc<RpcClient>, address: Address) -> NodeResult<Self> {
        Ok(Self {
            rpc,
            address,
            function: verify_function()?,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// `eth_call`s the verifier. `false` is a legitimate answer (the proof
    /// does not match the oracle's root); errors mean the call never got
    /// an answer.
    pub async fn verify(&self, bundle: &ProofBundle) -> NodeResult<bool> {
        let data = encode_call(&self.function, bundle)?;
        tracing::info!(
            "Verifying field index {} against timestamp {} ({} proof elements)",
            bundle.field_index,
            bundle.beacon_timestamp,
            bundle.merkle_proof.len()
        );

        let started = Instant::now();
        let output = self.rpc.eth_call(self.address, &data).await?;
        metrics::histogram!(telemetry::REMOTE_CALL_DURATION, started.elapsed().as_secs_f64());

        let valid = decode_result(&self.function, &output)?;
        metrics::increment_counter!(
            telemetry::REMOTE_VERIFICATIONS,
            "result" => telemetry::outcome_label(valid)
        );
        Ok(valid)
    }
}
