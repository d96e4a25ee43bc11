// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Proof Bundle.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::codec::encode_header;
use crate::config::HEADER_FIELD_COUNT;
use crate::error::{ProofError, ProofResult};
use crate::merkle::MerkleTree;
use crate::types::chunk::Chunk;
use crate::types::header::{HeaderField, HeaderRecord};
use crate::verify::verify_proof;

/// Everything a verifying party needs to check one header field.
///
/// Serialized with the field names the verifying contract's tooling uses:
/// `fieldValue` and `merkleProof` elements are `0x` hex, `fieldIndex` is the
/// `uint8` call argument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProofBundle {
    /// Oracle key: the timestamp the trusted root is recorded under.
    pub beacon_timestamp: u64,

    /// Header root the proof was computed against.
    pub beacon_block_root: Chunk,

    pub field_index: u8,

    /// The field's leaf chunk.
    pub field_value: Chunk,

    pub merkle_proof: Vec<Chunk>,
}

impl ProofBundle {
    /// Builds the bundle for `field_name` of `header`, keyed by `oracle_key`.
    pub fn assemble(header: &HeaderRecord, field_name: &str, oracle_key: u64) -> ProofResult<Self> {
        let field: HeaderField = field_name.parse()?;
        Self::for_field(header, field, oracle_key)
    }

    pub fn for_field(header: &HeaderRecord, field: HeaderField, oracle_key: u64) -> ProofResult<Self> {
        let chunks = encode_header(header);
        let field_value = chunks[field.index()];
        let tree = MerkleTree::new(chunks.to_vec());
        let merkle_proof = tree.compute_proof(field.index())?;

        Ok(Self {
            beacon_timestamp: oracle_key,
            beacon_block_root: tree.root(),
            field_index: field as u8,
            field_value,
            merkle_proof,
        })
    }

    pub fn field(&self) -> Option<HeaderField> {
        HeaderField::from_index(self.field_index)
    }

    /// Replays the proof against a root obtained independently, e.g. from
    /// the oracle. Indices past the last header field are rejected, as the
    /// verifying contract rejects them.
    pub fn verify_against(&self, trusted_root: &Chunk) -> ProofResult<bool> {
        if usize::from(self.field_index) >= HEADER_FIELD_COUNT {
            return Err(ProofError::IndexOutOfRange {
                index: usize::from(self.field_index),
                len: HEADER_FIELD_COUNT,
            });
        }
        Ok(verify_proof(
            trusted_root,
            u64::from(self.field_index),
            &self.field_value,
            &self.merkle_proof,
        ))
    }

    /// Replays the proof against the root carried in the bundle itself.
    /// Only shows internal consistency; trust comes from [`Self::verify_against`].
    pub fn verify_self(&self) -> ProofResult<bool> {
        self.verify_against(&self.beacon_block_root)
    }
}
