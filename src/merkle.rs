// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Merkle Tree Engine.
//!
//! Binary SHA-256 tree over an ordered chunk list:
//! 1. pad on the right with zero chunks up to the next power of two
//!    (an empty list pads to a single zero chunk),
//! 2. replace each adjacent `(left, right)` pair by `hash_pair(left, right)`,
//! 3. repeat until one chunk remains.
//!
//! Two degenerate cases fall out of the rule and are part of the protocol:
//! `[]` has the zero root and `[c]` has root `c`, with no hashing at all.

use alloc::vec::Vec;

use crate::error::{ProofError, ProofResult};
use crate::hash::hash_pair;
use crate::types::chunk::Chunk;

/// Sibling chunks from the leaf layer up to, not including, the root.
pub type Proof = Vec<Chunk>;

/// Smallest power of two `>= n`, with `0 -> 1`.
pub fn next_power_of_two(n: usize) -> usize {
    if n == 0 {
        1
    } else {
        n.next_power_of_two()
    }
}

/// Proof length for a list of `n` chunks.
pub fn proof_depth(n: usize) -> usize {
    next_power_of_two(n).trailing_zeros() as usize
}

/// Read-only tree over a chunk list. Only the leaves and the root are kept;
/// proofs rebuild the intermediate layers on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    chunks: Vec<Chunk>,
    root: Chunk,
}

impl MerkleTree {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        let root = merkleize(&chunks);
        Self { chunks, root }
    }

    /// Builds a tree from untyped byte slices, rejecting any that are not
    /// exactly 32 bytes.
    pub fn from_slices<T: AsRef<[u8]>>(chunks: &[T]) -> ProofResult<Self> {
        let mut leaves = Vec::with_capacity(chunks.len());
        for (index, raw) in chunks.iter().enumerate() {
            let raw = raw.as_ref();
            let chunk = Chunk::from_slice(raw).ok_or(ProofError::ChunkLengthMismatch {
                index,
                len: raw.len(),
            })?;
            leaves.push(chunk);
        }
        Ok(Self::new(leaves))
    }

    pub fn root(&self) -> Chunk {
        self.root
    }

    /// The leaves as supplied, without padding.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Length of every proof this tree produces.
    pub fn depth(&self) -> usize {
        proof_depth(self.chunks.len())
    }

    /// Sibling path for the leaf at `index`.
    ///
    /// `index` is bounded by the real leaf count, not the padded width:
    /// padding leaves cannot be proven.
    pub fn compute_proof(&self, index: usize) -> ProofResult<Proof> {
        if index >= self.chunks.len() {
            return Err(ProofError::IndexOutOfRange {
                index,
                len: self.chunks.len(),
            });
        }

        let mut layer = padded_leaves(&self.chunks);
        let mut proof = Vec::with_capacity(self.depth());
        let mut position = index;

        while layer.len() > 1 {
            let sibling = layer.get(position ^ 1).copied().unwrap_or(Chunk::ZERO);
            proof.push(sibling);
            layer = next_layer(&layer);
            position /= 2;
        }

        Ok(proof)
    }
}

/// Root of a chunk list without keeping the tree around.
pub fn merkleize(chunks: &[Chunk]) -> Chunk {
    if chunks.is_empty() {
        return Chunk::ZERO;
    }

    let mut layer = padded_leaves(chunks);
    while layer.len() > 1 {
        layer = next_layer(&layer);
    }
    layer[0]
}

fn padded_leaves(chunks: &[Chunk]) -> Vec<Chunk> {
    let width = next_power_of_two(chunks.len());
    let mut leaves = Vec::with_capacity(width);
    leaves.extend_from_slice(chunks);
    leaves.resize(width, Chunk::ZERO);
    leaves
}

// An odd-length layer cannot occur after padding, but a missing right
// child still hashes against the zero chunk.
fn next_layer(layer: &[Chunk]) -> Vec<Chunk> {
    layer
        .chunks(2)
        .map(|pair| {
            let right = pair.get(1).unwrap_or(&Chunk::ZERO);
            hash_pair(&pair[0], right)
        })
        .collect()
}
