// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Proof Verifier.
//!
//! This replay is mirrored line for line by the verifying contract:
//!
//! ```text
//! current = leaf
//! for i, sibling in proof:
//!     if (index >> i) & 1 == 0: current = sha256(current ++ sibling)
//!     else:                     current = sha256(sibling ++ current)
//! return current == root
//! ```
//!
//! Side selection reads bit `i` of the original index; it does not halve
//! the index between levels. Both give the same answer for honest proofs
//! but disagree on over-long proofs, and the contract uses the bit form.

use crate::hash::hash_pair;
use crate::types::chunk::Chunk;

/// Bit `level` of `index`. Shifting past the integer width yields 0,
/// matching `>>` on the contract side.
pub fn index_bit(index: u64, level: usize) -> bool {
    u32::try_from(level)
        .ok()
        .and_then(|shift| index.checked_shr(shift))
        .map_or(false, |v| v & 1 == 1)
}

/// Folds `leaf` up through `proof`, returning the implied root.
pub fn replay(index: u64, leaf: &Chunk, proof: &[Chunk]) -> Chunk {
    proof
        .iter()
        .enumerate()
        .fold(*leaf, |current, (level, sibling)| {
            if index_bit(index, level) {
                hash_pair(sibling, &current)
            } else {
                hash_pair(&current, sibling)
            }
        })
}

/// `true` when `leaf` at `index` together with `proof` reproduces `root`.
///
/// A proof of the wrong length just yields a different root. Never panics.
pub fn verify_proof(root: &Chunk, index: u64, leaf: &Chunk, proof: &[Chunk]) -> bool {
    replay(index, leaf, proof) == *root
}
