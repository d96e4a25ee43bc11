// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Conformance vectors.
//!
//! The same vectors are fed to this crate's tests and to the verifying
//! contract's test suite. A vector pins the root of `leaves`, and the
//! verdict of replaying `(index, leaf, proof)` against `root`.

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::codec::encode_header;
use crate::hash::hash_bytes;
use crate::merkle::{merkleize, MerkleTree};
use crate::types::chunk::Chunk;
use crate::types::header::HeaderRecord;
use crate::verify::verify_proof;

/// Largest leaf count covered by the generated sweep.
pub const MAX_SWEEP_LEAVES: usize = 9;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConformanceVector {
    pub name: String,
    pub leaves: Vec<Chunk>,
    pub root: Chunk,
    pub index: u64,
    pub leaf: Chunk,
    pub proof: Vec<Chunk>,
    /// Verdict the replay must return.
    pub expected: bool,
}

/// Deterministic leaf `k` of an `n`-leaf sweep tree.
pub fn sweep_leaf(n: usize, k: usize) -> Chunk {
    let mut preimage = [0u8; 20];
    preimage[..4].copy_from_slice(b"leaf");
    LittleEndian::write_u64(&mut preimage[4..12], n as u64);
    LittleEndian::write_u64(&mut preimage[12..20], k as u64);
    hash_bytes(&preimage)
}

/// Header used by the header vectors.
pub fn sample_header() -> HeaderRecord {
    HeaderRecord {
        slot: 123_456,
        proposer_index: 42,
        parent_root: Chunk::filled(0x01),
        state_root: Chunk::filled(0x02),
        body_root: Chunk::filled(0x03),
    }
}

/// Every vector, positive ones first.
pub fn generate() -> Vec<ConformanceVector> {
    let mut out = Vec::new();

    for n in 1..=MAX_SWEEP_LEAVES {
        let leaves: Vec<Chunk> = (0..n).map(|k| sweep_leaf(n, k)).collect();
        out.extend(positive_vectors(&format!("sweep-{}", n), &leaves));
    }

    let four: Vec<Chunk> = (1..=4).map(Chunk::filled).collect();
    out.extend(positive_vectors("four-chunks", &four));

    let header_leaves = encode_header(&sample_header()).to_vec();
    out.extend(positive_vectors("header", &header_leaves));
    out.extend(negative_vectors("header", &header_leaves));

    out
}

fn positive_vectors(name: &str, leaves: &[Chunk]) -> Vec<ConformanceVector> {
    let tree = MerkleTree::new(leaves.to_vec());
    (0..leaves.len())
        .filter_map(|index| {
            let proof = tree.compute_proof(index).ok()?;
            Some(ConformanceVector {
                name: format!("{}/index-{}", name, index),
                leaves: leaves.to_vec(),
                root: tree.root(),
                index: index as u64,
                leaf: leaves[index],
                proof,
                expected: true,
            })
        })
        .collect()
}

// Tampered variants of the first two leaves' proofs.
fn negative_vectors(name: &str, leaves: &[Chunk]) -> Vec<ConformanceVector> {
    let tree = MerkleTree::new(leaves.to_vec());
    let (proof0, proof1) = match (tree.compute_proof(0), tree.compute_proof(1)) {
        (Ok(p0), Ok(p1)) if !p0.is_empty() => (p0, p1),
        _ => return Vec::new(),
    };
    let root = tree.root();

    let mut flipped_leaf = leaves[0];
    flipped_leaf.0[31] ^= 0x01;

    let mut flipped_sibling = proof0.clone();
    flipped_sibling[0].0[0] ^= 0x80;

    let mut flipped_root = root;
    flipped_root.0[15] ^= 0x10;

    let short = proof0[..proof0.len() - 1].to_vec();
    let mut long = proof0.clone();
    long.push(Chunk::ZERO);

    let base = |suffix: &str, root: Chunk, index: u64, leaf: Chunk, proof: Vec<Chunk>| {
        ConformanceVector {
            name: format!("{}/{}", name, suffix),
            leaves: leaves.to_vec(),
            root,
            index,
            leaf,
            proof,
            expected: false,
        }
    };

    vec![
        base("tampered-leaf", root, 0, flipped_leaf, proof0.clone()),
        base("tampered-sibling", root, 0, leaves[0], flipped_sibling),
        base("tampered-root", flipped_root, 0, leaves[0], proof0.clone()),
        base("wrong-index", root, 1, leaves[0], proof0.clone()),
        base("foreign-proof", root, 0, leaves[0], proof1),
        base("short-proof", root, 0, leaves[0], short),
        base("long-proof", root, 0, leaves[0], long),
    ]
}

/// Why a vector did not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    /// `leaves` do not merkleize to `root` (positive vectors only).
    Root,
    /// `proof` is not the one the tree engine produces.
    Proof,
    /// Replay verdict differs from `expected`.
    Verdict,
}

/// Recomputes a vector from scratch.
pub fn check(vector: &ConformanceVector) -> Result<(), Mismatch> {
    if vector.expected {
        if merkleize(&vector.leaves) != vector.root {
            return Err(Mismatch::Root);
        }
        let tree = MerkleTree::new(vector.leaves.clone());
        let index = usize::try_from(vector.index).map_err(|_| Mismatch::Proof)?;
        match tree.compute_proof(index) {
            Ok(proof) if proof == vector.proof => {}
            _ => return Err(Mismatch::Proof),
        }
    }

    let verdict = verify_proof(&vector.root, vector.index, &vector.leaf, &vector.proof);
    if verdict != vector.expected {
        return Err(Mismatch::Verdict);
    }
    Ok(())
}

impl core::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Mismatch::Root => f.write_str("leaves do not merkleize to the vector root"),
            Mismatch::Proof => f.write_str("tree engine produced a different proof"),
            Mismatch::Verdict => f.write_str("replay verdict differs from the expected one"),
        }
    }
}
