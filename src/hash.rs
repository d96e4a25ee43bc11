// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Canonical SHA-256 hashing
//!
//! Every internal node of a header tree, and every step of a proof replay,
//! goes through [`hash_pair`]. The verifying contract computes
//! `sha256(abi.encodePacked(left, right))`, which is the same 64-byte
//! preimage: no length prefix, no domain tag, no padding.

use sha2::{Digest, Sha256};

use crate::types::chunk::Chunk;

/// `SHA-256(left ++ right)`.
pub fn hash_pair(left: &Chunk, right: &Chunk) -> Chunk {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Chunk::new(hasher.finalize().into())
}

/// SHA-256 of arbitrary bytes. Used to derive conformance leaves.
pub fn hash_bytes(bytes: &[u8]) -> Chunk {
    Chunk::new(Sha256::digest(bytes).into())
}
