// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![no_std]

//! beacon-proof-kernel: canonical chunking, binary Merkle digesting and
//! field inclusion proofs for beacon block headers.
//!
//! Everything here is pure computation. The same inputs produce the same
//! root, proof and verdict on every platform, which is what lets an
//! independent verifier (on-chain or offline) replay our results.

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod config;
pub mod error;
pub mod hash;
pub mod types;
pub mod codec;
pub mod merkle;
pub mod verify;
pub mod proof;
pub mod conformance;

pub use error::{ProofError, ProofResult};
pub use types::chunk::Chunk;
pub use types::header::{HeaderField, HeaderRecord, RawHeader};
pub use merkle::MerkleTree;
pub use proof::ProofBundle;
