// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Protocol constants.
//!
//! Changing any of these breaks compatibility with every verifier that has
//! already been deployed.

/// Width of a chunk in bytes.
pub const BYTES_PER_CHUNK: usize = 32;

/// Number of fields in the canonical header layout.
pub const HEADER_FIELD_COUNT: usize = 5;

/// Leaves in a header tree after padding (next power of two above 5).
pub const HEADER_TREE_WIDTH: usize = 8;

/// Proof length for any header field.
pub const HEADER_PROOF_DEPTH: usize = 3;

/// Width of a little-endian `uint64` at the start of a numeric chunk.
pub const UINT64_BYTES: usize = 8;

/// Consensus layer slot duration in seconds.
pub const SECONDS_PER_SLOT: u64 = 12;
