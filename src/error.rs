// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use alloc::string::String;
use thiserror::Error;

use crate::types::header::HeaderField;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// A header field could not be decoded from its external representation.
    #[error("malformed field {field}: {reason}")]
    MalformedField { field: HeaderField, reason: String },
    /// A chunk handed to the tree was not exactly 32 bytes.
    #[error("chunk {index} has length {len}, expected 32")]
    ChunkLengthMismatch { index: usize, len: usize },
    /// Proof requested or replayed for a position outside the leaf range.
    #[error("index {index} is out of range for {len} chunks")]
    IndexOutOfRange { index: usize, len: usize },
    /// Field name is not one of the canonical five.
    #[error("unknown field name: {0}. Must be one of slot, proposer_index, parent_root, state_root, body_root")]
    UnknownField(String),
}

pub type ProofResult<T> = core::result::Result<T, ProofError>;
