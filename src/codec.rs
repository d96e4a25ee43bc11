// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Chunk Codec.
//!
//! Turns a header into its five leaves, and raw API strings into a header.
//!
//! Leaf encoding:
//! ```text
//! slot, proposer_index : u64 LE in bytes [0..8], bytes [8..32] zero
//! *_root               : the 32 bytes verbatim
//! ```

use alloc::string::ToString;
use byteorder::{ByteOrder, LittleEndian};

use crate::config::{HEADER_FIELD_COUNT, UINT64_BYTES};
use crate::error::{ProofError, ProofResult};
use crate::merkle::merkleize;
use crate::types::chunk::{strip_hex_prefix, Chunk};
use crate::types::header::{HeaderField, HeaderRecord, RawHeader};

/// The five leaves of a header, in canonical order.
pub type ChunkList = [Chunk; HEADER_FIELD_COUNT];

/// Packs a uint64 the way the header schema does.
pub fn encode_u64(value: u64) -> Chunk {
    let mut chunk = Chunk::ZERO;
    LittleEndian::write_u64(&mut chunk.0[..UINT64_BYTES], value);
    chunk
}

/// Reads back the uint64 from a numeric leaf. Trailing bytes are ignored.
pub fn decode_u64_chunk(chunk: &Chunk) -> u64 {
    LittleEndian::read_u64(&chunk.0[..UINT64_BYTES])
}

pub fn encode_header(header: &HeaderRecord) -> ChunkList {
    [
        encode_u64(header.slot),
        encode_u64(header.proposer_index),
        header.parent_root,
        header.state_root,
        header.body_root,
    ]
}

impl HeaderRecord {
    pub fn to_chunks(&self) -> ChunkList {
        encode_header(self)
    }

    /// Root of the header tree; equals the beacon block root.
    pub fn root(&self) -> Chunk {
        merkleize(&self.to_chunks())
    }

    /// The leaf for a single field.
    pub fn field_chunk(&self, field: HeaderField) -> Chunk {
        match field {
            HeaderField::Slot => encode_u64(self.slot),
            HeaderField::ProposerIndex => encode_u64(self.proposer_index),
            HeaderField::ParentRoot => self.parent_root,
            HeaderField::StateRoot => self.state_root,
            HeaderField::BodyRoot => self.body_root,
        }
    }
}

/// Decodes the strings a header source hands us.
///
/// Numeric fields must be plain base-10 `u64`. Roots may carry a `0x`
/// prefix; an empty root is treated as 32 zero bytes.
pub fn decode_header(raw: &RawHeader) -> ProofResult<HeaderRecord> {
    Ok(HeaderRecord {
        slot: decode_decimal(HeaderField::Slot, &raw.slot)?,
        proposer_index: decode_decimal(HeaderField::ProposerIndex, &raw.proposer_index)?,
        parent_root: decode_root(HeaderField::ParentRoot, &raw.parent_root)?,
        state_root: decode_root(HeaderField::StateRoot, &raw.state_root)?,
        body_root: decode_root(HeaderField::BodyRoot, &raw.body_root)?,
    })
}

fn decode_decimal(field: HeaderField, value: &str) -> ProofResult<u64> {
    // `u64::from_str` accepts a leading '+', the header schema does not.
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProofError::MalformedField {
            field,
            reason: "expected a decimal unsigned integer".to_string(),
        });
    }
    value.parse::<u64>().map_err(|e| ProofError::MalformedField {
        field,
        reason: e.to_string(),
    })
}

fn decode_root(field: HeaderField, value: &str) -> ProofResult<Chunk> {
    if value.is_empty() {
        return Ok(Chunk::ZERO);
    }
    let bytes = hex::decode(strip_hex_prefix(value)).map_err(|e| ProofError::MalformedField {
        field,
        reason: e.to_string(),
    })?;
    Chunk::from_slice(&bytes).ok_or_else(|| ProofError::MalformedField {
        field,
        reason: alloc::format!("decoded {} bytes, expected 32", bytes.len()),
    })
}
