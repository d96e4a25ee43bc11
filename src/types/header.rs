// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Header layout.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProofError;
use crate::types::chunk::Chunk;

/// A field of the canonical 5-field header, in tree order.
///
/// The discriminant is the leaf index and the `fieldIndex` the verifying
/// contract receives. Reordering these variants breaks on-chain compatibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum HeaderField {
    Slot = 0,
    ProposerIndex = 1,
    ParentRoot = 2,
    StateRoot = 3,
    BodyRoot = 4,
}

/// Name → field, initialised once and never mutated.
const FIELD_TABLE: [(&str, HeaderField); 5] = [
    ("slot", HeaderField::Slot),
    ("proposer_index", HeaderField::ProposerIndex),
    ("parent_root", HeaderField::ParentRoot),
    ("state_root", HeaderField::StateRoot),
    ("body_root", HeaderField::BodyRoot),
];

impl HeaderField {
    /// All fields in canonical order.
    pub const ALL: [HeaderField; 5] = [
        HeaderField::Slot,
        HeaderField::ProposerIndex,
        HeaderField::ParentRoot,
        HeaderField::StateRoot,
        HeaderField::BodyRoot,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(v: u8) -> Option<Self> {
        match v {
            0 => Some(HeaderField::Slot),
            1 => Some(HeaderField::ProposerIndex),
            2 => Some(HeaderField::ParentRoot),
            3 => Some(HeaderField::StateRoot),
            4 => Some(HeaderField::BodyRoot),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        FIELD_TABLE[self.index()].0
    }

    /// `slot` and `proposer_index` are uint64; the rest are 32-byte roots.
    pub fn is_numeric(self) -> bool {
        matches!(self, HeaderField::Slot | HeaderField::ProposerIndex)
    }
}

impl FromStr for HeaderField {
    type Err = ProofError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FIELD_TABLE
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, field)| *field)
            .ok_or_else(|| ProofError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded beacon block header. Built once per request, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub slot: u64,
    pub proposer_index: u64,
    pub parent_root: Chunk,
    pub state_root: Chunk,
    pub body_root: Chunk,
}

/// Header fields exactly as a beacon API returns them: decimal strings for
/// the integers, `0x` hex for the roots. Empty roots mean "not supplied".
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawHeader {
    pub slot: String,
    pub proposer_index: String,
    #[serde(default)]
    pub parent_root: String,
    #[serde(default)]
    pub state_root: String,
    #[serde(default)]
    pub body_root: String,
}
