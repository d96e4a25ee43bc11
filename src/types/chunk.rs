// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The 32-byte chunk.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::config::BYTES_PER_CHUNK;

/// An exactly-32-byte opaque value: a leaf, an internal node, or a root.
///
/// The length lives in the type, so a `Chunk` can never be anything but
/// 32 bytes. Variable-length input is checked once, in [`Chunk::from_slice`]
/// or when parsing hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Chunk(pub [u8; BYTES_PER_CHUNK]);

/// Why a chunk could not be built from external input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkParseError {
    /// Input is not valid hex.
    InvalidHex,
    /// Decoded length is not 32 bytes.
    WrongLength(usize),
}

impl fmt::Display for ChunkParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkParseError::InvalidHex => write!(f, "invalid hex"),
            ChunkParseError::WrongLength(len) => {
                write!(f, "decoded {} bytes, expected {}", len, BYTES_PER_CHUNK)
            }
        }
    }
}

impl Chunk {
    pub const ZERO: Chunk = Chunk([0u8; BYTES_PER_CHUNK]);

    pub const fn new(bytes: [u8; BYTES_PER_CHUNK]) -> Self {
        Chunk(bytes)
    }

    /// Every byte set to `byte`. Mostly useful for fixtures.
    pub const fn filled(byte: u8) -> Self {
        Chunk([byte; BYTES_PER_CHUNK])
    }

    /// Returns `None` unless `bytes` is exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; BYTES_PER_CHUNK] = bytes.try_into().ok()?;
        Some(Chunk(arr))
    }

    pub fn as_bytes(&self) -> &[u8; BYTES_PER_CHUNK] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; BYTES_PER_CHUNK]
    }

    /// `0x`-prefixed lowercase hex, the form used on every text wire.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(2 + BYTES_PER_CHUNK * 2);
        out.push_str("0x");
        out.push_str(&hex::encode(self.0));
        out
    }

    /// Parses hex with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, ChunkParseError> {
        let digits = strip_hex_prefix(s);
        let bytes = hex::decode(digits).map_err(|_| ChunkParseError::InvalidHex)?;
        Chunk::from_slice(&bytes).ok_or(ChunkParseError::WrongLength(bytes.len()))
    }
}

/// Drops a leading `0x`/`0X` if present.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

impl From<[u8; BYTES_PER_CHUNK]> for Chunk {
    fn from(bytes: [u8; BYTES_PER_CHUNK]) -> Self {
        Chunk(bytes)
    }
}

impl From<Chunk> for [u8; BYTES_PER_CHUNK] {
    fn from(chunk: Chunk) -> Self {
        chunk.0
    }
}

impl AsRef<[u8]> for Chunk {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Chunk {
    type Err = ChunkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chunk::from_hex(s)
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk({})", self)
    }
}

impl Serialize for Chunk {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct ChunkVisitor;

impl<'de> Visitor<'de> for ChunkVisitor {
    type Value = Chunk;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 0x-prefixed 32-byte hex string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Chunk, E> {
        Chunk::from_hex(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Chunk {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ChunkVisitor)
    }
}
