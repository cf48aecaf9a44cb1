//! Core `Code` type and sentinels for grapheme-coded lexicon tries.
//!
//! Every grapheme (user-perceived character) of a word is translated into a
//! single byte before it enters the trie. This crate defines that byte, the
//! reserved "no mapping" sentinel on the encode side, and the fallback marker
//! produced on the decode side.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Single-byte code assigned to a grapheme by an alphabet table.
///
/// Code 0 is reserved as the [`UNKNOWN_CODE`] sentinel. Codes are not
/// guaranteed unique or contiguous; the table builder hands them out
/// sequentially starting at [`FIRST_ASSIGNED_CODE`].
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(pub u8);

impl Code {
    /// Raw byte value.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self.0
    }

    /// Convert to usize for indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Whether this is the "no mapping" sentinel.
    #[inline]
    pub fn is_unknown(self) -> bool {
        self == UNKNOWN_CODE
    }
}

impl From<u8> for Code {
    #[inline]
    fn from(value: u8) -> Self {
        Code(value)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sentinel code for "grapheme not in alphabet" and "missing trie edge".
pub const UNKNOWN_CODE: Code = Code(0);

/// First code handed out by the alphabet builder.
pub const FIRST_ASSIGNED_CODE: Code = Code(1);

/// Number of codes available to real graphemes (1..=255).
pub const MAX_ALPHABET_SIZE: usize = u8::MAX as usize;

/// Grapheme returned when a code has no entry in the alphabet table.
pub const FALLBACK_GRAPHEME: &str = "\\";
