//! Alphabet codec mapping grapheme units to single-byte [`Code`]s and back.
//!
//! The codec owns the ordered `(code, grapheme)` table exactly as it was
//! loaded, plus two lookup indices built once at construction:
//! - `by_grapheme`: grapheme → code of the *first* pair listing that grapheme
//! - `by_code`: code → position of the *first* pair listing that code
//!
//! Resolving each key to its first occurrence makes the O(1) lookups agree
//! with a front-to-back scan of the table, including when the table carries
//! duplicate codes or duplicate graphemes. Duplicates are tolerated, never
//! rejected.
//!
//! Translation never fails: an unknown grapheme encodes to [`UNKNOWN_CODE`] and
//! an unknown code decodes to [`FALLBACK_GRAPHEME`].

mod builder;

use std::collections::HashMap;

use code_core::{Code, FALLBACK_GRAPHEME, UNKNOWN_CODE};
use grapheme_segmenter::graphemes;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use builder::{AlphabetBuilder, AlphabetError, Result};

/// Ordered alphabet table with first-match-wins translation in both directions.
///
/// # Example
///
/// ```
/// use alphabet_codec::AlphabetCodec;
/// use code_core::Code;
///
/// let codec = AlphabetCodec::new(vec![
///     (Code(1), "a".to_string()),
///     (Code(2), "c".to_string()),
///     (Code(3), "s".to_string()),
/// ]);
///
/// let codes = codec.encode_word("casa");
/// assert_eq!(codes, vec![Code(2), Code(1), Code(3), Code(1)]);
/// assert_eq!(codec.decode_word(&codes), "casa");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<(Code, String)>", into = "Vec<(Code, String)>")]
pub struct AlphabetCodec {
    /// Pairs in table order. Order decides which pair wins on duplicates.
    table: Vec<(Code, String)>,
    /// Grapheme → first code listed for it.
    by_grapheme: HashMap<String, Code>,
    /// Indexed by `Code::as_usize`; holds the table position of the first
    /// pair with that code.
    by_code: Vec<Option<usize>>,
}

impl AlphabetCodec {
    /// Build a codec over `table`, keeping its order.
    pub fn new(table: Vec<(Code, String)>) -> Self {
        let mut by_grapheme = HashMap::with_capacity(table.len());
        let mut by_code = vec![None; u8::MAX as usize + 1];
        let mut shadowed = 0usize;

        for (pos, (code, grapheme)) in table.iter().enumerate() {
            let slot = &mut by_code[code.as_usize()];
            if slot.is_none() {
                *slot = Some(pos);
            } else {
                shadowed += 1;
            }

            if by_grapheme.contains_key(grapheme) {
                shadowed += 1;
            } else {
                by_grapheme.insert(grapheme.clone(), *code);
            }
        }

        debug!(
            entries = table.len(),
            shadowed, "alphabet codec constructed"
        );

        AlphabetCodec {
            table,
            by_grapheme,
            by_code,
        }
    }

    /// Code of the first pair whose grapheme equals `grapheme`, or
    /// [`UNKNOWN_CODE`] if the grapheme is not in the alphabet.
    #[inline]
    pub fn encode_char(&self, grapheme: &str) -> Code {
        self.by_grapheme
            .get(grapheme)
            .copied()
            .unwrap_or(UNKNOWN_CODE)
    }

    /// Grapheme of the first pair whose code equals `code`, or
    /// [`FALLBACK_GRAPHEME`] if no pair has that code.
    #[inline]
    pub fn decode_char(&self, code: Code) -> &str {
        match self.by_code[code.as_usize()] {
            Some(pos) => &self.table[pos].1,
            None => FALLBACK_GRAPHEME,
        }
    }

    /// Segment `word` into graphemes and encode each one, preserving order.
    ///
    /// The result always has exactly one code per grapheme.
    pub fn encode_word(&self, word: &str) -> Vec<Code> {
        graphemes(word).map(|g| self.encode_char(g)).collect()
    }

    /// Decode each code and concatenate the graphemes.
    pub fn decode_word(&self, codes: &[Code]) -> String {
        codes.iter().map(|&c| self.decode_char(c)).collect()
    }

    /// The table in load order.
    #[inline]
    pub fn table(&self) -> &[(Code, String)] {
        &self.table
    }

    /// Number of pairs in the table (duplicates included).
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table has no pairs. Every grapheme then encodes to
    /// [`UNKNOWN_CODE`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl PartialEq for AlphabetCodec {
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
    }
}

impl Eq for AlphabetCodec {}

impl From<Vec<(Code, String)>> for AlphabetCodec {
    fn from(table: Vec<(Code, String)>) -> Self {
        AlphabetCodec::new(table)
    }
}

impl From<AlphabetCodec> for Vec<(Code, String)> {
    fn from(codec: AlphabetCodec) -> Self {
        codec.table
    }
}
