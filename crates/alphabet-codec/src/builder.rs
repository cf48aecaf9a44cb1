//! Offline alphabet construction from a lexicon's surface forms.

use std::collections::BTreeSet;

use code_core::{Code, FIRST_ASSIGNED_CODE, MAX_ALPHABET_SIZE};
use grapheme_segmenter::graphemes;
use tracing::info;

use crate::AlphabetCodec;

pub type Result<T, E = AlphabetError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum AlphabetError {
    /// More distinct graphemes were observed than there are non-sentinel codes.
    #[error("alphabet has {found} distinct graphemes, but only {max} codes are available")]
    Overflow { found: usize, max: usize },
}

/// Collects the distinct graphemes of every word it is shown and assigns
/// them sequential codes.
///
/// Graphemes are ordered by their UTF-8 bytes, so the same lexicon always
/// produces the same table regardless of record order. Codes start at
/// [`FIRST_ASSIGNED_CODE`]; code 0 stays free for the sentinel.
///
/// ```
/// use alphabet_codec::AlphabetBuilder;
/// use code_core::Code;
///
/// let mut builder = AlphabetBuilder::new();
/// builder.add_words(["casa", "caso"]);
/// let table = builder.build().unwrap();
/// assert_eq!(table[0], (Code(1), "a".to_string()));
/// assert_eq!(table.len(), 4);
/// ```
#[derive(Debug, Default)]
pub struct AlphabetBuilder {
    graphemes: BTreeSet<String>,
}

impl AlphabetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_word(&mut self, word: &str) {
        for g in graphemes(word) {
            if !self.graphemes.contains(g) {
                self.graphemes.insert(g.to_owned());
            }
        }
    }

    pub fn add_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.add_word(word.as_ref());
        }
    }

    /// Distinct graphemes seen so far.
    pub fn len(&self) -> usize {
        self.graphemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphemes.is_empty()
    }

    /// Assign codes 1, 2, … in grapheme order and return the table.
    pub fn build(self) -> Result<Vec<(Code, String)>> {
        let found = self.graphemes.len();
        if found > MAX_ALPHABET_SIZE {
            return Err(AlphabetError::Overflow {
                found,
                max: MAX_ALPHABET_SIZE,
            });
        }

        let table: Vec<(Code, String)> = self
            .graphemes
            .into_iter()
            .enumerate()
            .map(|(i, g)| (Code(FIRST_ASSIGNED_CODE.as_u8() + i as u8), g))
            .collect();

        info!(graphemes = table.len(), "alphabet built");
        Ok(table)
    }

    /// Shorthand for [`build`](Self::build) followed by [`AlphabetCodec::new`].
    pub fn build_codec(self) -> Result<AlphabetCodec> {
        self.build().map(AlphabetCodec::new)
    }
}
