//! Lexicon ingestion and alphabet-table persistence.
//!
//! - [`LexiconReader`] yields one [`LexicalRecord`] per non-blank line of a
//!   tab-separated lexicon (`surface \t lemma \t tag \t features`).
//! - [`read_alphabet`] / [`write_alphabet`] move the ordered `(code, grapheme)`
//!   table to and from its text form, one `<code> <grapheme>` pair per line.

mod alphabet;
mod lexicon;

use std::io;
use std::path::PathBuf;

pub use alphabet::{load_alphabet, read_alphabet, store_alphabet, write_alphabet};
pub use lexicon::{FieldSplit, LexicalRecord, LexiconOptions, LexiconReader, read_lexicon};

pub type Result<T, E = LexiconError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A file could not be opened or created.
    #[error("{}: {source}", .path.display())]
    File { path: PathBuf, source: io::Error },

    /// An alphabet table line that is not `<code 0..=255> <grapheme>`.
    #[error("alphabet line {line}: {reason}")]
    InvalidAlphabetLine { line: usize, reason: String },
}
