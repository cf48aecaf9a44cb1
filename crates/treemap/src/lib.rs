//! Treemap: a grapheme-coded prefix tree over a lexicon's surface forms.
//!
//! This is the facade crate that wires together the lower-level components:
//! - [`code_core`]: the single-byte `Code` and its sentinels
//! - [`grapheme_segmenter`]: text → grapheme units
//! - [`alphabet_codec`]: grapheme ↔ code translation
//! - [`prefix_trie`]: arena-based trie of code sequences
//! - [`lexicon_io`]: lexicon records and alphabet table files
//!
//! # Quick Start
//!
//! ```
//! use treemap::{AlphabetBuilder, Treemap};
//!
//! let mut builder = AlphabetBuilder::new();
//! builder.add_words(["casa", "caso"]);
//! let mut tree = Treemap::new(builder.build().unwrap());
//!
//! tree.insert_word("casa");
//! assert_eq!(tree.get_word("casa"), "casa");
//! assert_eq!(tree.get_word("caso"), "cas\\");
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// Re-export types that consumers (like the CLI) need.
pub use alphabet_codec::{AlphabetBuilder, AlphabetCodec, AlphabetError};
pub use code_core::{Code, FALLBACK_GRAPHEME, UNKNOWN_CODE};
pub use grapheme_segmenter::segment;
pub use lexicon_io::{
    FieldSplit, LexicalRecord, LexiconError, LexiconOptions, LexiconReader, load_alphabet,
    read_lexicon, store_alphabet,
};
pub use prefix_trie::{NodeRef, PrefixTrie, TrieError, TrieNode};

pub type Result<T, E = TreemapError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum TreemapError {
    #[error(transparent)]
    Lexicon(#[from] LexiconError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{}: {source}", .path.display())]
    File { path: PathBuf, source: io::Error },

    #[error("malformed snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Well-formed JSON whose trie arena is structurally broken.
    #[error("corrupt snapshot: {0}")]
    CorruptTrie(#[from] TrieError),
}

/// Alphabet codec plus prefix trie, operating on whole words.
///
/// The codec is fixed at construction. The trie only grows: words are
/// inserted, never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treemap {
    codec: AlphabetCodec,
    trie: PrefixTrie,
}

impl Treemap {
    /// Create an empty tree over the given alphabet table.
    pub fn new(table: Vec<(Code, String)>) -> Self {
        Self::with_codec(AlphabetCodec::new(table))
    }

    pub fn with_codec(codec: AlphabetCodec) -> Self {
        Treemap {
            codec,
            trie: PrefixTrie::new(),
        }
    }

    /// Encode `word` and insert its code path. Empty words change nothing.
    pub fn insert_word(&mut self, word: &str) {
        let codes = self.codec.encode_word(word);
        self.trie.insert(&codes);
    }

    /// Best-effort retrieval of `word`.
    ///
    /// Returns the decoded path the trie holds for `word`. When the path
    /// breaks, the result ends with [`FALLBACK_GRAPHEME`] at the first missing
    /// position and nothing past it. Graphemes outside the alphabet also come
    /// back as the fallback.
    pub fn get_word(&self, word: &str) -> String {
        let codes = self.codec.encode_word(word);
        let found = self.trie.lookup(&codes);
        self.codec.decode_word(&found)
    }

    /// Whether `word` was inserted as a complete word, not just as a prefix
    /// of longer ones.
    pub fn contains_word(&self, word: &str) -> bool {
        let codes = self.codec.encode_word(word);
        self.trie.contains(&codes)
    }

    /// Insert the surface form of every record, in order.
    pub fn setup_tree<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = &'a LexicalRecord>,
    {
        let before = self.trie.len();
        let mut records = 0usize;
        for entry in entries {
            self.insert_word(&entry.surface);
            records += 1;
        }
        info!(
            records,
            new_nodes = self.trie.len() - before,
            words = self.trie.word_count(),
            "tree built"
        );
    }

    /// Load the alphabet at `alphabet` and build the tree from every record
    /// of the lexicon at `lexicon`.
    pub fn from_files(lexicon: &Path, alphabet: &Path, options: LexiconOptions) -> Result<Self> {
        let table = load_alphabet(alphabet)?;
        let records = read_lexicon(lexicon, options)?;
        let mut tree = Treemap::new(table);
        tree.setup_tree(&records);
        Ok(tree)
    }

    pub fn codec(&self) -> &AlphabetCodec {
        &self.codec
    }

    pub fn trie(&self) -> &PrefixTrie {
        &self.trie
    }

    /// Write the alphabet and trie as a JSON snapshot.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| TreemapError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        debug!(path = %path.display(), nodes = self.trie.len(), "snapshot saved");
        Ok(())
    }

    /// Read a snapshot written by [`save`](Self::save).
    ///
    /// The trie arena is validated before it is returned, so a damaged file
    /// is reported as [`TreemapError::CorruptTrie`] instead of failing later
    /// inside a query.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| TreemapError::File {
            path: path.to_path_buf(),
            source,
        })?;
        let tree: Treemap = serde_json::from_reader(BufReader::new(file))?;
        tree.trie.validate()?;
        debug!(path = %path.display(), nodes = tree.trie.len(), "snapshot loaded");
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(graphemes: &str) -> Vec<(Code, String)> {
        graphemes
            .chars()
            .enumerate()
            .map(|(i, c)| (Code(i as u8 + 1), c.to_string()))
            .collect()
    }

    fn record(surface: &str) -> LexicalRecord {
        LexicalRecord {
            surface: surface.to_string(),
            lemma: surface.to_string(),
            tag: "NOUN".to_string(),
            features: "_".to_string(),
        }
    }

    fn test_tree() -> Treemap {
        Treemap::new(table("acos"))
    }

    // --- insert_word / get_word ---

    #[test]
    fn present_word_is_reconstructed() {
        let mut tree = test_tree();
        tree.setup_tree(&[record("casa")]);
        assert_eq!(tree.get_word("casa"), "casa");
    }

    #[test]
    fn divergent_word_degrades_at_first_missing_edge() {
        let mut tree = test_tree();
        tree.insert_word("casa");
        assert_eq!(tree.get_word("caso"), format!("cas{FALLBACK_GRAPHEME}"));
    }

    #[test]
    fn lookup_inspects_every_position() {
        let mut tree = test_tree();
        tree.insert_word("casa");
        // Same first grapheme, diverging at the second.
        assert_eq!(tree.get_word("coco"), "c\\");
    }

    #[test]
    fn unknown_grapheme_in_query() {
        let mut tree = test_tree();
        tree.insert_word("casa");
        // 'z' encodes to the sentinel, which has no edge under "ca".
        assert_eq!(tree.get_word("caza"), "ca\\");
    }

    #[test]
    fn unknown_graphemes_share_the_sentinel_path() {
        let mut tree = test_tree();
        tree.insert_word("cxa");
        // 'y' and 'x' both encode to 0, so the path exists; it decodes to
        // the fallback.
        assert_eq!(tree.get_word("cya"), "c\\a");
        assert!(tree.contains_word("cya"));
    }

    #[test]
    fn empty_word() {
        let mut tree = test_tree();
        tree.insert_word("");
        assert!(tree.trie().is_empty());
        assert_eq!(tree.get_word(""), "");
        assert!(!tree.contains_word(""));
    }

    #[test]
    fn get_word_on_empty_tree() {
        let tree = test_tree();
        assert_eq!(tree.get_word("casa"), "\\");
    }

    // --- structure ---

    #[test]
    fn insert_is_idempotent() {
        let mut once = test_tree();
        once.insert_word("casa");
        let mut twice = test_tree();
        twice.insert_word("casa");
        twice.insert_word("casa");
        assert_eq!(once, twice);
    }

    #[test]
    fn prefix_is_shared() {
        let mut tree = test_tree();
        tree.insert_word("casa");
        tree.insert_word("caso");
        // c, a, s shared + a, o
        assert_eq!(tree.trie().len(), 5);
    }

    #[test]
    fn path_length_equals_grapheme_count() {
        let mut tree = Treemap::new(vec![
            (Code(1), "a\u{0303}".to_string()),
            (Code(2), "m".to_string()),
            (Code(3), "e".to_string()),
        ]);
        tree.insert_word("ma\u{0303}e");
        assert_eq!(segment("ma\u{0303}e").len(), 3);
        assert_eq!(tree.trie().len(), 3);
        assert_eq!(tree.get_word("ma\u{0303}e"), "ma\u{0303}e");
    }

    // --- contains_word ---

    #[test]
    fn membership_distinguishes_prefixes() {
        let mut tree = test_tree();
        tree.setup_tree(&[record("casa"), record("ca")]);
        assert!(tree.contains_word("casa"));
        assert!(tree.contains_word("ca"));
        assert!(!tree.contains_word("cas"));
        assert_eq!(tree.get_word("cas"), "cas");
    }

    // --- setup_tree ---

    #[test]
    fn setup_tree_order_independent() {
        let records = [record("casa"), record("caso"), record("osso"), record("saco")];

        let mut forward = test_tree();
        forward.setup_tree(&records);
        let mut backward = test_tree();
        backward.setup_tree(records.iter().rev());

        assert_eq!(forward.trie().len(), backward.trie().len());
        for r in &records {
            assert_eq!(forward.get_word(&r.surface), backward.get_word(&r.surface));
            assert!(backward.contains_word(&r.surface));
        }
    }

    #[test]
    fn setup_tree_uses_surface_only() {
        let mut tree = test_tree();
        tree.setup_tree(&[LexicalRecord {
            surface: "saco".into(),
            lemma: "casa".into(),
            tag: "NOUN".into(),
            features: "_".into(),
        }]);
        assert!(tree.contains_word("saco"));
        assert!(!tree.contains_word("casa"));
    }

    // --- persistence ---

    #[test]
    fn snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");

        let mut tree = test_tree();
        tree.setup_tree(&[record("casa"), record("caso")]);
        tree.save(&path).unwrap();

        let back = Treemap::load(&path).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.get_word("caso"), "caso");
    }

    #[test]
    fn load_missing_snapshot() {
        let err = Treemap::load(Path::new("/nonexistent/tree.json")).unwrap_err();
        assert!(matches!(err, TreemapError::File { .. }));
    }

    #[test]
    fn load_malformed_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = Treemap::load(&path).unwrap_err();
        assert!(matches!(err, TreemapError::Snapshot(_)));
    }

    #[test]
    fn load_snapshot_without_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(&path, r#"{"codec":[[1,"a"]],"trie":{"nodes":[]}}"#).unwrap();

        let err = Treemap::load(&path).unwrap_err();
        assert!(matches!(err, TreemapError::CorruptTrie(TrieError::MissingRoot)));
    }

    #[test]
    fn load_snapshot_with_dangling_child() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(
            &path,
            r#"{"codec":[[1,"a"]],"trie":{"nodes":[{"code":0,"terminal":false,"children":[7]}]}}"#,
        )
        .unwrap();

        let err = Treemap::load(&path).unwrap_err();
        assert!(matches!(
            err,
            TreemapError::CorruptTrie(TrieError::DanglingChild { child: 7, .. })
        ));
        assert!(err.to_string().starts_with("corrupt snapshot"));
    }
}
