//! Grapheme segmentation: split UTF-8 text into user-perceived characters.
//!
//! A word like `"ação"` may be stored precomposed (4 code points) or with
//! combining marks (6 code points); either way it is 4 graphemes. No
//! normalization is applied, so the two spellings of `ã` are distinct units.
//!
//! This crate has no dependencies on the other treemap crates. It is a pure
//! text utility that produces `Vec<String>`.

use unicode_segmentation::{Graphemes, UnicodeSegmentation};

/// Segment `text` into owned extended grapheme clusters, in order.
///
/// # Examples
///
/// ```
/// use grapheme_segmenter::segment;
///
/// assert_eq!(segment("casa"), vec!["c", "a", "s", "a"]);
/// assert!(segment("").is_empty());
/// ```
pub fn segment(text: &str) -> Vec<String> {
    graphemes(text).map(str::to_owned).collect()
}

/// Borrowing form of [`segment`]. Call again to restart from the beginning.
pub fn graphemes(text: &str) -> Graphemes<'_> {
    text.graphemes(true)
}

/// Number of graphemes in `text`.
pub fn grapheme_count(text: &str) -> usize {
    graphemes(text).count()
}
