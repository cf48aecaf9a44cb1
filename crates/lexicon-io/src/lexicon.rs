use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use tracing::{debug, trace};

use crate::{LexiconError, Result};

/// One lexicon entry. Only `surface` is needed to build the trie.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexicalRecord {
    pub surface: String,
    pub lemma: String,
    pub tag: String,
    pub features: String,
}

/// How fields are separated on a lexicon line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldSplit {
    /// Exactly one TAB between fields. Fields are kept verbatim, including
    /// inner, leading and trailing spaces.
    #[default]
    Tab,
    /// Any run of whitespace.
    Whitespace,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LexiconOptions {
    pub split: FieldSplit,
}

/// Streaming lexicon reader: yields the next record or end-of-input.
///
/// Blank lines (empty or whitespace only) and lines with an empty surface
/// form are skipped. Missing trailing fields become empty strings; fields
/// past the fourth are ignored.
///
/// ```
/// use lexicon_io::{LexiconOptions, LexiconReader};
///
/// let data = "casa\tcasa\tNOUN\tGender=Fem\n\ncasas\tcasa\tNOUN\tNumber=Plur\n";
/// let records: Vec<_> = LexiconReader::new(data.as_bytes(), LexiconOptions::default())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].surface, "casas");
/// ```
pub struct LexiconReader<R> {
    lines: Lines<R>,
    options: LexiconOptions,
    line_no: usize,
}

impl<R: BufRead> LexiconReader<R> {
    pub fn new(reader: R, options: LexiconOptions) -> Self {
        LexiconReader {
            lines: reader.lines(),
            options,
            line_no: 0,
        }
    }

    fn parse(&self, line: &str) -> Option<LexicalRecord> {
        if line.trim().is_empty() {
            return None;
        }

        let fields: Vec<&str> = match self.options.split {
            FieldSplit::Tab => line.split('\t').collect(),
            FieldSplit::Whitespace => line.split_whitespace().collect(),
        };

        let field = |i: usize| fields.get(i).copied().unwrap_or_default();
        if field(0).is_empty() {
            return None;
        }

        Some(LexicalRecord {
            surface: field(0).to_owned(),
            lemma: field(1).to_owned(),
            tag: field(2).to_owned(),
            features: field(3).to_owned(),
        })
    }
}

impl<R: BufRead> Iterator for LexiconReader<R> {
    type Item = Result<LexicalRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            match self.parse(&line) {
                Some(record) => return Some(Ok(record)),
                None => trace!(line = self.line_no, "skipping line without surface form"),
            }
        }
    }
}

/// Read every record of the lexicon at `path`.
pub fn read_lexicon(path: &Path, options: LexiconOptions) -> Result<Vec<LexicalRecord>> {
    let file = File::open(path).map_err(|source| LexiconError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let records = LexiconReader::new(BufReader::new(file), options).collect::<Result<Vec<_>>>()?;
    debug!(path = %path.display(), records = records.len(), "lexicon loaded");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn read_all(data: &str, split: FieldSplit) -> Vec<LexicalRecord> {
        LexiconReader::new(data.as_bytes(), LexiconOptions { split })
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn tab_separated_record() {
        let records = read_all("casa\tcasa\tNOUN\tGender=Fem|Number=Sing\n", FieldSplit::Tab);
        assert_eq!(
            records,
            vec![LexicalRecord {
                surface: "casa".into(),
                lemma: "casa".into(),
                tag: "NOUN".into(),
                features: "Gender=Fem|Number=Sing".into(),
            }]
        );
    }

    #[test]
    fn missing_fields_are_empty() {
        let records = read_all("sol\tsol\n", FieldSplit::Tab);
        assert_eq!(records[0].lemma, "sol");
        assert_eq!(records[0].tag, "");
        assert_eq!(records[0].features, "");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let records = read_all("a\tb\tc\td\te\tf\n", FieldSplit::Tab);
        assert_eq!(records[0].features, "d");
    }

    #[test]
    fn blank_lines_and_empty_surface_skipped() {
        let records = read_all("\n   \n\tlemma\tTAG\t_\nlua\tlua\tNOUN\t_\n", FieldSplit::Tab);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].surface, "lua");
    }

    #[test]
    fn crlf_line_endings() {
        let records = read_all("mãe\tmãe\tNOUN\t_\r\npão\tpão\tNOUN\t_\r\n", FieldSplit::Tab);
        assert_eq!(records[0].features, "_");
        assert_eq!(records[1].surface, "pão");
    }

    #[test]
    fn whitespace_split() {
        let records = read_all("casa  casa NOUN\t_\n", FieldSplit::Whitespace);
        assert_eq!(records[0].lemma, "casa");
        assert_eq!(records[0].tag, "NOUN");
        assert_eq!(records[0].features, "_");
    }

    #[test]
    fn tab_split_keeps_inner_spaces() {
        let records = read_all("por favor\tpor favor\tINTJ\t_\n", FieldSplit::Tab);
        assert_eq!(records[0].surface, "por favor");
    }

    #[test]
    fn tab_split_keeps_edge_spaces() {
        let records = read_all(" casa \tcasa\tNOUN\t_ \n", FieldSplit::Tab);
        assert_eq!(records[0].surface, " casa ");
        assert_eq!(records[0].features, "_ ");
    }

    #[test]
    fn read_lexicon_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "casa\tcasa\tNOUN\t_\ncaso\tcaso\tNOUN\t_\n").unwrap();
        let records = read_lexicon(file.path(), LexiconOptions::default()).unwrap();
        let surfaces: Vec<&str> = records.iter().map(|r| r.surface.as_str()).collect();
        assert_eq!(surfaces, vec!["casa", "caso"]);
    }

    #[test]
    fn read_lexicon_missing_file() {
        let err = read_lexicon(Path::new("/nonexistent/lexicon.tsv"), LexiconOptions::default())
            .unwrap_err();
        assert!(matches!(err, LexiconError::File { .. }));
        assert!(err.to_string().contains("/nonexistent/lexicon.tsv"));
    }
}
