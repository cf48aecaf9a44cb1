use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use code_core::Code;
use grapheme_segmenter::grapheme_count;
use tracing::debug;

use crate::{LexiconError, Result};

/// Parse an alphabet table: one `<code> <grapheme>` pair per line.
///
/// The code is followed by a single space or tab, and everything after that
/// separator is the grapheme, taken verbatim. This keeps whitespace graphemes
/// such as `" "` intact. The rest of the line must be exactly one grapheme.
///
/// Order is preserved exactly, duplicates included, since the codec resolves
/// ambiguity by table position. Blank lines are skipped.
pub fn read_alphabet<R: BufRead>(reader: R) -> Result<Vec<(Code, String)>> {
    let mut table = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let invalid = |reason: String| LexiconError::InvalidAlphabetLine {
            line: idx + 1,
            reason,
        };

        let entry = line.trim_start();
        let (raw_code, grapheme) = entry.split_once([' ', '\t']).unwrap_or((entry, ""));

        let code: u32 = raw_code
            .parse()
            .map_err(|_| invalid(format!("code {raw_code:?} is not a number")))?;
        let code = u8::try_from(code)
            .map_err(|_| invalid(format!("code {code} is outside 0..=255")))?;

        match grapheme_count(grapheme) {
            0 => return Err(invalid(format!("code {code} has no grapheme"))),
            1 => {}
            _ => {
                return Err(invalid(format!(
                    "code {code} maps to {grapheme:?}, which is not a single grapheme"
                )));
            }
        }

        table.push((Code(code), grapheme.to_owned()));
    }

    Ok(table)
}

/// Write `table` in the form [`read_alphabet`] accepts.
pub fn write_alphabet<W: Write>(mut writer: W, table: &[(Code, String)]) -> Result<()> {
    for (code, grapheme) in table {
        writeln!(writer, "{code} {grapheme}")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_alphabet(path: &Path) -> Result<Vec<(Code, String)>> {
    let file = File::open(path).map_err(|source| LexiconError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_alphabet(BufReader::new(file))?;
    debug!(path = %path.display(), entries = table.len(), "alphabet loaded");
    Ok(table)
}

/// Write the table to `path`, truncating any existing file.
pub fn store_alphabet(path: &Path, table: &[(Code, String)]) -> Result<()> {
    let file = File::create(path).map_err(|source| LexiconError::File {
        path: path.to_path_buf(),
        source,
    })?;
    write_alphabet(BufWriter::new(file), table)?;
    debug!(path = %path.display(), entries = table.len(), "alphabet stored");
    Ok(())
}
