//! # Corpus Writer
//!
//! The corpus is a single plain text file. By default lines are written
//! back to back with no delimiter; the terminal mark ending each cleaned
//! line is the only boundary.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{corpus::text_cleaner::TERMINAL_MARKS, errors::SCResult};

/// Options for the corpus writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusWriterOptions {
    /// Text written between consecutive lines.
    ///
    /// Empty by default.
    pub separator: String,
}

impl CorpusWriterOptions {
    /// Sets the line separator.
    pub fn with_separator<S: Into<String>>(
        self,
        separator: S,
    ) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

/// Write `lines` to a [`Write`] writer.
///
/// ## Returns
/// The number of bytes written.
pub fn write_corpus<I, W>(
    lines: I,
    writer: &mut W,
    options: &CorpusWriterOptions,
) -> SCResult<u64>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    W: Write,
{
    let mut written = 0u64;
    for (idx, line) in lines.into_iter().enumerate() {
        if idx > 0 && !options.separator.is_empty() {
            writer.write_all(options.separator.as_bytes())?;
            written += options.separator.len() as u64;
        }
        let line = line.as_ref();
        writer.write_all(line.as_bytes())?;
        written += line.len() as u64;
    }
    writer.flush()?;
    Ok(written)
}

/// Write `lines` to the corpus file at `path`.
///
/// * Creates the parent directory, if absent.
/// * Truncates any previous corpus; runs never append.
///
/// ## Returns
/// The number of bytes written.
pub fn write_corpus_path<I, P>(
    lines: I,
    path: P,
    options: &CorpusWriterOptions,
) -> SCResult<u64>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    let written = write_corpus(lines, &mut writer, options)?;
    log::debug!("wrote {written} corpus bytes to {}", path.display());
    Ok(written)
}

/// Read the whole corpus file as one string.
pub fn read_corpus_path<P: AsRef<Path>>(path: P) -> SCResult<String> {
    Ok(fs::read_to_string(path)?)
}

/// Split delimiter-free corpus text back into lines.
///
/// A line ends after a [`TERMINAL_MARKS`] char which is followed by a
/// non-space char, or by the end of the text.
///
/// This inverts [`write_corpus`] (with no separator) exactly when no line
/// contains a terminal mark directly followed by a non-space char.
pub fn split_corpus_text(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;

    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if !TERMINAL_MARKS.contains(&c) {
            continue;
        }
        let end = idx + c.len_utf8();
        match chars.peek() {
            Some(&(_, next)) if next == ' ' || TERMINAL_MARKS.contains(&next) => {}
            _ => {
                lines.push(&text[start..end]);
                start = end;
            }
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn test_write_corpus_no_delimiter() {
        let mut buf: Vec<u8> = Vec::new();
        let written = write_corpus(
            ["one two.", "three four."],
            &mut buf,
            &CorpusWriterOptions::default(),
        )
        .unwrap();
        assert_eq!(written, 19);
        assert_eq!(String::from_utf8(buf).unwrap(), "one two.three four.");
    }

    #[test]
    fn test_write_corpus_separator() {
        let mut buf: Vec<u8> = Vec::new();
        let options = CorpusWriterOptions::default().with_separator("\n");
        write_corpus(["a.", "b.", "c."], &mut buf, &options).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a.\nb.\nc.");
    }

    #[test]
    fn test_write_corpus_path_overwrites() {
        let dir = TempDir::new("corpus_writer").unwrap();
        let path = dir.path().join("textFiles").join("output.txt");
        let options = CorpusWriterOptions::default();

        write_corpus_path(["first run."], &path, &options).unwrap();
        assert_eq!(read_corpus_path(&path).unwrap(), "first run.");

        // Existing directory, existing file: replaced, not appended.
        write_corpus_path(["second."], &path, &options).unwrap();
        assert_eq!(read_corpus_path(&path).unwrap(), "second.");
    }

    #[test]
    fn test_split_corpus_text() {
        assert_eq!(
            split_corpus_text("one two.three four.five."),
            vec!["one two.", "three four.", "five."]
        );
        assert_eq!(
            split_corpus_text("Mr. Smith is here.Bye."),
            vec!["Mr. Smith is here.", "Bye."]
        );
        assert_eq!(split_corpus_text("trailing"), vec!["trailing"]);
        assert!(split_corpus_text("").is_empty());
    }

    proptest! {
        #[test]
        fn prop_write_then_split(
            lines in prop::collection::vec("[A-Z][a-z]{0,5}( [a-z']{1,6}\\.?){0,4} [a-z]{1,5}\\.", 0..20),
        ) {
            let mut buf: Vec<u8> = Vec::new();
            write_corpus(&lines, &mut buf, &CorpusWriterOptions::default()).unwrap();
            let text = String::from_utf8(buf).unwrap();
            let split: Vec<&str> = split_corpus_text(&text);
            prop_assert_eq!(split, lines.iter().map(|s| s.as_str()).collect::<Vec<_>>());
        }
    }
}
