//! # Model Artifact IO
//!
//! A trained engine persists as two files sharing a prefix:
//! * ``{prefix}.model`` - the loadable model;
//! * ``{prefix}.vocab`` - a human-readable listing, never read back.
//!
//! Model files are:
//! ```terminaloutput
//! subcorpus-bpe v1
//! {SPLIT PATTERN, OR AN EMPTY LINE}
//! {NUM SPECIALS}
//! {SPECIAL NAME} {TOKEN}
//! ...
//! {LEFT TOKEN} {RIGHT TOKEN}
//! ...
//! ```
//!
//! Merge `i` produces token ``256 + i``, so merged ids are implicit.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    errors::{SCResult, SubcorpusError},
    types::{TokenType, token_from_usize, token_to_u64},
    vocab::{MergeRule, MergeRules, SpecialTokenTable, VocabMapping, validators::U8_SIZE},
};

/// The first line of every model file.
pub const MODEL_HEADER: &str = "subcorpus-bpe v1";

/// The persisted parts of a byte-level BPE model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelParts<T: TokenType> {
    /// The optional span split pattern.
    pub pattern: Option<String>,

    /// The merges, in rank order.
    pub merges: MergeRules<T>,

    /// The special tokens.
    pub specials: SpecialTokenTable<T>,
}

fn parse_token<T: TokenType>(
    field: &str,
    line_no: usize,
) -> SCResult<T> {
    let id: u64 = field
        .parse()
        .map_err(|e| SubcorpusError::Parse(format!("line {line_no}: {e}: {field:?}")))?;
    T::from_u64(id).ok_or_else(|| {
        SubcorpusError::Parse(format!("line {line_no}: token {id} out of range"))
    })
}

/// Load [`ModelParts`] from a model file.
pub fn load_model_path<T, P>(path: P) -> SCResult<ModelParts<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    read_model(reader)
}

/// Read [`ModelParts`] from a model line reader.
///
/// ## Errors
/// [`SubcorpusError::Parse`] on a bad header, count or token line;
/// [`SubcorpusError::VocabConflict`] or [`SubcorpusError::SpecialTokenConflict`]
/// if the tables are inconsistent.
pub fn read_model<T, R>(reader: R) -> SCResult<ModelParts<T>>
where
    T: TokenType,
    R: BufRead,
{
    let mut lines = reader.lines().enumerate().map(|(idx, line)| (idx + 1, line));
    let mut next_line = |what: &str| -> SCResult<(usize, String)> {
        match lines.next() {
            Some((line_no, line)) => Ok((line_no, line?)),
            None => Err(SubcorpusError::Parse(format!("truncated model: missing {what}"))),
        }
    };

    let (_, header) = next_line("header")?;
    if header != MODEL_HEADER {
        return Err(SubcorpusError::Parse(format!(
            "unsupported model header {header:?}"
        )));
    }

    let (_, pattern) = next_line("split pattern")?;
    let pattern = (!pattern.is_empty()).then_some(pattern);

    let (line_no, count) = next_line("special token count")?;
    let count: usize = count
        .trim()
        .parse()
        .map_err(|e| SubcorpusError::Parse(format!("line {line_no}: {e}: {count:?}")))?;

    let mut entries: Vec<(String, T)> = Vec::with_capacity(count);
    for _ in 0..count {
        let (line_no, line) = next_line("special token")?;
        let (name, id) = line.rsplit_once(' ').ok_or_else(|| {
            SubcorpusError::Parse(format!("line {line_no}: expected `NAME TOKEN`: {line:?}"))
        })?;
        entries.push((name.to_string(), parse_token(id, line_no)?));
    }

    let mut rules: Vec<MergeRule<T>> = Vec::new();
    while let Some((line_no, line)) = lines.next() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let (left, right) = line.split_once(' ').ok_or_else(|| {
            SubcorpusError::Parse(format!("line {line_no}: expected `LEFT RIGHT`: {line:?}"))
        })?;
        let merged = token_from_usize::<T>(U8_SIZE + rules.len())?;
        rules.push(MergeRule::new(
            parse_token(left, line_no)?,
            parse_token(right, line_no)?,
            merged,
        ));
    }

    let merges = MergeRules::from_rules(rules)?;
    let vocab = VocabMapping::from_merges(&merges)?;
    let specials = SpecialTokenTable::from_entries(entries)?;
    specials.validate_against(&vocab)?;

    Ok(ModelParts {
        pattern,
        merges,
        specials,
    })
}

/// Save [`ModelParts`] to a model file.
pub fn save_model_path<T: TokenType, P: AsRef<Path>>(
    model: &ModelParts<T>,
    path: P,
) -> SCResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_model(model, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write [`ModelParts`] to a [`Write`] writer.
pub fn write_model<T, W>(
    model: &ModelParts<T>,
    writer: &mut W,
) -> SCResult<()>
where
    T: TokenType,
    W: Write,
{
    let pattern = model.pattern.as_deref().unwrap_or("");
    if pattern.contains('\n') {
        return Err(SubcorpusError::Parse(
            "split pattern cannot contain a newline".into(),
        ));
    }

    writeln!(writer, "{MODEL_HEADER}")?;
    writeln!(writer, "{pattern}")?;
    writeln!(writer, "{}", model.specials.len())?;
    for (name, token) in model.specials.iter() {
        writeln!(writer, "{name} {}", token_to_u64(token))?;
    }
    for rule in model.merges.rules() {
        writeln!(
            writer,
            "{} {}",
            token_to_u64(rule.left),
            token_to_u64(rule.right)
        )?;
    }
    Ok(())
}

/// Render a span for human inspection.
///
/// Invalid UTF-8 is replaced; control characters are escaped.
pub fn render_span(span: &[u8]) -> String {
    String::from_utf8_lossy(span)
        .chars()
        .map(|c| {
            if c.is_control() {
                c.escape_unicode().to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}

/// Save the human-readable vocab listing.
pub fn save_vocab_listing_path<T: TokenType, P: AsRef<Path>>(
    vocab: &VocabMapping<T>,
    merges: &MergeRules<T>,
    specials: &SpecialTokenTable<T>,
    path: P,
) -> SCResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_vocab_listing(vocab, merges, specials, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write the human-readable vocab listing.
///
/// Lines are:
/// ```terminaloutput
/// [{SPAN}] {TOKEN}
/// [{LEFT SPAN}][{RIGHT SPAN}] -> [{SPAN}] {TOKEN}
/// special [{NAME}] {TOKEN}
/// ```
pub fn write_vocab_listing<T, W>(
    vocab: &VocabMapping<T>,
    merges: &MergeRules<T>,
    specials: &SpecialTokenTable<T>,
    writer: &mut W,
) -> SCResult<()>
where
    T: TokenType,
    W: Write,
{
    let span_of = |token: T| -> SCResult<String> {
        vocab
            .get(token)
            .map(render_span)
            .ok_or(SubcorpusError::UnknownToken(token_to_u64(token)))
    };

    let byte_tokens = vocab.len().min(U8_SIZE);
    for (token, span) in vocab.iter().take(byte_tokens) {
        writeln!(writer, "[{}] {}", render_span(span), token_to_u64(token))?;
    }
    for rule in merges.rules() {
        writeln!(
            writer,
            "[{}][{}] -> [{}] {}",
            span_of(rule.left)?,
            span_of(rule.right)?,
            span_of(rule.merged)?,
            token_to_u64(rule.merged)
        )?;
    }
    for (name, token) in specials.iter() {
        writeln!(writer, "special [{name}] {}", token_to_u64(token))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> ModelParts<u32> {
        let merges = MergeRules::from_rules(vec![
            MergeRule::new(b'a' as u32, b'b' as u32, 256),
            MergeRule::new(256, b'c' as u32, 257),
        ])
        .unwrap();
        let vocab = VocabMapping::from_merges(&merges).unwrap();
        ModelParts {
            pattern: Some(r" ?\w+".to_string()),
            specials: SpecialTokenTable::reserved_after(&vocab).unwrap(),
            merges,
        }
    }

    #[test]
    fn test_write_model_layout() {
        let mut buf = Vec::new();
        write_model(&sample_model(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "subcorpus-bpe v1",
                r" ?\w+",
                "4",
                "<startoftext> 258",
                "<separator> 259",
                "<endoftext> 260",
                "<unk> 261",
                "97 98",
                "256 99",
            ]
        );
    }

    #[test]
    fn test_save_load_model() {
        let model = sample_model();
        tempdir::TempDir::new("model_io_test")
            .and_then(|dir| {
                let path = dir.path().join("tokenizer.model");
                save_model_path(&model, &path).expect("Failed to save model");
                let loaded: ModelParts<u32> = load_model_path(&path).expect("Failed to load model");
                assert_eq!(loaded, model);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_read_model_without_pattern() {
        let text = "subcorpus-bpe v1\n\n0\n104 105\n";
        let model: ModelParts<u16> = read_model(text.as_bytes()).unwrap();
        assert_eq!(model.pattern, None);
        assert!(model.specials.is_empty());
        assert_eq!(model.merges.lookup((104, 105)), Some(256));
    }

    #[test]
    fn test_read_model_errors() {
        let bad: [&str; 5] = [
            "",
            "other v9\n\n0\n",
            "subcorpus-bpe v1\n\nx\n",
            "subcorpus-bpe v1\n\n1\n",
            "subcorpus-bpe v1\n\n0\n1 999\n",
        ];
        for text in bad {
            assert!(read_model::<u32, _>(text.as_bytes()).is_err(), "{text:?}");
        }

        // A special token inside the vocab range.
        let text = "subcorpus-bpe v1\n\n1\n<x> 100\n";
        assert!(matches!(
            read_model::<u32, _>(text.as_bytes()),
            Err(SubcorpusError::SpecialTokenConflict(_))
        ));
    }

    #[test]
    fn test_render_span() {
        assert_eq!(render_span(b"hi there"), "hi there");
        assert_eq!(render_span(b"\n"), "\\u{a}");
        assert_eq!(render_span(&[0xff]), "\u{fffd}");
    }

    #[test]
    fn test_vocab_listing() {
        let model = sample_model();
        let vocab = VocabMapping::from_merges(&model.merges).unwrap();
        let mut buf = Vec::new();
        write_vocab_listing(&vocab, &model.merges, &model.specials, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 256 + 2 + 4);
        assert_eq!(lines[97], "[a] 97");
        assert_eq!(lines[256], "[a][b] -> [ab] 256");
        assert_eq!(lines[257], "[ab][c] -> [abc] 257");
        assert_eq!(lines[261], "special [<unk>] 261");
    }
}
