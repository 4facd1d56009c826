//! # Basic Byte-Level BPE Engine

use std::path::Path;

use crate::{
    engine::{
        TokenizerArtifacts,
        TokenizerEngine,
        bpe_trainer::{BytePairTrainer, compile_split_pattern},
        model_io::{ModelParts, load_model_path, save_model_path, save_vocab_listing_path},
        span_buffer::TokenSpanBuf,
    },
    errors::{SCResult, SubcorpusError},
    types::{TokenType, token_to_u64},
    vocab::{MergeRules, SpecialTokenTable, VocabMapping},
};

/// Options for [`BasicBpeEngine`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BasicBpeOptions {
    /// Optional span split regex (`fancy-regex` syntax).
    ///
    /// `None` trains on the whole text as one sequence.
    pub pattern: Option<String>,
}

impl BasicBpeOptions {
    /// Set the split pattern.
    pub fn with_pattern<S: Into<String>>(
        self,
        pattern: Option<S>,
    ) -> Self {
        Self {
            pattern: pattern.map(Into::into),
        }
    }
}

/// A byte-level BPE tokenizer.
///
/// Ids `0..256` are raw bytes; merge `i` is id ``256 + i``.
/// Special token ids decode to their names, and are never produced by `encode`.
#[derive(Debug, Clone)]
pub struct BasicBpeEngine<T: TokenType = u32> {
    options: BasicBpeOptions,
    splitter: Option<fancy_regex::Regex>,
    vocab: VocabMapping<T>,
    merges: MergeRules<T>,
    specials: SpecialTokenTable<T>,
}

impl<T: TokenType> Default for BasicBpeEngine<T> {
    fn default() -> Self {
        Self {
            options: BasicBpeOptions::default(),
            splitter: None,
            vocab: VocabMapping::byte_level(),
            merges: MergeRules::default(),
            specials: SpecialTokenTable::default(),
        }
    }
}

impl<T: TokenType> BasicBpeEngine<T> {
    /// Create an untrained engine.
    ///
    /// ## Errors
    /// [`SubcorpusError::Parse`] if the split pattern does not compile.
    pub fn new(options: BasicBpeOptions) -> SCResult<Self> {
        let splitter = compile_split_pattern(options.pattern.as_deref())?;
        Ok(Self {
            options,
            splitter,
            ..Default::default()
        })
    }

    /// The engine options.
    pub fn options(&self) -> &BasicBpeOptions {
        &self.options
    }

    /// Split `text` into chunks that are encoded independently.
    ///
    /// Unmatched gaps between pattern matches are kept as chunks, so the
    /// chunks always concatenate back to `text`.
    fn chunks<'a>(
        &self,
        text: &'a str,
    ) -> SCResult<Vec<&'a str>> {
        let Some(regex) = &self.splitter else {
            return Ok(vec![text]);
        };

        let mut chunks = Vec::new();
        let mut last = 0;
        for mat in regex.find_iter(text) {
            let mat = mat.map_err(|e| SubcorpusError::External(e.to_string()))?;
            if mat.start() > last {
                chunks.push(&text[last..mat.start()]);
            }
            if !mat.as_str().is_empty() {
                chunks.push(mat.as_str());
            }
            last = mat.end();
        }
        if last < text.len() {
            chunks.push(&text[last..]);
        }
        Ok(chunks)
    }

    /// Append the tokens for one chunk.
    ///
    /// Each round merges every occurrence of the lowest rank pair present,
    /// so a chunk costs one pass per distinct merge applied.
    fn encode_append_chunk(
        &self,
        chunk: &[u8],
        tokens: &mut Vec<T>,
    ) {
        let mut span: TokenSpanBuf<T> = TokenSpanBuf::from_bytes(chunk);

        loop {
            // The lowest rank merge has the lowest merged id.
            let Some((merged, pair)) = span
                .pairs()
                .filter_map(|pair| self.merges.lookup(pair).map(|t| (t, pair)))
                .min()
            else {
                break;
            };
            span.merge_pair(pair, merged);
        }

        tokens.extend(span.into_tokens());
    }

    fn install(
        &mut self,
        pattern: Option<String>,
        merges: MergeRules<T>,
        specials: SpecialTokenTable<T>,
    ) -> SCResult<()> {
        let vocab = VocabMapping::from_merges(&merges)?;
        specials.validate_against(&vocab)?;
        self.splitter = compile_split_pattern(pattern.as_deref())?;
        self.options.pattern = pattern;
        self.vocab = vocab;
        self.merges = merges;
        self.specials = specials;
        Ok(())
    }
}

impl<T: TokenType> TokenizerEngine for BasicBpeEngine<T> {
    type Token = T;

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text)))]
    fn train(
        &mut self,
        text: &str,
        vocab_size: usize,
    ) -> SCResult<()> {
        let mut trainer = BytePairTrainer::new(self.options.pattern.as_deref())?;
        trainer.update_from_text(text)?;
        log::debug!(
            "Training on {} bytes in {} unique spans",
            text.len(),
            trainer.unique_spans()
        );

        let results = trainer.train::<T>(vocab_size)?;
        self.vocab = results.vocab;
        self.merges = results.merges;
        self.specials = SpecialTokenTable::default();
        Ok(())
    }

    fn vocab(&self) -> &VocabMapping<T> {
        &self.vocab
    }

    fn merges(&self) -> &MergeRules<T> {
        &self.merges
    }

    fn special_tokens(&self) -> &SpecialTokenTable<T> {
        &self.specials
    }

    fn set_special_tokens(
        &mut self,
        table: SpecialTokenTable<T>,
    ) -> SCResult<()> {
        table.validate_against(&self.vocab)?;
        self.specials = table;
        Ok(())
    }

    fn save(
        &self,
        file_prefix: &Path,
    ) -> SCResult<TokenizerArtifacts> {
        let artifacts = TokenizerArtifacts::for_prefix(file_prefix);

        let model = ModelParts {
            pattern: self.options.pattern.clone(),
            merges: self.merges.clone(),
            specials: self.specials.clone(),
        };
        save_model_path(&model, &artifacts.model_path)?;
        save_vocab_listing_path(
            &self.vocab,
            &self.merges,
            &self.specials,
            &artifacts.vocab_path,
        )?;

        log::debug!(
            "Saved {} merges and {} special tokens to {:?}",
            self.merges.len(),
            self.specials.len(),
            artifacts.model_path
        );
        Ok(artifacts)
    }

    fn load(
        &mut self,
        model_file: &Path,
    ) -> SCResult<()> {
        let ModelParts {
            pattern,
            merges,
            specials,
        } = load_model_path::<T, _>(model_file)?;
        self.install(pattern, merges, specials)
    }

    fn encode(
        &self,
        text: &str,
    ) -> SCResult<Vec<T>> {
        let mut tokens = Vec::with_capacity(text.len());
        for chunk in self.chunks(text)? {
            self.encode_append_chunk(chunk.as_bytes(), &mut tokens);
        }
        Ok(tokens)
    }

    fn decode(
        &self,
        tokens: &[T],
    ) -> SCResult<String> {
        let mut bytes: Vec<u8> = Vec::with_capacity(tokens.len() * 2);
        for &token in tokens {
            if let Some(span) = self.vocab.get(token) {
                bytes.extend_from_slice(span);
            } else if let Some(name) = self.specials.lookup_name(token) {
                bytes.extend_from_slice(name.as_bytes());
            } else {
                return Err(SubcorpusError::UnknownToken(token_to_u64(token)));
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
