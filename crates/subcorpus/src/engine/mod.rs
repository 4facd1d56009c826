//! # Tokenizer Engines
//!
//! [`TokenizerEngine`] is the capability seam between tokenizer orchestration
//! and a concrete tokenizer. [`BasicBpeEngine`] is the shipped byte-level BPE.

use std::path::{Path, PathBuf};

use crate::{
    errors::SCResult,
    types::TokenType,
    vocab::{MergeRules, SpecialTokenTable, VocabMapping},
};

mod basic_bpe;

pub mod bpe_trainer;
pub mod model_io;
pub mod span_buffer;

#[doc(inline)]
pub use basic_bpe::{BasicBpeEngine, BasicBpeOptions};

/// Suffix of the loadable model artifact.
pub const MODEL_SUFFIX: &str = "model";

/// Suffix of the human-readable vocab artifact.
pub const VOCAB_SUFFIX: &str = "vocab";

/// Append ``.{suffix}`` to a file prefix.
///
/// The prefix may already contain dots; they are kept.
pub fn with_suffix(
    prefix: &Path,
    suffix: &str,
) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// The files written by [`TokenizerEngine::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerArtifacts {
    /// ``{prefix}.model``
    pub model_path: PathBuf,

    /// ``{prefix}.vocab``
    pub vocab_path: PathBuf,
}

impl TokenizerArtifacts {
    /// The artifact paths for a file prefix.
    pub fn for_prefix(prefix: &Path) -> Self {
        Self {
            model_path: with_suffix(prefix, MODEL_SUFFIX),
            vocab_path: with_suffix(prefix, VOCAB_SUFFIX),
        }
    }
}

/// A trainable, persistable tokenizer.
pub trait TokenizerEngine {
    /// The token id type.
    type Token: TokenType;

    /// Learn a vocabulary of (at most) `vocab_size` tokens from `text`.
    ///
    /// Replaces any previous model, and clears the special tokens.
    fn train(
        &mut self,
        text: &str,
        vocab_size: usize,
    ) -> SCResult<()>;

    /// The learned vocabulary.
    fn vocab(&self) -> &VocabMapping<Self::Token>;

    /// The learned merges.
    fn merges(&self) -> &MergeRules<Self::Token>;

    /// The attached special tokens.
    fn special_tokens(&self) -> &SpecialTokenTable<Self::Token>;

    /// Attach a special token table.
    ///
    /// ## Errors
    /// If a special token collides with the vocab.
    fn set_special_tokens(
        &mut self,
        table: SpecialTokenTable<Self::Token>,
    ) -> SCResult<()>;

    /// Persist the model under `file_prefix`.
    ///
    /// The parent directory must exist.
    fn save(
        &self,
        file_prefix: &Path,
    ) -> SCResult<TokenizerArtifacts>;

    /// Replace the model with one read from `model_file`.
    fn load(
        &mut self,
        model_file: &Path,
    ) -> SCResult<()>;

    /// Encode text to tokens.
    fn encode(
        &self,
        text: &str,
    ) -> SCResult<Vec<Self::Token>>;

    /// Decode tokens to text.
    fn decode(
        &self,
        tokens: &[Self::Token],
    ) -> SCResult<String>;
}
