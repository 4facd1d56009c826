//! # Run Configuration
//!
//! Every field has a default, so `{}` is a complete config:
//! ```json
//! {
//!   "corpus": { "word_budget": 350000, "writer": { "separator": "" } },
//!   "tokenizer": {
//!     "vocab_size": 1024,
//!     "split_pattern": null,
//!     "layout": {
//!       "base": "working_directory",
//!       "corpus_file": "textFiles/output.txt",
//!       "file_prefix": "tokenizers/tokenizer"
//!     }
//!   }
//! }
//! ```

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    corpus::CorpusOptions,
    engine::BasicBpeOptions,
    errors::SCResult,
    lifecycle::{DEFAULT_VOCAB_SIZE, ResolvedLayout, TokenizerLayout, TokenizerLifecycleOptions},
};

/// Tokenizer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// The vocab size to train.
    pub vocab_size: usize,

    /// Optional span split pattern for training.
    pub split_pattern: Option<String>,

    /// Corpus and artifact paths.
    pub layout: TokenizerLayout,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            vocab_size: DEFAULT_VOCAB_SIZE,
            split_pattern: None,
            layout: TokenizerLayout::default(),
        }
    }
}

impl TokenizerConfig {
    /// The [`BasicBpeOptions`] for this config.
    pub fn engine_options(&self) -> BasicBpeOptions {
        BasicBpeOptions::default().with_pattern(self.split_pattern.clone())
    }

    /// The [`TokenizerLifecycleOptions`] for an already resolved layout.
    pub fn lifecycle_options(
        &self,
        layout: ResolvedLayout,
    ) -> TokenizerLifecycleOptions {
        TokenizerLifecycleOptions::new(layout).with_vocab_size(self.vocab_size)
    }
}

/// Top-level run configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubcorpusConfig {
    /// Corpus selection and writing.
    pub corpus: CorpusOptions,

    /// Tokenizer training and persistence.
    pub tokenizer: TokenizerConfig,
}

impl SubcorpusConfig {
    /// Parse a JSON config.
    pub fn from_json_str(json: &str) -> SCResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn load_json_path<P: AsRef<Path>>(path: P) -> SCResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{corpus::DEFAULT_WORD_BUDGET, lifecycle::PathBase};

    #[test]
    fn test_empty_config_is_default() {
        let config = SubcorpusConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SubcorpusConfig::default());
        assert_eq!(config.corpus.word_budget, DEFAULT_WORD_BUDGET);
        assert_eq!(config.corpus.writer.separator, "");
        assert_eq!(config.tokenizer.vocab_size, 1024);
        assert_eq!(config.tokenizer.engine_options(), BasicBpeOptions::default());
    }

    #[test]
    fn test_partial_config() {
        let config = SubcorpusConfig::from_json_str(
            r#"{
                "corpus": { "word_budget": 10 },
                "tokenizer": {
                    "vocab_size": 512,
                    "split_pattern": " ?\\w+",
                    "layout": { "base": "project_root" }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.corpus.word_budget, 10);
        assert_eq!(config.tokenizer.vocab_size, 512);
        assert_eq!(
            config.tokenizer.engine_options().pattern.as_deref(),
            Some(r" ?\w+")
        );
        assert_eq!(config.tokenizer.layout.base, PathBase::ProjectRoot);
        assert_eq!(
            config.tokenizer.layout.file_prefix,
            PathBuf::from("tokenizers/tokenizer")
        );
    }

    #[test]
    fn test_bad_config() {
        assert!(SubcorpusConfig::from_json_str(r#"{"corpus": {"word_budget": "many"}}"#).is_err());
        assert!(SubcorpusConfig::load_json_path("/nonexistent/config.json").is_err());
    }

    #[test]
    fn test_load_json_path() {
        let dir = tempdir::TempDir::new("config_test").unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"tokenizer": {"vocab_size": 300}}"#).unwrap();

        let config = SubcorpusConfig::load_json_path(&path).unwrap();
        assert_eq!(config.tokenizer.vocab_size, 300);

        let layout = config
            .tokenizer
            .layout
            .resolve_from(dir.path())
            .unwrap();
        let options = config.tokenizer.lifecycle_options(layout);
        assert_eq!(options.vocab_size, 300);
        assert_eq!(
            options.layout.corpus_file,
            dir.path().join("textFiles/output.txt")
        );
    }
}
