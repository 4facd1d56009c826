//! # Tokenizer Lifecycle Manager
//!
//! ```text
//! CHECK_EXISTING -> LOAD -> READY
//!                -> REQUIRE_CORPUS -> TRAIN -> ASSIGN_SPECIAL_TOKENS -> PERSIST -> READY
//! (any stage)    -> FAILED
//! ```

use std::fs;

use crate::{
    corpus::read_corpus_path,
    engine::{TokenizerArtifacts, TokenizerEngine},
    errors::{LifecycleError, SubcorpusError},
    lifecycle::paths::ResolvedLayout,
    vocab::SpecialTokenTable,
};

/// The default trained vocab size.
pub const DEFAULT_VOCAB_SIZE: usize = 1024;

/// Lifecycle stages; each transition is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// Looking for a persisted model.
    CheckExisting,

    /// Loading the persisted model.
    Load,

    /// Checking the corpus file is present.
    RequireCorpus,

    /// Training on the corpus.
    Train,

    /// Allocating the reserved special tokens.
    AssignSpecialTokens,

    /// Writing the model artifacts.
    Persist,

    /// The tokenizer is usable.
    Ready,

    /// A stage failed; nothing is returned.
    Failed,
}

/// How a [`TokenizerHandle`] came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum TokenizerOrigin {
    /// Loaded from persisted artifacts.
    Loaded,

    /// Trained in this run, and then persisted.
    Trained,
}

/// A ready tokenizer engine.
#[derive(Debug)]
pub struct TokenizerHandle<E> {
    /// The engine.
    pub engine: E,

    /// Whether the engine was loaded or trained.
    pub origin: TokenizerOrigin,

    /// The artifact files backing the engine.
    pub artifacts: TokenizerArtifacts,
}

/// Options for [`TokenizerLifecycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerLifecycleOptions {
    /// The resolved corpus and artifact paths.
    pub layout: ResolvedLayout,

    /// The vocab size to train, when training is needed.
    pub vocab_size: usize,
}

impl TokenizerLifecycleOptions {
    /// Options with the default vocab size.
    pub fn new(layout: ResolvedLayout) -> Self {
        Self {
            layout,
            vocab_size: DEFAULT_VOCAB_SIZE,
        }
    }

    /// Set the vocab size.
    pub fn with_vocab_size(
        self,
        vocab_size: usize,
    ) -> Self {
        Self { vocab_size, ..self }
    }
}

/// Load-or-train-and-persist orchestration for a [`TokenizerEngine`].
///
/// A persisted model is never retrained or modified.
#[derive(Debug, Clone)]
pub struct TokenizerLifecycle {
    options: TokenizerLifecycleOptions,
}

impl TokenizerLifecycle {
    /// Create a lifecycle manager.
    pub fn new(options: TokenizerLifecycleOptions) -> Self {
        Self { options }
    }

    /// The manager options.
    pub fn options(&self) -> &TokenizerLifecycleOptions {
        &self.options
    }

    fn enter(
        &self,
        state: LifecycleState,
    ) {
        log::info!("tokenizer lifecycle: {state}");
    }

    /// Is there a persisted model to load?
    pub fn check_existing(&self) -> bool {
        self.options.layout.model_file.is_file()
    }

    /// Produce a ready tokenizer.
    ///
    /// If ``{prefix}.model`` exists, `engine` loads it; training and special
    /// token assignment are skipped. Otherwise `engine` trains on the whole
    /// corpus file, receives the reserved special tokens, and is persisted.
    ///
    /// ## Errors
    /// A [`LifecycleError`] naming the failed stage; `engine` is dropped.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, engine)))]
    pub fn get_tokenizer<E: TokenizerEngine>(
        &self,
        engine: E,
    ) -> Result<TokenizerHandle<E>, LifecycleError> {
        let result = self.drive(engine);
        match &result {
            Ok(handle) => {
                self.enter(LifecycleState::Ready);
                log::info!(
                    "tokenizer {}: {} vocab tokens, {} special tokens",
                    handle.origin,
                    handle.engine.vocab().len(),
                    handle.engine.special_tokens().len()
                );
            }
            Err(err) => {
                self.enter(LifecycleState::Failed);
                log::error!("{err}");
            }
        }
        result
    }

    fn drive<E: TokenizerEngine>(
        &self,
        mut engine: E,
    ) -> Result<TokenizerHandle<E>, LifecycleError> {
        let layout = &self.options.layout;

        self.enter(LifecycleState::CheckExisting);
        if self.check_existing() {
            self.enter(LifecycleState::Load);
            engine
                .load(&layout.model_file)
                .map_err(|source| LifecycleError::LoadFailed {
                    path: layout.model_file.clone(),
                    source,
                })?;
            return Ok(TokenizerHandle {
                engine,
                origin: TokenizerOrigin::Loaded,
                artifacts: TokenizerArtifacts::for_prefix(&layout.file_prefix),
            });
        }

        self.enter(LifecycleState::RequireCorpus);
        if !layout.corpus_file.is_file() {
            return Err(LifecycleError::MissingInputFile {
                path: layout.corpus_file.clone(),
            });
        }

        self.enter(LifecycleState::Train);
        let text = read_corpus_path(&layout.corpus_file)
            .map_err(|source| LifecycleError::TrainingFailed { source })?;
        log::info!(
            "training vocab size {} on {} ({} bytes)",
            self.options.vocab_size,
            layout.corpus_file.display(),
            text.len()
        );
        engine
            .train(&text, self.options.vocab_size)
            .map_err(|source| LifecycleError::TrainingFailed { source })?;
        drop(text);

        self.enter(LifecycleState::AssignSpecialTokens);
        let specials = SpecialTokenTable::reserved_after(engine.vocab())
            .map_err(|source| LifecycleError::SpecialTokensFailed { source })?;
        for (name, token) in specials.iter() {
            log::debug!("special token {name} = {token}");
        }
        engine
            .set_special_tokens(specials)
            .map_err(|source| LifecycleError::SpecialTokensFailed { source })?;

        self.enter(LifecycleState::Persist);
        let persistence_failed = |source: SubcorpusError| LifecycleError::PersistenceFailed {
            prefix: layout.file_prefix.clone(),
            source,
        };
        if let Some(parent) = layout.file_prefix.parent() {
            fs::create_dir_all(parent).map_err(|e| persistence_failed(e.into()))?;
        }
        let artifacts = engine.save(&layout.file_prefix).map_err(persistence_failed)?;

        Ok(TokenizerHandle {
            engine,
            origin: TokenizerOrigin::Trained,
            artifacts,
        })
    }
}
