//! # `subcorpus` Subtitle Corpus and Tokenizer Bootstrap
//!
//! This crate turns a column of raw subtitle strings into a clean,
//! word-budgeted training corpus; and then bootstraps a BPE tokenizer
//! from that corpus, persisting it for reuse.
//!
//! See:
//! * [`corpus`] to clean, filter, budget and write the corpus text.
//! * [`vocab`] for the token/byte mapping, merge rule, and special token tables.
//! * [`engine`] for the [`engine::TokenizerEngine`] capability trait,
//!   and the shipped [`engine::BasicBpeEngine`].
//! * [`lifecycle`] to load-or-train-and-persist a tokenizer.
//! * [`config`] for the serializable run configuration.
//!
//! ## Crate Features
//!
//! #### feature: ``tracing``
//!
//! This enables a number of ``tracing`` instrumentation points.
//! This is only useful for timing tracing of the library itself.
//!
//! ## Example
//!
//! ```rust,no_run
//! use subcorpus::{
//!     corpus::{CorpusOptions, CorpusPipeline},
//!     engine::BasicBpeEngine,
//!     lifecycle::{TokenizerLayout, TokenizerLifecycle, TokenizerLifecycleOptions},
//! };
//!
//! fn example(records: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
//!     let layout = TokenizerLayout::default().resolve()?;
//!
//!     let pipeline = CorpusPipeline::new(CorpusOptions::default());
//!     let report = pipeline.run(records, &layout.corpus_file)?;
//!     println!("{} words written", report.stats.selected_words);
//!
//!     let lifecycle = TokenizerLifecycle::new(TokenizerLifecycleOptions::new(layout));
//!     let handle = lifecycle.get_tokenizer(BasicBpeEngine::<u32>::default())?;
//!     println!("tokenizer {:?}", handle.origin);
//!     Ok(())
//! }
//! ```
#![warn(missing_docs, unused)]

pub mod config;
pub mod corpus;
pub mod engine;
pub mod errors;
pub mod lifecycle;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use errors::{LifecycleError, SCResult, SubcorpusError};
#[doc(inline)]
pub use types::TokenType;
