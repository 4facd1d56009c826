//! # Tokenizer Lifecycle
//!
//! [`TokenizerLifecycle`] loads a persisted tokenizer when one exists, and
//! otherwise trains one from the corpus file, attaches the reserved special
//! tokens, and persists it. Paths come from a [`TokenizerLayout`].

mod manager;

pub mod paths;

#[doc(inline)]
pub use manager::{
    DEFAULT_VOCAB_SIZE,
    LifecycleState,
    TokenizerHandle,
    TokenizerLifecycle,
    TokenizerLifecycleOptions,
    TokenizerOrigin,
};
#[doc(inline)]
pub use paths::{PathBase, ResolvedLayout, TokenizerLayout, find_project_root};
