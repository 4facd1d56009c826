//! # Vocabulary Tables
//!
//! A trained tokenizer model is:
//! * [`VocabMapping`] - ordered ``{ T -> Vec<u8> }``, ids contiguous from `0`;
//! * [`MergeRules`] - ordered ``[ (T, T) -> T ]`` learned merges;
//! * [`SpecialTokenTable`] - ``{ name -> T }`` ids outside the vocab range.

mod merge_rules;
mod special_tokens;
mod vocab_mapping;

pub mod validators;

#[doc(inline)]
pub use merge_rules::{MergeRule, MergeRules};
#[doc(inline)]
pub use special_tokens::{ReservedToken, SpecialTokenTable};
#[doc(inline)]
pub use vocab_mapping::VocabMapping;
