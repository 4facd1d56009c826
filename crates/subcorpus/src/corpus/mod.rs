//! # Corpus Preparation
//!
//! The corpus stages, leaf-first:
//! * [`clean_line`] - normalize one raw record.
//! * [`RowFilter`] - reject malformed lines.
//! * [`WordBudgetAccumulator`] - keep an in-order prefix within a word budget.
//! * [`write_corpus_path`] - write the kept lines to the corpus file.
//!
//! [`CorpusPipeline`] runs all four.

mod corpus_writer;
mod pipeline;
mod row_filter;
mod text_cleaner;
mod word_budget;

#[doc(inline)]
pub use corpus_writer::{
    CorpusWriterOptions,
    read_corpus_path,
    split_corpus_text,
    write_corpus,
    write_corpus_path,
};
#[doc(inline)]
pub use pipeline::{
    CorpusOptions,
    CorpusPipeline,
    CorpusReport,
    CorpusSelection,
    CorpusStats,
    DEFAULT_WORD_BUDGET,
};
#[doc(inline)]
pub use row_filter::{CONCATENATED_WORD_PATTERN, ELLIPSIS_PATTERN, RejectReason, RowFilter};
#[doc(inline)]
pub use text_cleaner::{DEFAULT_TERMINAL, TERMINAL_MARKS, clean_line, is_clean_line, is_kept_char};
#[doc(inline)]
pub use word_budget::{
    BudgetDecision,
    WordBudgetAccumulator,
    accumulate_word_budget,
    word_count,
};
