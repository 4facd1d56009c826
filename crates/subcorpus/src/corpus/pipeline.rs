//! # Corpus Pipeline
//!
//! ``raw records -> clean -> filter -> word budget -> corpus file``

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    corpus::{
        BudgetDecision,
        CorpusWriterOptions,
        RejectReason,
        RowFilter,
        WordBudgetAccumulator,
        clean_line,
        write_corpus_path,
    },
    errors::SCResult,
};

/// The default corpus word budget.
pub const DEFAULT_WORD_BUDGET: usize = 350_000;

/// Options for [`CorpusPipeline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusOptions {
    /// The maximum total word count of the corpus.
    pub word_budget: usize,

    /// Corpus file writer options.
    pub writer: CorpusWriterOptions,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            word_budget: DEFAULT_WORD_BUDGET,
            writer: Default::default(),
        }
    }
}

impl CorpusOptions {
    /// Sets the word budget.
    pub fn with_word_budget(
        self,
        word_budget: usize,
    ) -> Self {
        Self {
            word_budget,
            ..self
        }
    }

    /// Sets the writer options.
    pub fn with_writer(
        self,
        writer: CorpusWriterOptions,
    ) -> Self {
        Self { writer, ..self }
    }
}

/// Counters for one pipeline pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusStats {
    /// Records pulled from the source.
    ///
    /// Records after the budget closed are never inspected.
    pub records_inspected: usize,

    /// Rejected lines, by first failing rule.
    pub rejected: BTreeMap<RejectReason, usize>,

    /// Lines kept in the corpus.
    pub selected_lines: usize,

    /// Total words in the kept lines.
    pub selected_words: usize,

    /// Did an accepted line fail to fit the budget?
    pub budget_exhausted: bool,
}

impl CorpusStats {
    /// Total rejected lines.
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}

/// Selected corpus lines, and how they were chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusSelection {
    /// The kept lines, in source order.
    pub lines: Vec<String>,

    /// Stage counters.
    pub stats: CorpusStats,
}

/// Result of [`CorpusPipeline::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusReport {
    /// Stage counters.
    pub stats: CorpusStats,

    /// Bytes written to the corpus file.
    pub bytes_written: u64,
}

/// Clean, filter, budget, and write a corpus.
#[derive(Debug, Clone)]
pub struct CorpusPipeline {
    options: CorpusOptions,
    filter: RowFilter,
}

impl CorpusPipeline {
    /// Create a pipeline.
    pub fn new(options: CorpusOptions) -> Self {
        Self {
            options,
            filter: RowFilter::new(),
        }
    }

    /// The pipeline options.
    pub fn options(&self) -> &CorpusOptions {
        &self.options
    }

    /// Select corpus lines from raw records.
    ///
    /// Records are pulled lazily; consumption stops when the budget closes.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, records)))]
    pub fn select<I>(
        &self,
        records: I,
    ) -> CorpusSelection
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut stats = CorpusStats::default();
        let mut acc = WordBudgetAccumulator::new(self.options.word_budget);

        for record in records {
            stats.records_inspected += 1;

            let line = clean_line(record.as_ref());
            if let Some(reason) = self.filter.classify(&line) {
                *stats.rejected.entry(reason).or_default() += 1;
                continue;
            }

            if acc.offer(line) == BudgetDecision::Exhausted {
                break;
            }
        }

        stats.selected_words = acc.word_count();
        stats.budget_exhausted = acc.is_exhausted();

        let lines = acc.into_lines();
        stats.selected_lines = lines.len();

        log::info!(
            "corpus selection: {} records inspected, {} rejected, {} lines / {} words kept (budget {})",
            stats.records_inspected,
            stats.rejected_total(),
            stats.selected_lines,
            stats.selected_words,
            self.options.word_budget,
        );
        for (reason, count) in &stats.rejected {
            log::debug!("rejected {reason}: {count}");
        }
        if !stats.budget_exhausted {
            log::warn!("records ran out before the word budget was reached");
        }

        CorpusSelection { lines, stats }
    }

    /// Write selected lines to the corpus file.
    pub fn write<P: AsRef<Path>>(
        &self,
        selection: &CorpusSelection,
        path: P,
    ) -> SCResult<u64> {
        write_corpus_path(&selection.lines, path, &self.options.writer)
    }

    /// Select from `records`, and write the corpus to `path`.
    ///
    /// `records` is consumed and dropped before the corpus is written.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, records, path)))]
    pub fn run<I, P>(
        &self,
        records: I,
        path: P,
    ) -> SCResult<CorpusReport>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        P: AsRef<Path>,
    {
        let selection = self.select(records);
        let bytes_written = self.write(&selection, path.as_ref())?;
        log::info!(
            "wrote corpus: {} ({} bytes)",
            path.as_ref().display(),
            bytes_written
        );
        Ok(CorpusReport {
            stats: selection.stats,
            bytes_written,
        })
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;
    use crate::corpus::read_corpus_path;

    const RECORDS: &[&str] = &[
        "Hello, there!",
        "123 apples",
        "",
        "I'm fine... really",
        "Nice to meet you",
        "helloWorld again",
        "Good night",
        "See you tomorrow then",
    ];

    #[test]
    fn test_options() {
        let options = CorpusOptions::default();
        assert_eq!(options.word_budget, DEFAULT_WORD_BUDGET);
        assert_eq!(options.writer.separator, "");

        let options = options
            .with_word_budget(10)
            .with_writer(CorpusWriterOptions::default().with_separator(" "));
        assert_eq!(options.word_budget, 10);
        assert_eq!(options.writer.separator, " ");
    }

    #[test]
    fn test_select() {
        let pipeline = CorpusPipeline::new(CorpusOptions::default().with_word_budget(9));
        let selection = pipeline.select(RECORDS.iter());

        assert_eq!(
            selection.lines,
            vec!["Hello there.", "Nice to meet you.", "Good night."]
        );

        let stats = &selection.stats;
        assert_eq!(stats.selected_lines, 3);
        assert_eq!(stats.selected_words, 8);
        assert!(stats.budget_exhausted);
        // The last record was refused by the budget.
        assert_eq!(stats.records_inspected, RECORDS.len());
        assert_eq!(stats.rejected[&RejectReason::Empty], 1);
        assert_eq!(stats.rejected[&RejectReason::Ellipsis], 1);
        assert_eq!(stats.rejected[&RejectReason::LeadingDigitOrApostrophe], 1);
        assert_eq!(stats.rejected[&RejectReason::ConcatenatedWord], 1);
        assert_eq!(stats.rejected_total(), 4);
    }

    #[test]
    fn test_select_stops_pulling_records() {
        let pipeline = CorpusPipeline::new(CorpusOptions::default().with_word_budget(2));
        let selection = pipeline.select(RECORDS.iter());

        assert_eq!(selection.lines, vec!["Hello there."]);
        // "Nice to meet you." closes the budget; nothing after it is read.
        assert_eq!(selection.stats.records_inspected, 5);
    }

    #[test]
    fn test_select_runs_out() {
        let pipeline = CorpusPipeline::new(CorpusOptions::default());
        let selection = pipeline.select(["Just one line"]);
        assert_eq!(selection.lines, vec!["Just one line."]);
        assert!(!selection.stats.budget_exhausted);
    }

    #[test]
    fn test_run() {
        let dir = TempDir::new("corpus_pipeline").unwrap();
        let path = dir.path().join("textFiles").join("output.txt");

        let pipeline = CorpusPipeline::new(CorpusOptions::default().with_word_budget(9));
        let records: Vec<String> = RECORDS.iter().map(|s| s.to_string()).collect();
        let report = pipeline.run(records, &path).unwrap();

        let text = read_corpus_path(&path).unwrap();
        assert_eq!(text, "Hello there.Nice to meet you.Good night.");
        assert_eq!(report.bytes_written, text.len() as u64);
        assert_eq!(report.stats.selected_words, 8);
    }
}
