//! # Byte Pair Trainer

use core::cmp::{Ordering, Reverse};

use compact_str::CompactString;
use dary_heap::OctonaryHeap;

use crate::{
    engine::span_buffer::TokenSpanBuf,
    errors::{SCResult, SubcorpusError},
    types::{Pair, SCHashMap, SCHashSet, TokenType},
    vocab::{MergeRule, MergeRules, VocabMapping, validators::try_vocab_size},
};

/// A map from [`Pair`] to its occurrence count.
pub type PairCountMap<T> = SCHashMap<Pair<T>, u64>;

/// A map from [`Pair`] to indices over the span table.
pub type PairIndexMap<T> = SCHashMap<Pair<T>, SCHashSet<usize>>;

/// Compile an optional split pattern.
pub fn compile_split_pattern(pattern: Option<&str>) -> SCResult<Option<fancy_regex::Regex>> {
    pattern
        .map(|p| {
            fancy_regex::Regex::new(p)
                .map_err(|e| SubcorpusError::Parse(format!("bad split pattern {p:?}: {e}")))
        })
        .transpose()
}

/// Split `text` into spans; the whole text is one span without a pattern.
pub fn split_spans<'a>(
    splitter: Option<&fancy_regex::Regex>,
    text: &'a str,
) -> SCResult<Vec<&'a str>> {
    let Some(regex) = splitter else {
        return Ok(if text.is_empty() { vec![] } else { vec![text] });
    };

    let mut spans = Vec::new();
    for mat in regex.find_iter(text) {
        let mat = mat.map_err(|e| SubcorpusError::External(e.to_string()))?;
        if !mat.as_str().is_empty() {
            spans.push(mat.as_str());
        }
    }
    Ok(spans)
}

/// Info about a [`Pair`] that could be merged.
#[derive(Debug, Eq)]
struct MergeJob<T: TokenType> {
    count: u64,
    pair: Pair<T>,
}

impl<T: TokenType> MergeJob<T> {
    /// Max-heap by count; ties go to the smaller pair.
    fn heap_key(&self) -> (u64, Reverse<Pair<T>>) {
        (self.count, Reverse(self.pair))
    }
}

impl<T: TokenType> PartialEq for MergeJob<T> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.heap_key() == other.heap_key()
    }
}

impl<T: TokenType> PartialOrd for MergeJob<T> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TokenType> Ord for MergeJob<T> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.heap_key().cmp(&other.heap_key())
    }
}

/// Learned byte-level merges, and the vocab they imply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainResults<T: TokenType> {
    /// ``{ T -> Vec<u8> }``; 256 byte tokens, then one token per merge.
    pub vocab: VocabMapping<T>,

    /// The merges, in learned order.
    pub merges: MergeRules<T>,
}

/// Trainer for byte pair merges.
///
/// Text is split into spans (or kept whole), and unique spans are counted;
/// the merge loop then works on the unique spans, weighted by count.
pub struct BytePairTrainer {
    splitter: Option<fancy_regex::Regex>,
    span_counts: SCHashMap<CompactString, u64>,
}

impl BytePairTrainer {
    /// Create a trainer.
    ///
    /// ## Arguments
    /// * `pattern` - optional span split regex; `None` trains on whole texts.
    pub fn new(pattern: Option<&str>) -> SCResult<Self> {
        Ok(Self {
            splitter: compile_split_pattern(pattern)?,
            span_counts: Default::default(),
        })
    }

    /// Number of unique spans seen.
    pub fn unique_spans(&self) -> usize {
        self.span_counts.len()
    }

    /// Count the spans of `text`.
    pub fn update_from_text(
        &mut self,
        text: &str,
    ) -> SCResult<()> {
        for span in split_spans(self.splitter.as_ref(), text)? {
            *self.span_counts.entry(span.into()).or_default() += 1;
        }
        Ok(())
    }

    /// Learn up to ``vocab_size - 256`` merges.
    ///
    /// Training stops early when no adjacent pair remains.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn train<T: TokenType>(
        self,
        vocab_size: usize,
    ) -> SCResult<TrainResults<T>> {
        let vocab_size = try_vocab_size::<T>(vocab_size)?;
        if self.span_counts.is_empty() {
            return Err(SubcorpusError::EmptyTrainingText);
        }

        let mut vocab: VocabMapping<T> = VocabMapping::byte_level();
        let mut merges: MergeRules<T> = MergeRules::default();

        let num_merges = vocab_size - vocab.len();
        log::info!("Starting BPE training: {num_merges} merges to compute");

        // Sorted, so span indices are stable across runs.
        let mut span_table: Vec<(CompactString, u64)> = self.span_counts.into_iter().collect();
        span_table.sort();

        let (mut spans, span_counts): (Vec<TokenSpanBuf<T>>, Vec<u64>) = span_table
            .into_iter()
            .map(|(span, count)| (TokenSpanBuf::from_bytes(span.as_bytes()), count))
            .unzip();

        log::debug!("Building pair index over {} unique spans", spans.len());
        let mut pair_counts: PairCountMap<T> = Default::default();
        let mut pair_index: PairIndexMap<T> = Default::default();
        for (idx, span) in spans.iter().enumerate() {
            for pair in span.pairs() {
                *pair_counts.entry(pair).or_default() += span_counts[idx];
                pair_index.entry(pair).or_default().insert(idx);
            }
        }

        let mut heap: OctonaryHeap<MergeJob<T>> = pair_counts
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&pair, &count)| MergeJob { count, pair })
            .collect();

        let mut last_log_decile = 0;
        while merges.len() < num_merges {
            let Some(job) = heap.pop() else {
                break;
            };

            let current = pair_counts.get(&job.pair).copied().unwrap_or(0);
            if job.count != current {
                // Lazy refresh.
                if current > 0 {
                    heap.push(MergeJob {
                        count: current,
                        pair: job.pair,
                    });
                }
                continue;
            }

            let new_token = vocab.push_merge(job.pair.0, job.pair.1)?;
            merges.push(MergeRule::new(job.pair.0, job.pair.1, new_token))?;

            let mut touched: SCHashSet<Pair<T>> = Default::default();
            let word_indices = pair_index.remove(&job.pair).unwrap_or_default();
            for &word_idx in &word_indices {
                let count = span_counts[word_idx];
                spans[word_idx].merge_pair_cb(job.pair, new_token, &mut |pair, delta| {
                    let entry = pair_counts.entry(pair).or_default();
                    if delta < 0 {
                        *entry = entry.saturating_sub(count);
                    } else {
                        *entry += count;
                        pair_index.entry(pair).or_default().insert(word_idx);
                        touched.insert(pair);
                    }
                });
            }
            pair_counts.remove(&job.pair);

            for pair in touched {
                let count = pair_counts.get(&pair).copied().unwrap_or(0);
                if count > 0 {
                    heap.push(MergeJob { count, pair });
                }
            }

            let decile = merges.len() * 10 / num_merges;
            if decile > last_log_decile {
                log::info!(
                    "Progress: {}% ({}/{} merges) - Last merge: {:?} -> {} (frequency: {})",
                    decile * 10,
                    merges.len(),
                    num_merges,
                    job.pair,
                    new_token,
                    job.count
                );
                last_log_decile = decile;
            }
        }

        log::info!("Finished training: {} merges completed", merges.len());
        Ok(TrainResults { vocab, merges })
    }
}
