//! # Word Budget Accumulator
//!
//! Selects the longest in-order prefix of lines whose total word count
//! stays within a budget.
//!
//! Accumulation stops at the first line which does not fit; it does not skip
//! ahead looking for a shorter line. This can leave budget unused, and is
//! the intended policy.

/// Count the words of a line.
///
/// Words are the `' '`-separated fields; so `""` counts as one word,
/// matching a plain split.
pub fn word_count(line: &str) -> usize {
    line.split(' ').count()
}

/// Outcome of [`WordBudgetAccumulator::offer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetDecision {
    /// The line fit, and was kept.
    Accepted,

    /// The line did not fit; the accumulator is closed.
    Exhausted,
}

/// Stateful word budget accumulator.
#[derive(Debug, Clone)]
pub struct WordBudgetAccumulator {
    budget: usize,
    word_count: usize,
    exhausted: bool,
    lines: Vec<String>,
}

impl WordBudgetAccumulator {
    /// Create an empty accumulator.
    ///
    /// ## Arguments
    /// * `budget` - the maximum total word count.
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            word_count: 0,
            exhausted: false,
            lines: Vec::new(),
        }
    }

    /// The configured budget.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// The running word count of the kept lines.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Has a line been refused?
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// The kept lines, in offer order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Offer the next line.
    ///
    /// Once a line has been refused, every later offer is refused.
    pub fn offer<S>(
        &mut self,
        line: S,
    ) -> BudgetDecision
    where
        S: AsRef<str> + Into<String>,
    {
        if self.exhausted {
            return BudgetDecision::Exhausted;
        }

        let count = word_count(line.as_ref());
        if self.word_count + count > self.budget {
            self.exhausted = true;
            return BudgetDecision::Exhausted;
        }

        self.word_count += count;
        self.lines.push(line.into());
        BudgetDecision::Accepted
    }

    /// Consume the accumulator, returning the kept lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Select the in-order prefix of `lines` which fits in `budget` words.
///
/// See [`WordBudgetAccumulator`].
pub fn accumulate_word_budget<I>(
    lines: I,
    budget: usize,
) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str> + Into<String>,
{
    let mut acc = WordBudgetAccumulator::new(budget);
    for line in lines {
        if acc.offer(line) == BudgetDecision::Exhausted {
            break;
        }
    }
    acc.into_lines()
}
