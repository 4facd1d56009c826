//! # Row Filter
//!
//! Heuristic rejection of cleaned lines which look like malformed subtitle
//! segments. The rules are cheap pattern checks, not semantic analysis;
//! some false positives (long real words) and false negatives are expected.

use regex::Regex;

/// Ellipsis markers; including the UTF-8 ellipsis mis-decoded as cp1252.
pub const ELLIPSIS_PATTERN: &str = r"\.{3,}|â€¦";

/// Lines whose words look glued together.
///
/// * a bare lowercase word of 10+ letters;
/// * a lowercase run, then an uppercase letter, then more lowercase.
pub const CONCATENATED_WORD_PATTERN: &str = r"\b[a-z]{10,}\b|[a-z]+[A-Z][a-z]+";

/// Why a line was rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum RejectReason {
    /// The line is empty.
    Empty,

    /// The line contains an ellipsis marker.
    Ellipsis,

    /// The line starts with a digit or an apostrophe.
    LeadingDigitOrApostrophe,

    /// The line looks like it contains words missing a boundary.
    ConcatenatedWord,
}

/// Stateless line filter.
///
/// Patterns are compiled once, at construction.
#[derive(Debug, Clone)]
pub struct RowFilter {
    ellipsis: Regex,
    concatenated: Regex,
}

impl Default for RowFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl RowFilter {
    /// Build a filter with the standard rules.
    pub fn new() -> Self {
        // Both patterns are static and known-good.
        Self {
            ellipsis: Regex::new(ELLIPSIS_PATTERN).unwrap(),
            concatenated: Regex::new(CONCATENATED_WORD_PATTERN).unwrap(),
        }
    }

    /// Should `line` be kept?
    pub fn accept(
        &self,
        line: &str,
    ) -> bool {
        self.classify(line).is_none()
    }

    /// Find the first rule `line` fails, if any.
    ///
    /// Rules are checked in [`RejectReason`] declaration order.
    pub fn classify(
        &self,
        line: &str,
    ) -> Option<RejectReason> {
        if line.is_empty() {
            return Some(RejectReason::Empty);
        }
        if self.ellipsis.is_match(line) {
            return Some(RejectReason::Ellipsis);
        }
        if line.starts_with(|c: char| c.is_ascii_digit() || c == '\'') {
            return Some(RejectReason::LeadingDigitOrApostrophe);
        }
        if self.concatenated.is_match(line) {
            return Some(RejectReason::ConcatenatedWord);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_accept() {
        let filter = RowFilter::new();

        assert!(filter.accept("I am happy."));
        assert!(filter.accept("Where are you going."));
        assert!(filter.accept("It's 5 o'clock."));

        assert!(!filter.accept("123 apple runs."));
        assert!(!filter.accept("thisisaveryveryverylongwordwithoutspaces."));
        assert!(!filter.accept("see... you."));
        assert!(!filter.accept(""));
    }

    #[test]
    fn test_classify() {
        let filter = RowFilter::new();

        assert_eq!(filter.classify("I am happy."), None);
        assert_eq!(filter.classify(""), Some(RejectReason::Empty));
        assert_eq!(filter.classify("Wait...."), Some(RejectReason::Ellipsis));
        assert_eq!(filter.classify("Wait â€¦ no."), Some(RejectReason::Ellipsis));
        assert_eq!(
            filter.classify("9 lives."),
            Some(RejectReason::LeadingDigitOrApostrophe)
        );
        assert_eq!(
            filter.classify("'Cause I said so."),
            Some(RejectReason::LeadingDigitOrApostrophe)
        );
        assert_eq!(
            filter.classify("I saw helloWorld there."),
            Some(RejectReason::ConcatenatedWord)
        );
        assert_eq!(
            filter.classify("We walkedintothenight."),
            Some(RejectReason::ConcatenatedWord)
        );

        // Ellipsis wins over a leading digit.
        assert_eq!(filter.classify("1..."), Some(RejectReason::Ellipsis));
    }

    #[test]
    fn test_short_words_and_two_dots_pass() {
        let filter = RowFilter::new();
        assert!(filter.accept("Go.. now."));
        assert!(filter.accept("Cat dog bird."));
        assert!(filter.accept("Hello World."));
    }

    #[test]
    fn test_accept_filter_preserves_order() {
        let filter = RowFilter::new();
        let lines = vec!["A b.", "1 c.", "D e.", "f... g.", "H i."];
        let kept: Vec<&str> = lines.into_iter().filter(|l| filter.accept(l)).collect();
        assert_eq!(kept, vec!["A b.", "D e.", "H i."]);
    }

    #[test]
    fn test_reject_reason_names() {
        let names: Vec<String> = RejectReason::iter().map(|r| r.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "empty",
                "ellipsis",
                "leading_digit_or_apostrophe",
                "concatenated_word"
            ]
        );
    }
}
