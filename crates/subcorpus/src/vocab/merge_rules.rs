//! # Merge Rules ``[ (T, T) -> T ]``

use crate::{
    errors::{SCResult, SubcorpusError},
    types::{Pair, SCHashMap, TokenType},
};

/// One learned ``(left, right) -> merged`` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeRule<T: TokenType> {
    /// The left parent token.
    pub left: T,

    /// The right parent token.
    pub right: T,

    /// The token produced by the merge.
    pub merged: T,
}

impl<T: TokenType> MergeRule<T> {
    /// Create a rule.
    pub fn new(
        left: T,
        right: T,
        merged: T,
    ) -> Self {
        Self {
            left,
            right,
            merged,
        }
    }

    /// The ``(left, right)`` pair.
    pub fn pair(&self) -> Pair<T> {
        (self.left, self.right)
    }
}

/// Ordered merge rules; position is rank, lower ranks merge first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRules<T: TokenType> {
    rules: Vec<MergeRule<T>>,

    /// ``{ pair -> rank }``
    ranks: SCHashMap<Pair<T>, usize>,
}

impl<T: TokenType> MergeRules<T> {
    /// Build from rules in rank order.
    ///
    /// ## Errors
    /// [`SubcorpusError::VocabConflict`] if a pair or a merged token repeats.
    pub fn from_rules(rules: Vec<MergeRule<T>>) -> SCResult<Self> {
        let mut merges = Self::default();
        for rule in rules {
            merges.push(rule)?;
        }
        Ok(merges)
    }

    /// Append a rule with the next rank.
    pub fn push(
        &mut self,
        rule: MergeRule<T>,
    ) -> SCResult<()> {
        if self.ranks.contains_key(&rule.pair()) {
            return Err(SubcorpusError::VocabConflict(format!(
                "duplicate merge pair {:?}",
                rule.pair()
            )));
        }
        if self.rules.iter().any(|r| r.merged == rule.merged) {
            return Err(SubcorpusError::VocabConflict(format!(
                "duplicate merge target {}",
                rule.merged
            )));
        }
        self.ranks.insert(rule.pair(), self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// The rules, in rank order.
    pub fn rules(&self) -> &[MergeRule<T>] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Are there no rules?
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rank of a pair, if it merges.
    pub fn rank(
        &self,
        pair: Pair<T>,
    ) -> Option<usize> {
        self.ranks.get(&pair).copied()
    }

    /// The merged token for a pair, if it merges.
    pub fn lookup(
        &self,
        pair: Pair<T>,
    ) -> Option<T> {
        self.rank(pair).map(|rank| self.rules[rank].merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_rules() {
        let merges: MergeRules<u32> = MergeRules::from_rules(vec![
            MergeRule::new(1, 2, 256),
            MergeRule::new(256, 3, 257),
        ])
        .unwrap();

        assert_eq!(merges.len(), 2);
        assert!(!merges.is_empty());
        assert_eq!(merges.rank((1, 2)), Some(0));
        assert_eq!(merges.rank((256, 3)), Some(1));
        assert_eq!(merges.rank((2, 1)), None);
        assert_eq!(merges.lookup((256, 3)), Some(257));
        assert_eq!(merges.rules()[1].pair(), (256, 3));
    }

    #[test]
    fn test_duplicates_rejected() {
        assert!(
            MergeRules::<u32>::from_rules(vec![
                MergeRule::new(1, 2, 256),
                MergeRule::new(1, 2, 257),
            ])
            .is_err()
        );
        assert!(
            MergeRules::<u32>::from_rules(vec![
                MergeRule::new(1, 2, 256),
                MergeRule::new(2, 3, 256),
            ])
            .is_err()
        );
    }
}
