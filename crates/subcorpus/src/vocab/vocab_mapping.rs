//! # Vocab Mapping ``{ T -> Vec<u8> }``

use crate::{
    errors::{SCResult, SubcorpusError},
    types::{SCHashMap, TokenType, token_from_usize, token_to_u64},
    vocab::MergeRules,
};

/// Ordered ``{ T -> Vec<u8> }`` token vocabulary.
///
/// Ids are contiguous from `0`; entry `i` is token `i`.
/// Order is training order: the 256 byte tokens, then one entry per merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabMapping<T: TokenType> {
    spans: Vec<Vec<u8>>,
    _token: core::marker::PhantomData<T>,
}

impl<T: TokenType> VocabMapping<T> {
    /// The byte-level vocabulary: token `b` is the single byte `b`.
    pub fn byte_level() -> Self {
        Self {
            spans: (0..=u8::MAX).map(|b| vec![b]).collect(),
            _token: Default::default(),
        }
    }

    /// Build from spans listed in id order.
    ///
    /// ## Errors
    /// [`SubcorpusError::VocabSizeOverflow`] if the last id does not fit `T`.
    pub fn from_ordered_spans(spans: Vec<Vec<u8>>) -> SCResult<Self> {
        if let Some(max) = spans.len().checked_sub(1) {
            token_from_usize::<T>(max)?;
        }
        Ok(Self {
            spans,
            _token: Default::default(),
        })
    }

    /// Build from a ``{ T -> Vec<u8> }`` map.
    ///
    /// ## Errors
    /// [`SubcorpusError::VocabConflict`] if the ids are not exactly `0..len`.
    pub fn try_from_map(map: SCHashMap<T, Vec<u8>>) -> SCResult<Self> {
        let mut items: Vec<(T, Vec<u8>)> = map.into_iter().collect();
        items.sort_by_key(|(t, _)| *t);

        for (idx, (token, _)) in items.iter().enumerate() {
            if token.to_usize() != Some(idx) {
                return Err(SubcorpusError::VocabConflict(format!(
                    "vocab ids are not contiguous: expected {idx}, found {token}"
                )));
            }
        }

        Self::from_ordered_spans(items.into_iter().map(|(_, span)| span).collect())
    }

    /// Build the vocab implied by byte-level merges.
    ///
    /// Each merged token's span is the concatenation of its parents' spans.
    pub fn from_merges(merges: &MergeRules<T>) -> SCResult<Self> {
        let mut vocab = Self::byte_level();
        for (idx, rule) in merges.rules().iter().enumerate() {
            let expected = vocab.len();
            if rule.merged.to_usize() != Some(expected) {
                return Err(SubcorpusError::VocabConflict(format!(
                    "merge #{idx} produces {}, expected {expected}",
                    rule.merged
                )));
            }
            vocab.push_merge(rule.left, rule.right)?;
        }
        Ok(vocab)
    }

    /// Append a token for the concatenation of two existing tokens.
    ///
    /// ## Returns
    /// The new token id.
    pub fn push_merge(
        &mut self,
        left: T,
        right: T,
    ) -> SCResult<T> {
        let token = token_from_usize::<T>(self.spans.len())?;

        let mut span = self
            .get(left)
            .ok_or(SubcorpusError::UnknownToken(token_to_u64(left)))?
            .to_vec();
        span.extend_from_slice(
            self.get(right)
                .ok_or(SubcorpusError::UnknownToken(token_to_u64(right)))?,
        );

        self.spans.push(span);
        Ok(token)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Is the vocab empty?
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The largest token id, if any.
    pub fn max_token(&self) -> Option<T> {
        self.spans.len().checked_sub(1).and_then(T::from_usize)
    }

    /// Is `token` a vocab id?
    pub fn contains(
        &self,
        token: T,
    ) -> bool {
        token.to_usize().is_some_and(|idx| idx < self.spans.len())
    }

    /// Look up the span for a token.
    pub fn get(
        &self,
        token: T,
    ) -> Option<&[u8]> {
        token
            .to_usize()
            .and_then(|idx| self.spans.get(idx))
            .map(|s| s.as_slice())
    }

    /// Iterate ``(T, &[u8])`` entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (T, &[u8])> {
        // Construction guarantees every index fits `T`.
        self.spans
            .iter()
            .enumerate()
            .filter_map(|(idx, span)| T::from_usize(idx).map(|t| (t, span.as_slice())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::MergeRule;

    #[test]
    fn test_byte_level() {
        let vocab: VocabMapping<u32> = VocabMapping::byte_level();
        assert_eq!(vocab.len(), 256);
        assert_eq!(vocab.max_token(), Some(255));
        assert_eq!(vocab.get(65), Some("A".as_bytes()));
        assert!(vocab.contains(255));
        assert!(!vocab.contains(256));
        assert_eq!(vocab.get(256), None);
    }

    #[test]
    fn test_push_merge() {
        let mut vocab: VocabMapping<u16> = VocabMapping::byte_level();
        let ab = vocab.push_merge(b'a' as u16, b'b' as u16).unwrap();
        assert_eq!(ab, 256);
        let abc = vocab.push_merge(ab, b'c' as u16).unwrap();
        assert_eq!(abc, 257);
        assert_eq!(vocab.get(abc), Some("abc".as_bytes()));

        assert!(matches!(
            vocab.push_merge(999, 1),
            Err(SubcorpusError::UnknownToken(999))
        ));
    }

    #[test]
    fn test_try_from_map() {
        let mut map: SCHashMap<u32, Vec<u8>> = Default::default();
        map.insert(1, b"b".to_vec());
        map.insert(0, b"a".to_vec());
        let vocab = VocabMapping::try_from_map(map.clone()).unwrap();
        assert_eq!(
            vocab.iter().collect::<Vec<_>>(),
            vec![(0, "a".as_bytes()), (1, "b".as_bytes())]
        );

        map.insert(3, b"d".to_vec());
        assert!(matches!(
            VocabMapping::try_from_map(map),
            Err(SubcorpusError::VocabConflict(_))
        ));
    }

    #[test]
    fn test_from_ordered_spans_overflow() {
        let spans: Vec<Vec<u8>> = (0..300).map(|i| vec![(i % 256) as u8]).collect();
        assert!(VocabMapping::<u8>::from_ordered_spans(spans.clone()).is_err());
        assert_eq!(
            VocabMapping::<u16>::from_ordered_spans(spans)
                .unwrap()
                .max_token(),
            Some(299)
        );
    }

    #[test]
    fn test_from_merges() {
        let merges: MergeRules<u32> = MergeRules::from_rules(vec![
            MergeRule::new(b'h' as u32, b'i' as u32, 256),
            MergeRule::new(256, b'!' as u32, 257),
        ])
        .unwrap();
        let vocab = VocabMapping::from_merges(&merges).unwrap();
        assert_eq!(vocab.len(), 258);
        assert_eq!(vocab.get(257), Some("hi!".as_bytes()));

        let gap: MergeRules<u32> =
            MergeRules::from_rules(vec![MergeRule::new(1, 2, 300)]).unwrap();
        assert!(VocabMapping::from_merges(&gap).is_err());
    }
}
