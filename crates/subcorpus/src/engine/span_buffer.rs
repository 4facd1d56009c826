//! # Token Span Buffer

use crate::types::{Pair, TokenType};

/// A mutable span of tokens (a chunk, or a whole text).
///
/// Iteratively rewritten during training and encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenSpanBuf<T: TokenType> {
    tokens: Vec<T>,
}

impl<T: TokenType> TokenSpanBuf<T> {
    const DEC: i32 = -1;
    const INC: i32 = 1;

    /// Create a span buffer from tokens.
    pub fn from_tokens<S>(tokens: S) -> Self
    where
        S: AsRef<[T]>,
    {
        Self {
            tokens: tokens.as_ref().to_vec(),
        }
    }

    /// Create a span buffer of byte-level tokens; token `b` is byte `b`.
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Self {
        Self {
            // Every `TokenType` holds a u8.
            tokens: bytes
                .as_ref()
                .iter()
                .filter_map(|&b| T::from_u8(b))
                .collect(),
        }
    }

    /// View the tokens as a slice.
    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    /// Release the tokens.
    pub fn into_tokens(self) -> Vec<T> {
        self.tokens
    }

    /// Get the length of the span.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Is this span empty?
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get an iterator over [`Pair<T>`] windows of this span.
    pub fn pairs(&self) -> impl Iterator<Item = Pair<T>> + '_ {
        self.tokens.windows(2).map(|w| (w[0], w[1]))
    }

    /// Merge all non-overlapping occurrences of `pair -> replacement`, left to right.
    ///
    /// # Arguments
    /// * `pair` - the pair to merge.
    /// * `replacement` - the token to replace `pair` with.
    /// * `on_merge` - called with each pair count delta:
    ///   `+1` for an added pair, `-1` for a removed pair.
    pub fn merge_pair_cb<F>(
        &mut self,
        pair: Pair<T>,
        replacement: T,
        on_merge: &mut F,
    ) where
        F: FnMut(Pair<T>, i32),
    {
        let (a, b) = pair;
        let n = self.tokens.len();

        if n < 2 {
            return;
        }

        let mut new_tokens: Vec<T> = Vec::with_capacity(n);

        let mut i = 0;
        while i < n {
            let current = self.tokens[i];

            if i + 1 < n && pair == (current, self.tokens[i + 1]) {
                if let Some(&x) = new_tokens.last() {
                    on_merge((x, a), Self::DEC);
                    on_merge((x, replacement), Self::INC);
                }

                on_merge(pair, Self::DEC);

                if i + 2 < n {
                    let y = self.tokens[i + 2];
                    on_merge((b, y), Self::DEC);
                    on_merge((replacement, y), Self::INC);
                }

                new_tokens.push(replacement);
                i += 2;
            } else {
                new_tokens.push(current);
                i += 1;
            }
        }

        self.tokens = new_tokens;
    }

    /// Merge all non-overlapping occurrences of `pair -> replacement`.
    pub fn merge_pair(
        &mut self,
        pair: Pair<T>,
        replacement: T,
    ) {
        self.merge_pair_cb(pair, replacement, &mut |_, _| {});
    }
}
