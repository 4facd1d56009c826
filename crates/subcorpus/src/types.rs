//! # Common Types and Traits
use core::{
    fmt::{Debug, Display},
    hash::Hash,
};

use num_traits::{FromPrimitive, PrimInt, ToPrimitive, Unsigned};

/// A type that can be used as a token id.
///
/// These are constrained to be unsigned primitive integers;
/// such that the max token in a vocabulary is less than `T::max()`.
pub trait TokenType:
    'static
    + PrimInt
    + FromPrimitive
    + ToPrimitive
    + Unsigned
    + Hash
    + Default
    + Debug
    + Display
    + Send
    + Sync
{
}

impl<T> TokenType for T where
    T: 'static
        + PrimInt
        + FromPrimitive
        + ToPrimitive
        + Unsigned
        + Hash
        + Default
        + Debug
        + Display
        + Send
        + Sync
{
}

/// A pair of tokens.
pub type Pair<T> = (T, T);

/// Type Alias for hash maps in this crate.
pub type SCHashMap<K, V> = ahash::AHashMap<K, V>;

/// Type Alias for hash sets in this crate.
pub type SCHashSet<V> = ahash::AHashSet<V>;

/// Lossless `usize -> T` conversion, or [`SubcorpusError::VocabSizeOverflow`].
///
/// [`SubcorpusError::VocabSizeOverflow`]: crate::errors::SubcorpusError::VocabSizeOverflow
pub fn token_from_usize<T: TokenType>(value: usize) -> crate::errors::SCResult<T> {
    T::from_usize(value).ok_or(crate::errors::SubcorpusError::VocabSizeOverflow { size: value })
}

/// `T -> u64`, for display and serialization.
pub fn token_to_u64<T: TokenType>(token: T) -> u64 {
    // Every `TokenType` is an unsigned primitive; this cannot fail.
    token.to_u64().unwrap_or(u64::MAX)
}
