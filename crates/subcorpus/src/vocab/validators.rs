//! Validators for vocab configuration options.
use crate::{
    errors::{SCResult, SubcorpusError},
    types::TokenType,
};

/// The size of the u8 space.
pub const U8_SIZE: usize = u8::MAX as usize + 1;

/// Validates and returns the vocabulary size.
///
/// The size must cover the u8 space, and every id below it must fit in `T`.
pub fn try_vocab_size<T: TokenType>(vocab_size: usize) -> SCResult<usize> {
    if vocab_size < U8_SIZE {
        Err(SubcorpusError::VocabSizeTooSmall { size: vocab_size })
    } else if T::from_usize(vocab_size - 1).is_none() {
        Err(SubcorpusError::VocabSizeOverflow { size: vocab_size })
    } else {
        Ok(vocab_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocab_size() {
        assert_eq!(try_vocab_size::<u16>(256).unwrap(), 256);
        assert_eq!(try_vocab_size::<u32>(1024).unwrap(), 1024);

        assert!(matches!(
            try_vocab_size::<u16>(100),
            Err(SubcorpusError::VocabSizeTooSmall { size: 100 })
        ));
        assert!(matches!(
            try_vocab_size::<u16>(0),
            Err(SubcorpusError::VocabSizeTooSmall { size: 0 })
        ));

        assert_eq!(
            try_vocab_size::<u16>(u16::MAX as usize + 1).unwrap(),
            u16::MAX as usize + 1
        );
        assert!(try_vocab_size::<u16>(u16::MAX as usize + 2).is_err());

        assert_eq!(try_vocab_size::<u8>(256).unwrap(), 256);
        assert!(try_vocab_size::<u8>(257).is_err());
    }
}
