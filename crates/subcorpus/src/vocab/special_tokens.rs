//! # Special Token Table

use crate::{
    errors::{SCResult, SubcorpusError},
    types::TokenType,
    vocab::VocabMapping,
};

/// The reserved structural markers, in allocation order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum ReservedToken {
    /// Sequence start.
    #[strum(serialize = "<startoftext>")]
    StartOfText,

    /// Field separator.
    #[strum(serialize = "<separator>")]
    Separator,

    /// Sequence end.
    #[strum(serialize = "<endoftext>")]
    EndOfText,

    /// Unknown-token placeholder.
    #[strum(serialize = "<unk>")]
    Unknown,
}

impl ReservedToken {
    /// The marker text.
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }
}

/// Ordered ``{ name -> T }`` table of special tokens.
///
/// Names and ids are pairwise distinct. Names are non-empty and contain
/// no whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialTokenTable<T: TokenType> {
    entries: Vec<(String, T)>,
}

impl<T: TokenType> SpecialTokenTable<T> {
    /// Build a validated table.
    ///
    /// ## Arguments
    /// * `entries` - ``(name, token)`` pairs, in table order.
    pub fn from_entries<I, S>(entries: I) -> SCResult<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (name, token) in entries {
            table.insert(name.into(), token)?;
        }
        Ok(table)
    }

    /// Allocate the [`ReservedToken`] markers directly after `vocab`.
    ///
    /// With ``max = vocab.max_token()``, the markers get ``max+1 ..= max+4``
    /// in [`ReservedToken`] order.
    pub fn reserved_after(vocab: &VocabMapping<T>) -> SCResult<Self> {
        use strum::IntoEnumIterator;

        let max = vocab.max_token().ok_or_else(|| {
            SubcorpusError::SpecialTokenConflict("cannot allocate after an empty vocab".into())
        })?;

        let mut table = Self::default();
        let mut next = max;
        for marker in ReservedToken::iter() {
            next = next.checked_add(&T::one()).ok_or_else(|| {
                SubcorpusError::SpecialTokenConflict(format!(
                    "{marker} does not fit the token type after {max}"
                ))
            })?;
            table.insert(marker.as_str().to_string(), next)?;
        }

        table.validate_against(vocab)?;
        Ok(table)
    }

    fn insert(
        &mut self,
        name: String,
        token: T,
    ) -> SCResult<()> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(SubcorpusError::SpecialTokenConflict(format!(
                "invalid special token name {name:?}"
            )));
        }
        if self.get(&name).is_some() {
            return Err(SubcorpusError::SpecialTokenConflict(format!(
                "duplicate special token name {name:?}"
            )));
        }
        if let Some(other) = self.lookup_name(token) {
            return Err(SubcorpusError::SpecialTokenConflict(format!(
                "{name:?} and {other:?} share token {token}"
            )));
        }
        self.entries.push((name, token));
        Ok(())
    }

    /// Check that no special token is also a vocab token.
    pub fn validate_against(
        &self,
        vocab: &VocabMapping<T>,
    ) -> SCResult<()> {
        for (name, token) in &self.entries {
            if vocab.contains(*token) {
                return Err(SubcorpusError::SpecialTokenConflict(format!(
                    "{name:?} token {token} collides with the vocab"
                )));
            }
        }
        Ok(())
    }

    /// Number of special tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The token for a name, if any.
    pub fn get(
        &self,
        name: &str,
    ) -> Option<T> {
        self.entries
            .iter()
            .find_map(|(n, t)| (n == name).then_some(*t))
    }

    /// The token for a reserved marker, if any.
    pub fn get_reserved(
        &self,
        marker: ReservedToken,
    ) -> Option<T> {
        self.get(marker.as_str())
    }

    /// The name for a token, if any.
    pub fn lookup_name(
        &self,
        token: T,
    ) -> Option<&str> {
        self.entries
            .iter()
            .find_map(|(n, t)| (*t == token).then_some(n.as_str()))
    }

    /// Iterate ``(name, T)`` entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, T)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), *t))
    }
}
