//! Error types that can occur during multidict operation.
use crate::common::ByteStr;

/// An error that can occur in multidict operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No record matches the key, and no default was supplied.
    #[error("key not found: {0:?}")]
    KeyNotFound(ByteStr),
    /// `popitem` on an empty multidict.
    #[error("empty multidict")]
    Empty,
    /// Argument has the wrong shape or family.
    #[error(transparent)]
    TypeMismatch(#[from] Mismatch),
    /// A guarded iterator observed a mutation.
    #[error("multidict changed during iteration")]
    ChangedDuringIteration,
}

/// Error category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A missing key, or a pop from an empty multidict.
    NotFound,
    /// See [`Error::TypeMismatch`].
    TypeMismatch,
    /// See [`Error::ChangedDuringIteration`].
    ChangedDuringIteration,
}

impl Error {
    pub(crate) fn not_found(key: &str) -> Self {
        Self::KeyNotFound(ByteStr::copy_from_str(key))
    }

    /// Returns the error category.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::KeyNotFound(_) | Self::Empty => ErrorKind::NotFound,
            Self::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Self::ChangedDuringIteration => ErrorKind::ChangedDuringIteration,
        }
    }

    /// Returns `true` if no record matched.
    #[inline]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound)
    }
}

// ===== Type Mismatch =====

/// Wrong argument shape, arity or family.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Mismatch {
    #[error("{method} takes at most 1 positional argument ({given} given)")]
    TooManyArguments { method: &'static str, given: usize },
    #[error("{method} takes either dict or list of (key, value) pairs, found sequence of length {len}")]
    NotAPair { method: &'static str, len: usize },
    #[error("{proxy} requires {owner} or {proxy} instance")]
    WrongFamily { proxy: &'static str, owner: &'static str },
    #[error("parameter should be a multidict or multidict proxy")]
    NotVersioned,
    #[error("can't serialize {name}")]
    Serialize { name: &'static str },
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_message() {
        assert_eq!(Error::not_found("some_key").to_string(), "key not found: \"some_key\"");
        assert_eq!(Error::Empty.to_string(), "empty multidict");

        let err = Error::from(Mismatch::TooManyArguments { method: "extend", given: 2 });
        assert_eq!(err.to_string(), "extend takes at most 1 positional argument (2 given)");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let err = Error::from(Mismatch::WrongFamily { proxy: "MultiDictProxy", owner: "MultiDict" });
        assert_eq!(err.to_string(), "MultiDictProxy requires MultiDict or MultiDictProxy instance");
    }

    #[test]
    fn error_kind() {
        assert!(Error::Empty.is_not_found());
        assert!(Error::not_found("a").is_not_found());
        assert!(!Error::ChangedDuringIteration.is_not_found());
        assert_eq!(Error::ChangedDuringIteration.kind(), ErrorKind::ChangedDuringIteration);
    }
}
