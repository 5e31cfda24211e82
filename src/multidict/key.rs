use std::borrow::Cow;

use crate::common::ByteStr;
use super::{Istr, error::Error};

// ===== Ref Traits =====

/// A type that can be used to look up a key.
#[allow(private_bounds)]
pub trait AsKey: SealedRef { }
pub(crate) trait SealedRef {
    fn as_key_str(&self) -> &str;

    /// Returns the title-cased form when the key is known to be already folded.
    #[inline]
    fn as_folded(&self) -> Option<&str> {
        None
    }
}

impl AsKey for str { }
impl SealedRef for str {
    #[inline]
    fn as_key_str(&self) -> &str {
        self
    }
}

impl AsKey for String { }
impl SealedRef for String {
    #[inline]
    fn as_key_str(&self) -> &str {
        self.as_str()
    }
}

impl AsKey for ByteStr { }
impl SealedRef for ByteStr {
    #[inline]
    fn as_key_str(&self) -> &str {
        self.as_str()
    }
}

impl AsKey for Istr { }
impl SealedRef for Istr {
    #[inline]
    fn as_key_str(&self) -> &str {
        self.as_str()
    }

    #[inline]
    fn as_folded(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

// blanket implementation
impl<K: AsKey + ?Sized> AsKey for &K { }
impl<K: SealedRef + ?Sized> SealedRef for &K {
    #[inline]
    fn as_key_str(&self) -> &str {
        K::as_key_str(self)
    }

    #[inline]
    fn as_folded(&self) -> Option<&str> {
        K::as_folded(self)
    }
}

/// Not found error carrying the key as given.
pub(crate) fn not_found<K: AsKey + ?Sized>(key: &K) -> Error {
    Error::not_found(key.as_key_str())
}

// ===== Owned Traits =====

/// A type that can be stored as a key.
#[allow(private_bounds)]
pub trait IntoKey: Sealed { }
pub(crate) trait Sealed: Sized {
    fn into_key(self) -> ByteStr;
}

impl IntoKey for &str { }
impl Sealed for &str {
    #[inline]
    fn into_key(self) -> ByteStr {
        ByteStr::copy_from_str(self)
    }
}

impl IntoKey for String { }
impl Sealed for String {
    #[inline]
    fn into_key(self) -> ByteStr {
        ByteStr::from(self)
    }
}

impl IntoKey for &String { }
impl Sealed for &String {
    #[inline]
    fn into_key(self) -> ByteStr {
        ByteStr::copy_from_str(self)
    }
}

impl IntoKey for Cow<'_, str> { }
impl Sealed for Cow<'_, str> {
    #[inline]
    fn into_key(self) -> ByteStr {
        ByteStr::from(self)
    }
}

impl IntoKey for ByteStr { }
impl Sealed for ByteStr {
    #[inline]
    fn into_key(self) -> ByteStr {
        self
    }
}

impl IntoKey for &ByteStr { }
impl Sealed for &ByteStr {
    #[inline]
    fn into_key(self) -> ByteStr {
        self.clone()
    }
}

/// An [`Istr`] is stored by its folded form.
impl IntoKey for Istr { }
impl Sealed for Istr {
    #[inline]
    fn into_key(self) -> ByteStr {
        self.into_byte_str()
    }
}

impl IntoKey for &Istr { }
impl Sealed for &Istr {
    #[inline]
    fn into_key(self) -> ByteStr {
        self.clone().into_byte_str()
    }
}
