use bytes::Bytes;
use std::borrow::{Borrow, Cow};

/// A cheaply cloneable str.
///
/// A [`Bytes`] backed string. Cloning only bumps a reference count, which is what lets a record
/// keep its original key and its identity without copying when both are the same string.
#[derive(Clone, Default)]
pub struct ByteStr {
    bytes: Bytes,
}

impl ByteStr {
    /// Create new empty [`ByteStr`].
    #[inline]
    pub const fn new() -> ByteStr {
        Self { bytes: Bytes::new() }
    }

    /// Converts a [`Bytes`] to a [`ByteStr`].
    ///
    /// # Errors
    ///
    /// Returns error if the bytes is not valid UTF-8.
    pub fn from_utf8(bytes: Bytes) -> Result<Self, std::str::Utf8Error> {
        str::from_utf8(&bytes)?;
        Ok(Self { bytes })
    }

    /// Creates [`ByteStr`] instance from str slice, by copying it.
    #[inline]
    pub fn copy_from_str(string: &str) -> Self {
        Self { bytes: Bytes::copy_from_slice(string.as_bytes()) }
    }

    /// Creates a new [`ByteStr`] from a static str.
    ///
    /// The returned `ByteStr` will point directly to the static str. There is
    /// no allocating or copying.
    #[inline]
    pub const fn from_static(string: &'static str) -> Self {
        Self { bytes: Bytes::from_static(string.as_bytes()) }
    }

    /// Extracts a string slice containing the entire `ByteStr`.
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: every constructor checks or receives valid UTF-8, and `Bytes` is immutable
        unsafe { str::from_utf8_unchecked(&self.bytes) }
    }

    /// Returns `true` if both strings share the same underlying buffer.
    #[inline]
    pub(crate) fn ptr_eq(&self, other: &ByteStr) -> bool {
        self.bytes.as_ptr() == other.bytes.as_ptr() && self.bytes.len() == other.bytes.len()
    }

    /// Consume `ByteStr` into [`String`].
    pub fn into_string(self) -> String {
        // SAFETY: input is a string and immutable
        unsafe { String::from_utf8_unchecked(Vec::from(self.bytes)) }
    }

    /// Converts a `ByteStr` into a [`Bytes`].
    ///
    /// This consumes the `ByteStr`, so we do not need to copy its contents.
    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl AsRef<str> for ByteStr {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for ByteStr {
    #[inline]
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl std::ops::Deref for ByteStr {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl std::fmt::Display for ByteStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_str(), f)
    }
}

impl std::fmt::Debug for ByteStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self.as_str(), f)
    }
}

impl std::hash::Hash for ByteStr {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl PartialEq for ByteStr {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || str::eq(self.as_str(), other.as_str())
    }
}

impl Eq for ByteStr {}

impl PartialOrd for ByteStr {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByteStr {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialEq<str> for ByteStr {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        str::eq(self, other)
    }
}

impl PartialEq<&str> for ByteStr {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        str::eq(self, *other)
    }
}

impl PartialEq<ByteStr> for &str {
    #[inline]
    fn eq(&self, other: &ByteStr) -> bool {
        str::eq(self, other.as_str())
    }
}

impl PartialEq<String> for ByteStr {
    #[inline]
    fn eq(&self, other: &String) -> bool {
        str::eq(self, other.as_str())
    }
}

impl From<ByteStr> for Bytes {
    #[inline]
    fn from(value: ByteStr) -> Self {
        value.into_bytes()
    }
}

impl From<ByteStr> for String {
    #[inline]
    fn from(value: ByteStr) -> Self {
        value.into_string()
    }
}

impl From<&'static str> for ByteStr {
    #[inline]
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<Cow<'_, str>> for ByteStr {
    fn from(value: Cow<'_, str>) -> Self {
        match value {
            Cow::Borrowed(s) => Self::copy_from_str(s),
            Cow::Owned(s) => Self::from(s),
        }
    }
}

impl From<String> for ByteStr {
    #[inline]
    fn from(value: String) -> Self {
        Self { bytes: Bytes::from(value.into_bytes()) }
    }
}
