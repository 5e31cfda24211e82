use bytes::Bytes;
use std::borrow::{Borrow, Cow};

use crate::common::ByteStr;
use super::fold::title_case;

/// Case-insensitive string.
///
/// The string is folded with [`title_case`] at construction time, equality and hashing use the
/// folded form. Constructing from another `Istr` reuses it as is.
///
/// ```
/// use multidict::Istr;
///
/// let name = Istr::new("content-type");
/// assert_eq!(name.as_str(), "Content-Type");
/// assert_eq!(name, Istr::new("CONTENT-TYPE"));
/// assert_eq!(name, "cOnTeNt-TyPe");
/// ```
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Istr {
    /// is title-cased
    folded: ByteStr,
}

/// Former name of [`Istr`].
#[deprecated = "use `Istr`"]
pub type UpStr = Istr;

impl Istr {
    /// Create new [`Istr`].
    #[inline]
    pub fn new<S: IntoIstr>(value: S) -> Istr {
        value.into_istr()
    }

    /// Decode [`Istr`] from UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes is not valid UTF-8.
    pub fn from_utf8(bytes: Bytes) -> Result<Istr, std::str::Utf8Error> {
        ByteStr::from_utf8(bytes).map(Istr::from_byte_str)
    }

    fn from_byte_str(value: ByteStr) -> Istr {
        match title_case(value.as_str()) {
            Cow::Borrowed(_) => Istr { folded: value },
            Cow::Owned(folded) => Istr { folded: ByteStr::from(folded) },
        }
    }

    /// Returns the folded string.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.folded.as_str()
    }

    /// Title-casing an `Istr` is a no-op.
    #[inline]
    pub fn title(&self) -> &Istr {
        self
    }

    /// Consume `Istr` into its folded [`ByteStr`].
    #[inline]
    pub fn into_byte_str(self) -> ByteStr {
        self.folded
    }
}

// ===== Conversion =====

/// A type that can be converted into [`Istr`].
#[allow(private_bounds)]
pub trait IntoIstr: Sealed { }
trait Sealed: Sized {
    fn into_istr(self) -> Istr;
}

impl IntoIstr for Istr { }
impl Sealed for Istr {
    #[inline]
    fn into_istr(self) -> Istr {
        self
    }
}

impl IntoIstr for &Istr { }
impl Sealed for &Istr {
    #[inline]
    fn into_istr(self) -> Istr {
        self.clone()
    }
}

impl IntoIstr for &str { }
impl Sealed for &str {
    #[inline]
    fn into_istr(self) -> Istr {
        match title_case(self) {
            Cow::Borrowed(s) => Istr { folded: ByteStr::copy_from_str(s) },
            Cow::Owned(s) => Istr { folded: ByteStr::from(s) },
        }
    }
}

impl IntoIstr for String { }
impl Sealed for String {
    #[inline]
    fn into_istr(self) -> Istr {
        Istr::from_byte_str(ByteStr::from(self))
    }
}

impl IntoIstr for ByteStr { }
impl Sealed for ByteStr {
    #[inline]
    fn into_istr(self) -> Istr {
        Istr::from_byte_str(self)
    }
}

impl From<&str> for Istr {
    #[inline]
    fn from(value: &str) -> Self {
        Istr::new(value)
    }
}

impl From<String> for Istr {
    #[inline]
    fn from(value: String) -> Self {
        Istr::new(value)
    }
}

impl From<Istr> for ByteStr {
    #[inline]
    fn from(value: Istr) -> Self {
        value.folded
    }
}

impl From<Istr> for String {
    #[inline]
    fn from(value: Istr) -> Self {
        value.folded.into_string()
    }
}

impl std::str::FromStr for Istr {
    type Err = std::convert::Infallible;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Istr::new(s))
    }
}

// ===== Traits =====

impl std::ops::Deref for Istr {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for Istr {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Lookups by `&str` in a map of `Istr` must use the folded form.
impl Borrow<str> for Istr {
    #[inline]
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for Istr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_str(), f)
    }
}

impl std::fmt::Debug for Istr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Istr").field(&self.as_str()).finish()
    }
}

impl PartialEq<str> for Istr {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        *self.as_str() == *title_case(other)
    }
}

impl PartialEq<&str> for Istr {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        *self.as_str() == *title_case(other)
    }
}

impl PartialEq<String> for Istr {
    #[inline]
    fn eq(&self, other: &String) -> bool {
        *self.as_str() == *title_case(other)
    }
}
