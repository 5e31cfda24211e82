//! Insertion ordered multi-valued map.
//!
//! Records are kept in insertion order, and a key may appear more than once. Each record stores
//! the key identity used for lookup, the key as inserted, and the value.
//!
//! - [`MultiDict`] compares keys as is.
//! - [`CIMultiDict`] compares keys by their title-cased form, see [`title_case`].
//! - [`MultiDictProxy`] and [`CIMultiDictProxy`] are read-only views sharing the owner store.
//!
//! Views and iterators never snapshot the store. An iterator observing a mutation of the store
//! returns [`Error::ChangedDuringIteration`].
//!
//! ```
//! use multidict::{CIMultiDict, Error};
//!
//! let mut md = CIMultiDict::new();
//! md.add("Accept", "text/html");
//! md.add("accept", "text/plain");
//!
//! let mut iter = md.values().iter();
//! assert_eq!(iter.next(), Some(Ok("text/html")));
//!
//! md.replace("ACCEPT", "*/*");
//! assert_eq!(iter.next(), Some(Err(Error::ChangedDuringIteration)));
//! assert_eq!(md.getall("accept").unwrap(), ["*/*"]);
//! ```
mod fold;
mod istr;
mod key;
mod record;
mod store;
mod version;
mod source;
mod map;
mod proxy;
mod view;
mod iter;
mod traits;
mod error;

#[cfg(feature = "serde")]
mod serde;

pub use fold::{Fold, CaseSensitive, CaseInsensitive, title_case};
#[allow(deprecated)]
pub use istr::{Istr, IntoIstr, UpStr};
pub use key::{AsKey, IntoKey};
pub use version::{Versioned, getversion, try_getversion};
pub use source::{Source, Args, PairLike};
pub use map::{Owner, MultiDict, CIMultiDict};
pub use proxy::{Proxy, MultiDictProxy, CIMultiDictProxy, AsStore};
pub use view::{Keys, Items, Values, SetItem};
pub use iter::{KeysIter, ItemsIter, ValuesIter};
pub use traits::{MultiMapping, MutableMultiMapping};
pub use error::{Error, ErrorKind, Mismatch};

#[cfg(test)]
mod test;
