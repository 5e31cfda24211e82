//! Insertion Ordered Multidict
//!
//! A multi-valued map where duplicate keys and insertion order are both preserved, with a
//! case-insensitive variant, read-only proxies, and views whose iterators detect mutation.
//!
//! Commonly used to represent HTTP headers and URL query parameters.
//!
//! # Features
//!
//! - `serde`: serialize an owner as a sequence of `(key, value)` pairs. Enabled by default.
//! - `log`: log rejected arguments and iterator invalidation with the [`log`] facade.
//!
//! [`log`]: https://docs.rs/log
#![warn(missing_debug_implementations)]

mod log;

pub mod common;
pub mod multidict;

pub use common::ByteStr;
#[allow(deprecated)]
pub use multidict::UpStr;
pub use multidict::{
    Args, AsKey, CIMultiDict, CIMultiDictProxy, CaseInsensitive, CaseSensitive, Error, ErrorKind,
    Fold, IntoKey, Istr, Mismatch, MultiDict, MultiDictProxy, MultiMapping, MutableMultiMapping,
    Owner, PairLike, Proxy, Source, Versioned, getversion, title_case, try_getversion,
};

const _: () = {
    fn _is_dyn_compat(_: &dyn MultiMapping<ByteStr>) { }
    fn _is_dyn_compat2(_: &dyn MutableMultiMapping<ByteStr>) { }
    fn _is_static(_: &dyn std::any::Any) { }
    fn _owner_is_any(md: &MultiDict<ByteStr>) { _is_static(md) }
};
