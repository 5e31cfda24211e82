//! Mutation version.
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{
    CaseInsensitive, CaseSensitive, Owner, Proxy,
    error::{Error, Mismatch},
};

/// Process wide counter, so that two stores never share a version.
static VERSION: AtomicU64 = AtomicU64::new(0);

#[inline]
pub(crate) fn next() -> u64 {
    VERSION.fetch_add(1, Ordering::Relaxed) + 1
}

/// A type that exposes the mutation version of a multidict store.
///
/// Every mutation of the store draws a new, greater version. An owner and all of its proxies
/// report the same value.
pub trait Versioned {
    /// Returns the current version.
    fn version(&self) -> u64;
}

/// Returns the current version of an owner or proxy.
#[inline]
pub fn getversion<T: Versioned + ?Sized>(md: &T) -> u64 {
    md.version()
}

/// Returns the current version of a type erased owner or proxy.
///
/// # Errors
///
/// Returns [`Mismatch::NotVersioned`] if `md` is not an [`Owner`] or [`Proxy`] of either family
/// holding `V`.
pub fn try_getversion<V: 'static>(md: &dyn Any) -> Result<u64, Error> {
    if let Some(md) = md.downcast_ref::<Owner<V, CaseSensitive>>() {
        return Ok(md.version());
    }
    if let Some(md) = md.downcast_ref::<Owner<V, CaseInsensitive>>() {
        return Ok(md.version());
    }
    if let Some(md) = md.downcast_ref::<Proxy<V, CaseSensitive>>() {
        return Ok(md.version());
    }
    if let Some(md) = md.downcast_ref::<Proxy<V, CaseInsensitive>>() {
        return Ok(md.version());
    }
    Err(Mismatch::NotVersioned.into())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::multidict::MultiDict;

    #[test]
    fn version_increase() {
        let a = next();
        let b = next();
        assert!(b > a);
    }

    #[test]
    fn version_bad_param() {
        let err = try_getversion::<String>(&1u32).unwrap_err();
        assert_eq!(err, Error::TypeMismatch(Mismatch::NotVersioned));

        let md = MultiDict::<String>::new();
        assert_eq!(try_getversion::<String>(&md), Ok(getversion(&md)));

        // wrong value type is a different type altogether
        assert!(try_getversion::<u32>(&md).is_err());
    }
}
