use std::{any::Any, marker::PhantomData, rc::Rc};

use crate::log::debug;
use super::{
    CaseInsensitive, CaseSensitive, Owner,
    error::{Error, Mismatch},
    fold::Fold,
    map::read_surface,
    store::Shared,
};

/// Read-only view of a multidict.
///
/// A proxy shares the store of its target, so every mutation of the owner is immediately visible,
/// and both report the same version.
///
/// ```
/// use multidict::{MultiDict, MultiDictProxy, getversion};
///
/// let mut md = MultiDict::new();
/// let proxy = MultiDictProxy::new(&md);
/// md.add("a", 1);
/// assert_eq!(proxy.getone("a").unwrap(), 1);
/// assert_eq!(getversion(&md), getversion(&proxy));
/// ```
pub struct Proxy<V, F> {
    pub(crate) store: Shared<V>,
    _fold: PhantomData<F>,
}

/// Read-only view of a [`MultiDict`][super::MultiDict].
pub type MultiDictProxy<V> = Proxy<V, CaseSensitive>;

/// Read-only view of a [`CIMultiDict`][super::CIMultiDict].
pub type CIMultiDictProxy<V> = Proxy<V, CaseInsensitive>;

read_surface!(Proxy, PROXY);

impl<V, F: Fold> Proxy<V, F> {
    /// Create a proxy of an owner or another proxy of the same family.
    #[inline]
    pub fn new<S: AsStore<V, F>>(md: &S) -> Self {
        Self {
            store: md.shared().clone(),
            _fold: PhantomData,
        }
    }

    /// Create a proxy of a type erased owner or proxy.
    ///
    /// # Errors
    ///
    /// Returns [`Mismatch::WrongFamily`] if `md` is not an [`Owner`] or [`Proxy`] of the same
    /// family holding `V`.
    pub fn try_from_any(md: &dyn Any) -> Result<Self, Error>
    where
        V: 'static,
    {
        if let Some(md) = md.downcast_ref::<Owner<V, F>>() {
            return Ok(Self::new(md));
        }
        if let Some(md) = md.downcast_ref::<Proxy<V, F>>() {
            return Ok(Self::new(md));
        }
        debug!("{} rejected argument of another type", F::PROXY);
        Err(Mismatch::WrongFamily { proxy: F::PROXY, owner: F::OWNER }.into())
    }

    /// Returns `true` if both proxies, or owners, share the same store.
    #[inline]
    pub fn ptr_eq<S: AsStore<V, F>>(&self, other: &S) -> bool {
        Rc::ptr_eq(&self.store, other.shared())
    }
}

/// Cloning a proxy shares the same store.
impl<V, F: Fold> Clone for Proxy<V, F> {
    #[inline]
    fn clone(&self) -> Self {
        Self::new(self)
    }
}

impl<V, F: Fold> From<&Owner<V, F>> for Proxy<V, F> {
    #[inline]
    fn from(value: &Owner<V, F>) -> Self {
        Self::new(value)
    }
}

// ===== Store Access =====

/// An [`Owner`] or a [`Proxy`] of the family `F`.
#[allow(private_bounds)]
pub trait AsStore<V, F>: Sealed<V> { }
pub(crate) trait Sealed<V> {
    fn shared(&self) -> &Shared<V>;
}

impl<V, F: Fold> AsStore<V, F> for Owner<V, F> { }
impl<V, F> Sealed<V> for Owner<V, F> {
    #[inline]
    fn shared(&self) -> &Shared<V> {
        &self.store
    }
}

impl<V, F: Fold> AsStore<V, F> for Proxy<V, F> { }
impl<V, F> Sealed<V> for Proxy<V, F> {
    #[inline]
    fn shared(&self) -> &Shared<V> {
        &self.store
    }
}
