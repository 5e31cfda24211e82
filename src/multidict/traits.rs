//! Multi-mapping abstractions.
//!
//! Allows code to be generic over owners and proxies of either family.
use crate::common::ByteStr;
use super::{
    error::Error,
    fold::Fold,
    map::Owner,
    proxy::Proxy,
};

/// A read-only mapping from a key to one or more values.
pub trait MultiMapping<V> {
    /// Returns all values for the key, in insertion order.
    fn getall(&self, key: &str) -> Result<Vec<V>, Error>;

    /// Returns the first value for the key.
    fn getone(&self, key: &str) -> Result<V, Error>;

    /// Returns `true` if any record has the key identity.
    fn contains(&self, key: &str) -> bool;
}

/// A [`MultiMapping`] that can be mutated.
pub trait MutableMultiMapping<V>: MultiMapping<V> {
    /// Append a value for the key.
    fn add(&mut self, key: &str, value: V);

    /// Append every pair.
    fn extend(&mut self, pairs: Vec<(ByteStr, V)>) -> Result<(), Error>;

    /// Remove the first value for the key.
    fn popone(&mut self, key: &str) -> Result<V, Error>;

    /// Remove all values for the key.
    fn popall(&mut self, key: &str) -> Result<Vec<V>, Error>;
}

impl<V: Clone, F: Fold> MultiMapping<V> for Owner<V, F> {
    #[inline]
    fn getall(&self, key: &str) -> Result<Vec<V>, Error> {
        Owner::getall(self, key)
    }

    #[inline]
    fn getone(&self, key: &str) -> Result<V, Error> {
        Owner::getone(self, key)
    }

    #[inline]
    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl<V: Clone, F: Fold> MultiMapping<V> for Proxy<V, F> {
    #[inline]
    fn getall(&self, key: &str) -> Result<Vec<V>, Error> {
        Proxy::getall(self, key)
    }

    #[inline]
    fn getone(&self, key: &str) -> Result<V, Error> {
        Proxy::getone(self, key)
    }

    #[inline]
    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl<V: Clone, F: Fold> MutableMultiMapping<V> for Owner<V, F> {
    #[inline]
    fn add(&mut self, key: &str, value: V) {
        Owner::add(self, key, value);
    }

    #[inline]
    fn extend(&mut self, pairs: Vec<(ByteStr, V)>) -> Result<(), Error> {
        Owner::extend(self, pairs)
    }

    #[inline]
    fn popone(&mut self, key: &str) -> Result<V, Error> {
        Owner::popone(self, key)
    }

    #[inline]
    fn popall(&mut self, key: &str) -> Result<Vec<V>, Error> {
        Owner::popall(self, key)
    }
}
