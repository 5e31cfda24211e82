use indexmap::IndexMap;
use std::marker::PhantomData;

use crate::common::ByteStr;
use super::{
    CaseInsensitive, CaseSensitive, Proxy,
    error::Error,
    fold::Fold,
    key::{self, AsKey, IntoKey},
    record::Record,
    source::{Args, Source},
    store::{Shared, Store},
};

/// Read-only surface shared by [`Owner`] and [`Proxy`].
///
/// Values are returned by clone, the store may be shared with views and iterators.
macro_rules! read_surface {
    ($ty:ident, $name:ident) => {
        impl<V, F: $crate::multidict::Fold> $ty<V, F> {
            /// Returns the number of records, duplicates included.
            #[inline]
            pub fn len(&self) -> usize {
                self.store.borrow().len()
            }

            /// Returns `true` if there is no record.
            #[inline]
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Returns `true` if any record matches the key.
            pub fn contains_key<K: $crate::multidict::AsKey>(&self, key: K) -> bool {
                self.store.borrow().contains(&F::lookup(&key))
            }

            /// Returns a view over keys.
            #[inline]
            pub fn keys(&self) -> $crate::multidict::Keys<V, F> {
                $crate::multidict::Keys::new(&self.store)
            }

            /// Returns a view over `(key, value)` pairs.
            #[inline]
            pub fn items(&self) -> $crate::multidict::Items<V, F> {
                $crate::multidict::Items::new(&self.store)
            }

            /// Returns a view over values.
            #[inline]
            pub fn values(&self) -> $crate::multidict::Values<V> {
                $crate::multidict::Values::new(&self.store)
            }
        }

        impl<V: Clone, F: $crate::multidict::Fold> $ty<V, F> {
            /// Returns all values matching the key, in insertion order.
            ///
            /// # Errors
            ///
            /// Returns [`Error::KeyNotFound`][crate::multidict::Error::KeyNotFound] if no record
            /// matches.
            pub fn getall<K: $crate::multidict::AsKey>(
                &self,
                key: K,
            ) -> Result<Vec<V>, $crate::multidict::Error> {
                let values = self.store.borrow().all(&F::lookup(&key)).cloned().collect::<Vec<_>>();
                if values.is_empty() {
                    return Err($crate::multidict::key::not_found(&key));
                }
                Ok(values)
            }

            /// Returns all values matching the key, or `default` if none.
            pub fn getall_or<K: $crate::multidict::AsKey>(&self, key: K, default: Vec<V>) -> Vec<V> {
                self.getall(key).unwrap_or(default)
            }

            /// Returns the first value matching the key.
            ///
            /// # Errors
            ///
            /// Returns [`Error::KeyNotFound`][crate::multidict::Error::KeyNotFound] if no record
            /// matches.
            pub fn getone<K: $crate::multidict::AsKey>(&self, key: K) -> Result<V, $crate::multidict::Error> {
                self.get(&key).ok_or_else(|| $crate::multidict::key::not_found(&key))
            }

            /// Returns the first value matching the key, or `default` if none.
            pub fn getone_or<K: $crate::multidict::AsKey>(&self, key: K, default: V) -> V {
                self.get(key).unwrap_or(default)
            }

            /// Returns the first value matching the key.
            pub fn get<K: $crate::multidict::AsKey>(&self, key: K) -> Option<V> {
                self.store.borrow().first(&F::lookup(&key)).cloned()
            }

            /// Returns a new independent owner holding the current records.
            pub fn copy(&self) -> $crate::multidict::Owner<V, F> {
                $crate::multidict::Owner::from_records(self.store.borrow().records().to_vec())
            }

            /// Group values per key, in order of first appearance.
            ///
            /// Each group is keyed by the first spelling of the key that was inserted.
            pub fn to_dict(&self) -> indexmap::IndexMap<$crate::common::ByteStr, Vec<V>> {
                $crate::multidict::map::group(&self.store.borrow())
            }
        }

        impl<V, F: $crate::multidict::Fold> $crate::multidict::Versioned for $ty<V, F> {
            #[inline]
            fn version(&self) -> u64 {
                self.store.borrow().version()
            }
        }

        impl<V: std::fmt::Debug, F: $crate::multidict::Fold> std::fmt::Debug for $ty<V, F> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "<{}(", F::$name)?;
                for (i, record) in self.store.borrow().records().iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {:?}", record.key.as_str(), record.value)?;
                }
                f.write_str(")>")
            }
        }

        impl<V, F> PartialEq<$crate::multidict::Owner<V, F>> for $ty<V, F>
        where
            V: PartialEq,
            F: $crate::multidict::Fold,
        {
            fn eq(&self, other: &$crate::multidict::Owner<V, F>) -> bool {
                std::rc::Rc::ptr_eq(&self.store, &other.store)
                    || self.store.borrow().records() == other.store.borrow().records()
            }
        }

        impl<V, F> PartialEq<$crate::multidict::Proxy<V, F>> for $ty<V, F>
        where
            V: PartialEq,
            F: $crate::multidict::Fold,
        {
            fn eq(&self, other: &$crate::multidict::Proxy<V, F>) -> bool {
                std::rc::Rc::ptr_eq(&self.store, &other.store)
                    || self.store.borrow().records() == other.store.borrow().records()
            }
        }

        impl<V: Eq, F: $crate::multidict::Fold> Eq for $ty<V, F> { }

        impl<V, F, K, S> PartialEq<std::collections::HashMap<K, V, S>> for $ty<V, F>
        where
            V: PartialEq,
            F: $crate::multidict::Fold,
            K: std::borrow::Borrow<str> + std::hash::Hash + Eq,
            S: std::hash::BuildHasher,
        {
            fn eq(&self, other: &std::collections::HashMap<K, V, S>) -> bool {
                let store = self.store.borrow();
                $crate::multidict::map::eq_mapping(&store, other.len(), |key| other.get(key), other.keys())
            }
        }

        impl<V, F, K> PartialEq<std::collections::BTreeMap<K, V>> for $ty<V, F>
        where
            V: PartialEq,
            F: $crate::multidict::Fold,
            K: std::borrow::Borrow<str> + Ord,
        {
            fn eq(&self, other: &std::collections::BTreeMap<K, V>) -> bool {
                let store = self.store.borrow();
                $crate::multidict::map::eq_mapping(&store, other.len(), |key| other.get(key), other.keys())
            }
        }
    };
}

/// Values grouped by identity, keyed by the first inserted key.
pub(crate) fn group<V: Clone>(store: &Store<V>) -> IndexMap<ByteStr, Vec<V>> {
    let mut groups = IndexMap::<ByteStr, (ByteStr, Vec<V>)>::new();
    for record in store.records() {
        groups
            .entry(record.identity.clone())
            .or_insert_with(|| (record.key.clone(), Vec::new()))
            .1
            .push(record.value.clone());
    }
    groups.into_values().collect()
}

/// Both sides must have the same length, every record must be found in the mapping, and every
/// mapping key must be in the store.
pub(crate) fn eq_mapping<'a, V, K>(
    store: &Store<V>,
    len: usize,
    get: impl Fn(&str) -> Option<&'a V>,
    keys: impl IntoIterator<Item = &'a K>,
) -> bool
where
    V: PartialEq + 'a,
    K: std::borrow::Borrow<str> + 'a,
{
    if store.len() != len {
        return false;
    }
    store.records().iter().all(|record| get(record.key.as_str()) == Some(&record.value))
        && keys.into_iter().all(|key| store.contains_key(<K as std::borrow::Borrow<str>>::borrow(key)))
}

pub(crate) use read_surface;

/// Insertion ordered multi-valued map.
///
/// The family `F` selects how keys are compared, see [`MultiDict`] and [`CIMultiDict`].
///
/// ```
/// use multidict::MultiDict;
///
/// let mut md = MultiDict::new();
/// md.add("a", 1);
/// md.add("a", 2);
/// md.add("b", 3);
/// assert_eq!(md.getall("a").unwrap(), [1, 2]);
/// assert_eq!(md.getone("a").unwrap(), 1);
///
/// md.replace("a", 4);
/// assert_eq!(md.getall("a").unwrap(), [4]);
/// ```
pub struct Owner<V, F> {
    pub(crate) store: Shared<V>,
    _fold: PhantomData<F>,
}

/// Case-sensitive multidict.
pub type MultiDict<V> = Owner<V, CaseSensitive>;

/// Case-insensitive multidict.
///
/// ```
/// use multidict::CIMultiDict;
///
/// let mut md = CIMultiDict::from([("KEY", "v1")]);
/// assert_eq!(md.getone("key").unwrap(), "v1");
/// md.add("Key", "v2");
/// assert_eq!(md.getall("kEy").unwrap(), ["v1", "v2"]);
/// ```
pub type CIMultiDict<V> = Owner<V, CaseInsensitive>;

read_surface!(Owner, OWNER);

impl<V, F: Fold> Default for Owner<V, F> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning an owner copies its records into a new store.
impl<V: Clone, F: Fold> Clone for Owner<V, F> {
    #[inline]
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<V, F: Fold> Owner<V, F> {
    /// Create new empty multidict.
    #[inline]
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    /// Create new empty multidict with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_records(Vec::with_capacity(capacity))
    }

    pub(crate) fn from_records(records: Vec<Record<V>>) -> Self {
        Self {
            store: Store::shared(records),
            _fold: PhantomData,
        }
    }

    /// Create multidict from positional and keyword arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if more than one positional argument is given, or if a
    /// sequence in the source is not a pair.
    pub fn from_args(args: Args<V, F>) -> Result<Self, Error> {
        args.into_records(F::OWNER).map(Self::from_records)
    }

    /// Create multidict from a single source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if a sequence in the source is not a pair.
    pub fn from_source<S: Into<Source<V, F>>>(source: S) -> Result<Self, Error> {
        source.into().into_records(F::OWNER).map(Self::from_records)
    }

    /// Returns a read-only proxy sharing this multidict store.
    #[inline]
    pub fn proxy(&self) -> Proxy<V, F> {
        Proxy::new(self)
    }
}

// ===== Mutation =====

impl<V, F: Fold> Owner<V, F> {
    /// Append a record, even if the key is already present.
    pub fn add<K: IntoKey>(&mut self, key: K, value: V) {
        let record = Record::new::<F>(key.into_key(), value);
        self.store.borrow_mut().push(record);
    }

    /// Set the value for the key.
    ///
    /// The last record matching the key is overwritten in place, and every other matching record
    /// is removed. If there is none, a record is appended.
    ///
    /// ```
    /// use multidict::MultiDict;
    ///
    /// let mut md = MultiDict::from([("key1", 1), ("key2", 2), ("key1", 3), ("key2", 4)]);
    /// md.replace("key1", 5);
    /// assert_eq!(md, MultiDict::from([("key2", 2), ("key1", 5), ("key2", 4)]));
    /// ```
    pub fn replace<K: IntoKey>(&mut self, key: K, value: V) {
        let record = Record::new::<F>(key.into_key(), value);
        self.store.borrow_mut().replace(record);
    }

    /// Remove every record matching the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no record matches.
    pub fn delete<K: AsKey>(&mut self, key: K) -> Result<(), Error> {
        let removed = self.store.borrow_mut().remove_all(&F::lookup(&key));
        if removed.is_empty() {
            return Err(key::not_found(&key));
        }
        Ok(())
    }

    /// Remove the first record matching the key and returns its value.
    ///
    /// Later duplicates are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no record matches.
    pub fn pop<K: AsKey>(&mut self, key: K) -> Result<V, Error> {
        let value = self.store.borrow_mut().remove_first(&F::lookup(&key));
        value.ok_or_else(|| key::not_found(&key))
    }

    /// Alias of [`pop`][Owner::pop].
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no record matches.
    #[inline]
    pub fn popone<K: AsKey>(&mut self, key: K) -> Result<V, Error> {
        self.pop(key)
    }

    /// Remove the first record matching the key, or returns `default`.
    pub fn pop_or<K: AsKey>(&mut self, key: K, default: V) -> V {
        self.store.borrow_mut().remove_first(&F::lookup(&key)).unwrap_or(default)
    }

    /// Remove every record matching the key and returns the values in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if no record matches.
    pub fn popall<K: AsKey>(&mut self, key: K) -> Result<Vec<V>, Error> {
        let values = self.store.borrow_mut().remove_all(&F::lookup(&key));
        if values.is_empty() {
            return Err(key::not_found(&key));
        }
        Ok(values)
    }

    /// Remove every record matching the key, or returns `default`.
    pub fn popall_or<K: AsKey>(&mut self, key: K, default: Vec<V>) -> Vec<V> {
        let values = self.store.borrow_mut().remove_all(&F::lookup(&key));
        if values.is_empty() { default } else { values }
    }

    /// Remove the earliest inserted record and returns it as `(key, value)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if there is no record.
    pub fn popitem(&mut self) -> Result<(ByteStr, V), Error> {
        match self.store.borrow_mut().pop_front() {
            Some(record) => Ok(record.into_pair()),
            None => Err(Error::Empty),
        }
    }

    /// Returns the first value matching the key, appending `(key, default)` if there is none.
    pub fn setdefault<K: IntoKey>(&mut self, key: K, default: V) -> V
    where
        V: Clone,
    {
        let key = key.into_key();
        let identity = F::identity_of(&key);
        let mut store = self.store.borrow_mut();
        if let Some(value) = store.first(&identity) {
            return value.clone();
        }
        store.push(Record { identity, key, value: default.clone() });
        default
    }

    /// Remove all records.
    pub fn clear(&mut self) {
        self.store.borrow_mut().clear();
    }

    /// Append every pair of the source.
    ///
    /// The source is fully resolved first, a rejected source leaves the multidict unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if a sequence in the source is not a pair.
    pub fn extend<S: Into<Source<V, F>>>(&mut self, source: S) -> Result<(), Error> {
        let records = source.into().into_records("extend")?;
        self.store.borrow_mut().push_all(records);
        Ok(())
    }

    /// Append every pair of positional and keyword arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if more than one positional argument is given, or if a
    /// sequence in the source is not a pair.
    pub fn extend_args(&mut self, args: Args<V, F>) -> Result<(), Error> {
        let records = args.into_records("extend")?;
        self.store.borrow_mut().push_all(records);
        Ok(())
    }

    /// Set every pair of the source, in order, as [`replace`][Owner::replace] does.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if a sequence in the source is not a pair.
    pub fn update<S: Into<Source<V, F>>>(&mut self, source: S) -> Result<(), Error> {
        let records = source.into().into_records("update")?;
        self.replace_all(records);
        Ok(())
    }

    /// Set every pair of positional and keyword arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if more than one positional argument is given, or if a
    /// sequence in the source is not a pair.
    pub fn update_args(&mut self, args: Args<V, F>) -> Result<(), Error> {
        let records = args.into_records("update")?;
        self.replace_all(records);
        Ok(())
    }

    fn replace_all(&mut self, records: Vec<Record<V>>) {
        let mut store = self.store.borrow_mut();
        for record in records {
            store.replace(record);
        }
    }
}

// ===== Conversion =====

impl<V, F: Fold, K: IntoKey> FromIterator<(K, V)> for Owner<V, F> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::from_records(
            iter.into_iter()
                .map(|(key, value)| Record::new::<F>(key.into_key(), value))
                .collect(),
        )
    }
}

impl<V, F: Fold, K: IntoKey, const N: usize> From<[(K, V); N]> for Owner<V, F> {
    #[inline]
    fn from(value: [(K, V); N]) -> Self {
        Self::from_iter(value)
    }
}
