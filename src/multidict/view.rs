//! Keys, items and values views.
//!
//! A view reads the store at access time, it never snapshots it. Set operations materialize into
//! [`FnvHashSet`] at call time. Membership of the other operand is decided by key identity, and a
//! match contributes the key as stored.
use fnv::FnvHashSet;
use std::{
    cmp::Ordering,
    collections::HashSet,
    hash::{BuildHasher, Hash},
    marker::PhantomData,
    ops::{BitAnd, BitOr, BitXor, Sub},
};

use crate::common::ByteStr;
use super::{
    error::Error,
    fold::Fold,
    iter::{ItemsIter, KeysIter, ValuesIter},
    key::{AsKey, IntoKey},
    store::Shared,
};

/// View over multidict keys, as inserted.
pub struct Keys<V, F> {
    store: Shared<V>,
    _fold: PhantomData<F>,
}

/// View over multidict `(key, value)` pairs.
pub struct Items<V, F> {
    store: Shared<V>,
    _fold: PhantomData<F>,
}

/// View over multidict values.
pub struct Values<V> {
    store: Shared<V>,
}

impl<V, F: Fold> Keys<V, F> {
    pub(crate) fn new(store: &Shared<V>) -> Self {
        Self { store: store.clone(), _fold: PhantomData }
    }

    /// Returns the number of keys, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if any key has the same identity.
    pub fn contains<K: AsKey>(&self, key: K) -> bool {
        self.store.borrow().contains(&F::lookup(&key))
    }

    /// Returns a guarded iterator over keys.
    #[inline]
    pub fn iter(&self) -> KeysIter<V> {
        KeysIter::new(&self.store)
    }

    /// Materialize keys into a set.
    pub fn to_set(&self) -> FnvHashSet<ByteStr> {
        self.store.borrow().records().iter().map(|e| e.key.clone()).collect()
    }

    /// Returns `true` if no key of `other` is in this view.
    ///
    /// Stops at the first common key.
    pub fn isdisjoint<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsKey,
    {
        other.into_iter().all(|key| !self.contains(key))
    }
}

impl<V, F: Fold> Items<V, F> {
    pub(crate) fn new(store: &Shared<V>) -> Self {
        Self { store: store.clone(), _fold: PhantomData }
    }

    /// Returns the number of pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if a record has the same key identity and an equal value.
    pub fn contains<K: AsKey>(&self, key: K, value: &V) -> bool
    where
        V: PartialEq,
    {
        let identity = F::lookup(&key);
        self.store
            .borrow()
            .records()
            .iter()
            .any(|e| e.is(&identity) && e.value == *value)
    }

    /// Returns a guarded iterator over pairs.
    #[inline]
    pub fn iter(&self) -> ItemsIter<V> {
        ItemsIter::new(&self.store)
    }

    /// Materialize pairs into a set.
    pub fn to_set(&self) -> FnvHashSet<(ByteStr, V)>
    where
        V: Clone + Eq + Hash,
    {
        self.store
            .borrow()
            .records()
            .iter()
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect()
    }

    /// Returns `true` if no pair of `other` is in this view.
    ///
    /// Stops at the first common pair.
    pub fn isdisjoint<I, K>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsKey,
        V: PartialEq,
    {
        other.into_iter().all(|(key, value)| !self.contains(key, &value))
    }
}

impl<V> Values<V> {
    pub(crate) fn new(store: &Shared<V>) -> Self {
        Self { store: store.clone() }
    }

    /// Returns the number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if any record holds an equal value.
    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.store.borrow().records().iter().any(|e| e.value == *value)
    }

    /// Returns a guarded iterator over values.
    #[inline]
    pub fn iter(&self) -> ValuesIter<V> {
        ValuesIter::new(&self.store)
    }
}

impl<V, F: Fold> IntoIterator for &Keys<V, F> {
    type Item = Result<ByteStr, Error>;
    type IntoIter = KeysIter<V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: Clone, F: Fold> IntoIterator for &Items<V, F> {
    type Item = Result<(ByteStr, V), Error>;
    type IntoIter = ItemsIter<V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: Clone> IntoIterator for &Values<V> {
    type Item = Result<V, Error>;
    type IntoIter = ValuesIter<V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ===== Set Algebra =====

/// A type that can be an element of a materialized view.
#[allow(private_bounds)]
pub trait SetItem<T>: SealedItem<T> { }
trait SealedItem<T> {
    fn into_set_item(self) -> T;
}

impl<K: IntoKey> SetItem<ByteStr> for K { }
impl<K: IntoKey> SealedItem<ByteStr> for K {
    #[inline]
    fn into_set_item(self) -> ByteStr {
        self.into_key()
    }
}

impl<K: IntoKey, V> SetItem<(ByteStr, V)> for (K, V) { }
impl<K: IntoKey, V> SealedItem<(ByteStr, V)> for (K, V) {
    #[inline]
    fn into_set_item(self) -> (ByteStr, V) {
        (self.0.into_key(), self.1)
    }
}

/// Membership by key identity, shared by the keys and items set operations.
trait Algebra {
    type Item: Eq + Hash;

    fn elements(&self) -> FnvHashSet<Self::Item>;

    /// Stored elements matching `item` by key identity, as they are stored.
    fn matching(&self, item: &Self::Item) -> Vec<Self::Item>;
}

impl<V, F: Fold> Algebra for Keys<V, F> {
    type Item = ByteStr;

    fn elements(&self) -> FnvHashSet<ByteStr> {
        self.to_set()
    }

    fn matching(&self, key: &ByteStr) -> Vec<ByteStr> {
        let identity = F::lookup(key);
        self.store
            .borrow()
            .records()
            .iter()
            .filter(|e| e.is(&identity))
            .map(|e| e.key.clone())
            .collect()
    }
}

impl<V: Clone + Eq + Hash, F: Fold> Algebra for Items<V, F> {
    type Item = (ByteStr, V);

    fn elements(&self) -> FnvHashSet<(ByteStr, V)> {
        self.to_set()
    }

    fn matching(&self, (key, value): &(ByteStr, V)) -> Vec<(ByteStr, V)> {
        let identity = F::lookup(key);
        self.store
            .borrow()
            .records()
            .iter()
            .filter(|e| e.is(&identity) && e.value == *value)
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect()
    }
}

fn intersection<A, I>(view: &A, rhs: I) -> FnvHashSet<A::Item>
where
    A: Algebra,
    I: IntoIterator,
    I::Item: SetItem<A::Item>,
{
    rhs.into_iter()
        .flat_map(|e| view.matching(&e.into_set_item()))
        .collect()
}

fn union<A, I>(view: &A, rhs: I) -> FnvHashSet<A::Item>
where
    A: Algebra,
    I: IntoIterator,
    I::Item: SetItem<A::Item>,
{
    let mut set = view.elements();
    for e in rhs {
        let e = e.into_set_item();
        if view.matching(&e).is_empty() {
            set.insert(e);
        }
    }
    set
}

fn difference<A, I>(view: &A, rhs: I) -> FnvHashSet<A::Item>
where
    A: Algebra,
    I: IntoIterator,
    I::Item: SetItem<A::Item>,
{
    let mut set = view.elements();
    for e in rhs {
        for stored in view.matching(&e.into_set_item()) {
            set.remove(&stored);
        }
    }
    set
}

fn symmetric_difference<A, I>(view: &A, rhs: I) -> FnvHashSet<A::Item>
where
    A: Algebra,
    I: IntoIterator,
    I::Item: SetItem<A::Item>,
{
    let mut set = view.elements();
    for e in rhs {
        let e = e.into_set_item();
        let stored = view.matching(&e);
        if stored.is_empty() {
            set.insert(e);
        }
        for stored in stored {
            set.remove(&stored);
        }
    }
    set
}

fn compare<T: Eq + Hash>(lhs: &FnvHashSet<T>, rhs: &FnvHashSet<T>) -> Option<Ordering> {
    match (lhs.is_subset(rhs), rhs.is_subset(lhs)) {
        (true, true) => Some(Ordering::Equal),
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        (false, false) => None,
    }
}

macro_rules! set_ops {
    ($view:ident => $item:ty, [$($bound:tt)*]) => {
        impl<V, F: Fold, I> BitAnd<I> for &$view<V, F>
        where
            I: IntoIterator,
            I::Item: SetItem<$item>,
            $($bound)*
        {
            type Output = FnvHashSet<$item>;

            fn bitand(self, rhs: I) -> Self::Output {
                intersection(self, rhs)
            }
        }

        impl<V, F: Fold, I> BitOr<I> for &$view<V, F>
        where
            I: IntoIterator,
            I::Item: SetItem<$item>,
            $($bound)*
        {
            type Output = FnvHashSet<$item>;

            fn bitor(self, rhs: I) -> Self::Output {
                union(self, rhs)
            }
        }

        impl<V, F: Fold, I> Sub<I> for &$view<V, F>
        where
            I: IntoIterator,
            I::Item: SetItem<$item>,
            $($bound)*
        {
            type Output = FnvHashSet<$item>;

            fn sub(self, rhs: I) -> Self::Output {
                difference(self, rhs)
            }
        }

        impl<V, F: Fold, I> BitXor<I> for &$view<V, F>
        where
            I: IntoIterator,
            I::Item: SetItem<$item>,
            $($bound)*
        {
            type Output = FnvHashSet<$item>;

            fn bitxor(self, rhs: I) -> Self::Output {
                symmetric_difference(self, rhs)
            }
        }
    };
}

set_ops!(Keys => ByteStr, []);
set_ops!(Items => (ByteStr, V), [V: Clone + Eq + Hash,]);

// ===== Comparison =====

fn fold_key<F: Fold>(key: &str) -> ByteStr {
    ByteStr::from(F::fold(key))
}

impl<V, F, T, S> PartialEq<HashSet<T, S>> for Keys<V, F>
where
    F: Fold,
    T: std::borrow::Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &HashSet<T, S>) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

/// Subset ordering by key identity, sets that are not subset of one another are unordered.
impl<V, F, T, S> PartialOrd<HashSet<T, S>> for Keys<V, F>
where
    F: Fold,
    T: std::borrow::Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn partial_cmp(&self, other: &HashSet<T, S>) -> Option<Ordering> {
        let this = self.store.borrow().records().iter().map(|e| e.identity.clone()).collect();
        let other = other
            .iter()
            .map(|e| fold_key::<F>(<T as std::borrow::Borrow<str>>::borrow(e)))
            .collect();
        compare(&this, &other)
    }
}

impl<V, F, T, S> PartialEq<HashSet<(T, V), S>> for Items<V, F>
where
    V: Clone + Eq + Hash,
    F: Fold,
    T: std::borrow::Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &HashSet<(T, V), S>) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

/// Subset ordering by key identity and value, sets that are not subset of one another are
/// unordered.
impl<V, F, T, S> PartialOrd<HashSet<(T, V), S>> for Items<V, F>
where
    V: Clone + Eq + Hash,
    F: Fold,
    T: std::borrow::Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    fn partial_cmp(&self, other: &HashSet<(T, V), S>) -> Option<Ordering> {
        let this = self
            .store
            .borrow()
            .records()
            .iter()
            .map(|e| (e.identity.clone(), e.value.clone()))
            .collect();
        let other = other
            .iter()
            .map(|(k, v)| (fold_key::<F>(<T as std::borrow::Borrow<str>>::borrow(k)), v.clone()))
            .collect();
        compare(&this, &other)
    }
}

// ===== Debug =====

impl<V, F> std::fmt::Debug for Keys<V, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.store.borrow();
        let mut tuple = f.debug_tuple("KeysView");
        for record in store.records() {
            tuple.field(&record.key);
        }
        tuple.finish()
    }
}

impl<V: std::fmt::Debug, F> std::fmt::Debug for Items<V, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ItemsView(")?;
        for (i, record) in self.store.borrow().records().iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}: {:?}", record.key, record.value)?;
        }
        f.write_str(")")
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Values<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.store.borrow();
        let mut tuple = f.debug_tuple("ValuesView");
        for record in store.records() {
            tuple.field(&record.value);
        }
        tuple.finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::multidict::{CIMultiDict, MultiDict};

    fn set<const N: usize>(keys: [&'static str; N]) -> FnvHashSet<ByteStr> {
        keys.into_iter().map(ByteStr::from_static).collect()
    }

    #[test]
    fn view_live() {
        let mut md = MultiDict::from([("a", 1)]);
        let keys = md.keys();
        let values = md.values();
        assert_eq!(keys.len(), 1);

        md.add("b", 2);
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("b"));
        assert!(values.contains(&2));
        assert!(!values.contains(&3));

        md.clear();
        assert!(keys.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn view_contains_identity() {
        let md = CIMultiDict::from([("Content-Type", 1)]);
        assert!(md.keys().contains("content-type"));
        assert!(md.items().contains("CONTENT-TYPE", &1));
        assert!(!md.items().contains("content-type", &2));

        let md = MultiDict::from([("Content-Type", 1)]);
        assert!(!md.keys().contains("content-type"));
    }

    #[test]
    fn view_set_ops() {
        let md = MultiDict::from([("a", 1), ("b", 2), ("a", 3)]);
        let keys = md.keys();

        assert_eq!(&keys & ["a", "c"], set(["a"]));
        assert_eq!(&keys | ["c"], set(["a", "b", "c"]));
        assert_eq!(&keys - ["a"], set(["b"]));
        assert_eq!(&keys ^ ["a", "c"], set(["b", "c"]));

        let items = md.items();
        let both = &items & [("a", 3), ("a", 4)];
        assert_eq!(both.len(), 1);
        assert!(both.contains(&(ByteStr::from_static("a"), 3)));
        assert_eq!((&items - [("a", 1)]).len(), 2);
    }

    #[test]
    fn view_set_ops_case_insensitive() {
        let md = CIMultiDict::from([("Content-Type", 1), ("Accept", 2)]);
        let keys = md.keys();

        assert_eq!(&keys & ["content-type"], set(["Content-Type"]));
        assert_eq!(&keys - ["CONTENT-TYPE"], set(["Accept"]));
        assert_eq!(&keys | ["accept", "host"], set(["Content-Type", "Accept", "host"]));
        assert_eq!(&keys ^ ["accept", "host"], set(["Content-Type", "host"]));
        assert!(!keys.isdisjoint(["content-type"]));
        assert!(!(&keys & ["content-type"]).is_empty());

        let items = md.items();
        let both = &items & [("content-type", 1), ("accept", 3)];
        assert_eq!(both.len(), 1);
        assert!(both.contains(&(ByteStr::from_static("Content-Type"), 1)));
        assert_eq!((&items - [("ACCEPT", 2)]).len(), 1);
        assert_eq!((&items | [("accept", 2)]).len(), 2);
        assert_eq!((&items ^ [("accept", 2), ("accept", 3)]).len(), 2);
    }

    #[test]
    fn view_set_ops_spellings() {
        let md = CIMultiDict::from([("a", 1), ("A", 2)]);
        let keys = md.keys();

        assert_eq!(&keys & ["a"], set(["a", "A"]));
        assert!((&keys - ["a"]).is_empty());
        assert_eq!(&keys ^ ["A", "b"], set(["b"]));
    }

    #[test]
    fn view_isdisjoint() {
        let md = CIMultiDict::from([("a", 1), ("b", 2)]);
        assert!(md.keys().isdisjoint(["c", "d"]));
        assert!(!md.keys().isdisjoint(["c", "B"]));
        assert!(md.items().isdisjoint([("a", 2)]));
        assert!(!md.items().isdisjoint([("A", 1)]));
    }

    #[test]
    fn view_compare() {
        let md = MultiDict::from([("a", 1), ("b", 2)]);
        let keys = md.keys();

        assert!(keys == HashSet::from(["a", "b"]));
        assert!(keys < HashSet::from(["a", "b", "c"]));
        assert!(keys <= HashSet::from(["a", "b"]));
        assert!(keys > HashSet::from(["a"]));
        assert!(keys.partial_cmp(&HashSet::from(["a", "c"])).is_none());

        assert!(md.items() == HashSet::from([("a", 1), ("b", 2)]));
        assert!(md.items() > HashSet::from([("b", 2)]));
    }

    #[test]
    fn view_compare_case_insensitive() {
        let md = CIMultiDict::from([("Content-Type", 1), ("Accept", 2)]);
        let keys = md.keys();

        assert!(keys == HashSet::from(["content-type", "ACCEPT"]));
        assert!(keys > HashSet::from(["content-type"]));
        assert!(keys < HashSet::from(["accept", "content-type", "host"]));
        assert!(md.items() == HashSet::from([("content-type", 1), ("accept", 2)]));
        assert!(md.items().partial_cmp(&HashSet::from([("content-type", 2)])).is_none());

        let md = MultiDict::from([("Content-Type", 1)]);
        assert!(md.keys().partial_cmp(&HashSet::from(["content-type"])).is_none());
    }

    #[test]
    fn view_repr() {
        let md = MultiDict::from([("a", 1), ("b", 2)]);
        assert_eq!(format!("{:?}", md.keys()), "KeysView(\"a\", \"b\")");
        assert_eq!(format!("{:?}", md.items()), "ItemsView(\"a\": 1, \"b\": 2)");
        assert_eq!(format!("{:?}", md.values()), "ValuesView(1, 2)");
    }
}
