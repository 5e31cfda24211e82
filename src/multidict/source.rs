//! Construction, extend and update arguments.
//!
//! Arguments are resolved into records once, before the target store is touched, so a rejected
//! argument leaves the target unchanged.
use std::{collections::{BTreeMap, HashMap}, marker::PhantomData};

use indexmap::IndexMap;

use crate::common::ByteStr;
use crate::log::debug;
use super::{
    Owner, Proxy,
    error::{Error, Mismatch},
    fold::Fold,
    key::IntoKey,
    record::Record,
};

/// A single positional argument.
///
/// Either the records of another multidict, the pairs of a mapping, or a sequence of pairs.
///
/// ```
/// use multidict::MultiDict;
///
/// let mut md = MultiDict::<String>::new();
/// md.extend(vec![("a", String::from("1"))]).unwrap();
/// md.extend(vec![vec!["b", "2"]]).unwrap();
/// assert!(md.extend(vec![vec!["c"]]).is_err());
/// assert_eq!(md.len(), 2);
/// ```
#[derive(Debug)]
pub struct Source<V, F> {
    repr: Repr<V>,
    _fold: PhantomData<F>,
}

#[derive(Debug)]
enum Repr<V> {
    /// Records of the same family, identities are reused.
    Records(Vec<Record<V>>),
    Mapping(Vec<(ByteStr, V)>),
    Pairs(Vec<Pair<V>>),
}

#[derive(Debug)]
enum Pair<V> {
    Valid(ByteStr, V),
    /// Sequence that is not of length 2.
    Invalid(usize),
}

impl<V, F: Fold> Source<V, F> {
    const fn new(repr: Repr<V>) -> Self {
        Self { repr, _fold: PhantomData }
    }

    /// Create source from mapping items.
    pub fn mapping<K, I>(items: I) -> Self
    where
        K: IntoKey,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::new(Repr::Mapping(
            items.into_iter().map(|(k, v)| (k.into_key(), v)).collect(),
        ))
    }

    /// Create source from a sequence of pairs.
    ///
    /// Pairs can be tuples, or sequences that must contain exactly two elements.
    pub fn pairs<P, I>(pairs: I) -> Self
    where
        P: PairLike<V>,
        I: IntoIterator<Item = P>,
    {
        Self::new(Repr::Pairs(
            pairs
                .into_iter()
                .map(|pair| match pair.into_pair() {
                    Ok((k, v)) => Pair::Valid(k, v),
                    Err(len) => Pair::Invalid(len),
                })
                .collect(),
        ))
    }

    /// Records of a multidict of family `G`.
    ///
    /// Identities are reused when both families match, otherwise keys are folded again.
    pub(crate) fn records<G: Fold>(records: &[Record<V>]) -> Self
    where
        V: Clone,
    {
        if G::CASE_INSENSITIVE == F::CASE_INSENSITIVE {
            Self::new(Repr::Records(records.to_vec()))
        } else {
            Self::new(Repr::Mapping(
                records.iter().map(|e| (e.key.clone(), e.value.clone())).collect(),
            ))
        }
    }

    pub(crate) fn into_records(self, method: &'static str) -> Result<Vec<Record<V>>, Error> {
        match self.repr {
            Repr::Records(records) => Ok(records),
            Repr::Mapping(items) => Ok(items
                .into_iter()
                .map(|(k, v)| Record::new::<F>(k, v))
                .collect()),
            Repr::Pairs(pairs) => pairs
                .into_iter()
                .map(|pair| match pair {
                    Pair::Valid(k, v) => Ok(Record::new::<F>(k, v)),
                    Pair::Invalid(len) => {
                        debug!("{method} rejected sequence of length {len}");
                        Err(Mismatch::NotAPair { method, len }.into())
                    }
                })
                .collect(),
        }
    }
}

// ===== Pair =====

/// A type that can be used as a `(key, value)` pair.
#[allow(private_bounds)]
pub trait PairLike<V>: SealedPair<V> { }
pub(crate) trait SealedPair<V> {
    /// Returns the actual length if it is not a pair.
    fn into_pair(self) -> Result<(ByteStr, V), usize>;
}

impl<K: IntoKey, V> PairLike<V> for (K, V) { }
impl<K: IntoKey, V> SealedPair<V> for (K, V) {
    #[inline]
    fn into_pair(self) -> Result<(ByteStr, V), usize> {
        Ok((self.0.into_key(), self.1))
    }
}

/// Homogeneous sequence, the first element is the key and the second is the value.
impl<S: IntoKey + Into<V>, V> PairLike<V> for Vec<S> { }
impl<S: IntoKey + Into<V>, V> SealedPair<V> for Vec<S> {
    fn into_pair(self) -> Result<(ByteStr, V), usize> {
        let len = self.len();
        let mut iter = self.into_iter();
        match (iter.next(), iter.next(), iter.next()) {
            (Some(key), Some(value), None) => Ok((key.into_key(), value.into())),
            _ => Err(len),
        }
    }
}

// ===== Conversion =====

impl<V, F: Fold, P: PairLike<V>> From<Vec<P>> for Source<V, F> {
    #[inline]
    fn from(value: Vec<P>) -> Self {
        Self::pairs(value)
    }
}

impl<V, F: Fold, P: PairLike<V>, const N: usize> From<[P; N]> for Source<V, F> {
    #[inline]
    fn from(value: [P; N]) -> Self {
        Self::pairs(value)
    }
}

impl<V, F: Fold, K: IntoKey, S> From<HashMap<K, V, S>> for Source<V, F> {
    #[inline]
    fn from(value: HashMap<K, V, S>) -> Self {
        Self::mapping(value)
    }
}

impl<V, F: Fold, K: IntoKey> From<BTreeMap<K, V>> for Source<V, F> {
    #[inline]
    fn from(value: BTreeMap<K, V>) -> Self {
        Self::mapping(value)
    }
}

impl<V, F: Fold, K: IntoKey, S> From<IndexMap<K, V, S>> for Source<V, F> {
    #[inline]
    fn from(value: IndexMap<K, V, S>) -> Self {
        Self::mapping(value)
    }
}

impl<V: Clone, F: Fold, G: Fold> From<&Owner<V, G>> for Source<V, F> {
    #[inline]
    fn from(value: &Owner<V, G>) -> Self {
        Self::records::<G>(value.store.borrow().records())
    }
}

impl<V: Clone, F: Fold, G: Fold> From<&Proxy<V, G>> for Source<V, F> {
    #[inline]
    fn from(value: &Proxy<V, G>) -> Self {
        Self::records::<G>(value.store.borrow().records())
    }
}

// ===== Arguments =====

/// Positional and keyword arguments.
///
/// ```
/// use multidict::{Args, MultiDict};
///
/// let md = MultiDict::from_args(Args::new().arg([("key", 1)]).kwarg("key", 2)).unwrap();
/// assert_eq!(md.getall("key").unwrap(), [1, 2]);
///
/// let err = MultiDict::<i32>::from_args(Args::new().arg([("a", 1)]).arg([("b", 2)]));
/// assert!(err.is_err());
/// ```
#[derive(Debug)]
pub struct Args<V, F> {
    positional: Vec<Source<V, F>>,
    keywords: Vec<(ByteStr, V)>,
}

impl<V, F: Fold> Default for Args<V, F> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V, F: Fold> Args<V, F> {
    /// Create empty arguments.
    #[inline]
    pub const fn new() -> Self {
        Self {
            positional: Vec::new(),
            keywords: Vec::new(),
        }
    }

    /// Add positional argument.
    #[inline]
    pub fn arg<S: Into<Source<V, F>>>(mut self, source: S) -> Self {
        self.positional.push(source.into());
        self
    }

    /// Add keyword argument.
    #[inline]
    pub fn kwarg<K: IntoKey>(mut self, key: K, value: V) -> Self {
        self.keywords.push((key.into_key(), value));
        self
    }

    /// Resolve into records, positional source first then keywords.
    pub(crate) fn into_records(mut self, method: &'static str) -> Result<Vec<Record<V>>, Error> {
        let given = self.positional.len();
        if given > 1 {
            debug!("{method} rejected {given} positional arguments");
            return Err(Mismatch::TooManyArguments { method, given }.into());
        }

        let mut records = match self.positional.pop() {
            Some(source) => source.into_records(method)?,
            None => Vec::with_capacity(self.keywords.len()),
        };
        records.extend(self.keywords.into_iter().map(|(k, v)| Record::new::<F>(k, v)));
        Ok(records)
    }
}

impl<V, F: Fold> From<Source<V, F>> for Args<V, F> {
    #[inline]
    fn from(value: Source<V, F>) -> Self {
        Self {
            positional: vec![value],
            keywords: Vec::new(),
        }
    }
}
