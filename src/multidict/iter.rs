//! Guarded iterators.
//!
//! An iterator keeps the store version it was created with. A step that observes another version
//! yields [`Error::ChangedDuringIteration`] once, then the iterator is exhausted.
use std::iter::FusedIterator;

use crate::common::ByteStr;
use crate::log::warning;
use super::{
    error::Error,
    record::Record,
    store::Shared,
};

struct Cursor<V> {
    store: Shared<V>,
    index: usize,
    version: u64,
    done: bool,
}

impl<V> Cursor<V> {
    fn new(store: &Shared<V>) -> Self {
        let version = store.borrow().version();
        Self {
            store: store.clone(),
            index: 0,
            version,
            done: false,
        }
    }

    fn step<T>(&mut self, project: impl FnOnce(&Record<V>) -> T) -> Option<Result<T, Error>> {
        if self.done {
            return None;
        }

        let store = self.store.borrow();

        if store.version() != self.version {
            warning!("multidict changed during iteration, expected version {}, found {}", self.version, store.version());
            self.done = true;
            return Some(Err(Error::ChangedDuringIteration));
        }

        match store.records().get(self.index) {
            Some(record) => {
                self.index += 1;
                Some(Ok(project(record)))
            }
            None => {
                self.done = true;
                None
            }
        }
    }

    fn remaining(&self) -> usize {
        if self.done {
            0
        } else {
            self.store.borrow().len().saturating_sub(self.index)
        }
    }
}

impl<V> std::fmt::Debug for Cursor<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index)
            .field("version", &self.version)
            .field("done", &self.done)
            .finish()
    }
}

macro_rules! guarded {
    (
        $(#[$meta:meta])*
        $name:ident<$v:ident $(: $bound:ident)?> => $item:ty, |$record:ident| $project:expr
    ) => {
        $(#[$meta])*
        pub struct $name<$v> {
            cursor: Cursor<$v>,
        }

        impl<$v> std::fmt::Debug for $name<$v> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.cursor).finish()
            }
        }

        impl<$v> $name<$v> {
            pub(crate) fn new(store: &Shared<$v>) -> Self {
                Self { cursor: Cursor::new(store) }
            }
        }

        impl<$v $(: $bound)?> Iterator for $name<$v> {
            type Item = Result<$item, Error>;

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.cursor.step(|$record| $project)
            }

            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                // a mutation may yield one extra error item
                (0, Some(self.cursor.remaining() + 1))
            }
        }

        impl<$v $(: $bound)?> FusedIterator for $name<$v> { }
    };
}

guarded! {
    /// Iterator over keys, as inserted.
    KeysIter<V> => ByteStr, |record| record.key.clone()
}

guarded! {
    /// Iterator over `(key, value)` pairs.
    ItemsIter<V: Clone> => (ByteStr, V), |record| (record.key.clone(), record.value.clone())
}

guarded! {
    /// Iterator over values.
    ValuesIter<V: Clone> => V, |record| record.value.clone()
}
