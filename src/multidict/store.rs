use std::{cell::RefCell, rc::Rc};

use crate::log::trace;
use super::{record::Record, version};

/// Store shared by an owner, its proxies, views and iterators.
pub(crate) type Shared<V> = Rc<RefCell<Store<V>>>;

/// Ordered records and the mutation version.
///
/// Every operation is a linear scan. Lookups take the identity, already folded by the caller.
#[derive(Debug)]
pub(crate) struct Store<V> {
    records: Vec<Record<V>>,
    version: u64,
}

impl<V> Store<V> {
    pub(crate) fn shared(records: Vec<Record<V>>) -> Shared<V> {
        Rc::new(RefCell::new(Self {
            records,
            version: version::next(),
        }))
    }

    #[inline]
    pub(crate) const fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub(crate) fn records(&self) -> &[Record<V>] {
        &self.records
    }

    #[inline]
    fn touch(&mut self) {
        self.version = version::next();
    }
}

// ===== Lookup =====

impl<V> Store<V> {
    pub(crate) fn contains(&self, identity: &str) -> bool {
        self.records.iter().any(|record| record.is(identity))
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.records.iter().any(|record| record.key.as_str() == key)
    }

    pub(crate) fn first(&self, identity: &str) -> Option<&V> {
        self.records
            .iter()
            .find(|record| record.is(identity))
            .map(|record| &record.value)
    }

    pub(crate) fn all<'a>(&'a self, identity: &'a str) -> impl Iterator<Item = &'a V> + 'a {
        self.records
            .iter()
            .filter(move |record| record.is(identity))
            .map(|record| &record.value)
    }
}

// ===== Mutation =====

impl<V> Store<V> {
    /// Append record unconditionally.
    pub(crate) fn push(&mut self, record: Record<V>) {
        self.records.push(record);
        self.touch();
    }

    /// Replace the last record with the same identity in place, removing every other record with
    /// that identity. Append if there is none.
    pub(crate) fn replace(&mut self, record: Record<V>) {
        let Some(last) = self.records.iter().rposition(|e| e.identity == record.identity) else {
            self.push(record);
            return;
        };

        let identity = record.identity.clone();
        self.records[last] = record;

        let mut index = 0;
        self.records.retain(|e| {
            let keep = index == last || e.identity != identity;
            index += 1;
            keep
        });

        self.touch();
    }

    /// Remove the first record with the given identity.
    pub(crate) fn remove_first(&mut self, identity: &str) -> Option<V> {
        let index = self.records.iter().position(|record| record.is(identity))?;
        let record = self.records.remove(index);
        self.touch();
        Some(record.value)
    }

    /// Remove all records with the given identity, returning the values in order.
    pub(crate) fn remove_all(&mut self, identity: &str) -> Vec<V> {
        if !self.contains(identity) {
            return Vec::new();
        }

        let (removed, kept) = std::mem::take(&mut self.records)
            .into_iter()
            .partition::<Vec<_>, _>(|record| record.is(identity));
        self.records = kept;
        self.touch();

        removed.into_iter().map(|record| record.value).collect()
    }

    /// Remove the earliest inserted record.
    pub(crate) fn pop_front(&mut self) -> Option<Record<V>> {
        if self.records.is_empty() {
            return None;
        }
        let record = self.records.remove(0);
        self.touch();
        Some(record)
    }

    /// Remove all records, returns `false` if there was nothing to remove.
    pub(crate) fn clear(&mut self) -> bool {
        if self.records.is_empty() {
            return false;
        }
        trace!("clearing {} records", self.records.len());
        self.records.clear();
        self.touch();
        true
    }

    /// Append all records as one mutation.
    pub(crate) fn push_all(&mut self, records: Vec<Record<V>>) {
        if records.is_empty() {
            return;
        }
        self.records.extend(records);
        self.touch();
    }
}
