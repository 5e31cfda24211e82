//! Serialization as an ordered sequence of `(key, value)` pairs.
//!
//! Identities are not serialized, deserializing folds the keys again. A proxy refuses to be
//! serialized.
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{SeqAccess, Visitor},
    ser::SerializeSeq,
};
use std::{fmt, marker::PhantomData};

use super::{
    error::Mismatch,
    fold::Fold,
    map::Owner,
    proxy::Proxy,
    record::Record,
};

impl<V: Serialize, F: Fold> Serialize for Owner<V, F> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let store = self.store.borrow();
        let mut seq = serializer.serialize_seq(Some(store.len()))?;
        for record in store.records() {
            seq.serialize_element(&(record.key.as_str(), &record.value))?;
        }
        seq.end()
    }
}

impl<V, F: Fold> Serialize for Proxy<V, F> {
    fn serialize<S>(&self, _: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Err(serde::ser::Error::custom(Mismatch::Serialize { name: F::PROXY }))
    }
}

impl<'de, V: Deserialize<'de>, F: Fold> Deserialize<'de> for Owner<V, F> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(PairsVisitor(PhantomData))
    }
}

struct PairsVisitor<V, F>(PhantomData<(V, F)>);

impl<'de, V: Deserialize<'de>, F: Fold> Visitor<'de> for PairsVisitor<V, F> {
    type Value = Owner<V, F>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a sequence of (key, value) pairs for {}", F::OWNER)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut records = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(1024));
        while let Some((key, value)) = seq.next_element::<(String, V)>()? {
            records.push(Record::new::<F>(key.into(), value));
        }
        Ok(Owner::from_records(records))
    }
}
