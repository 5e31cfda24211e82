use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

use super::*;
use crate::common::ByteStr;

fn items<V: Clone, F: Fold>(md: &Owner<V, F>) -> Vec<(String, V)> {
    md.items()
        .iter()
        .map(|e| e.map(|(k, v)| (k.into_string(), v)))
        .collect::<Result<_, _>>()
        .unwrap()
}

fn pairs<V: Clone>(list: &[(&str, V)]) -> Vec<(String, V)> {
    list.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[test]
fn multidict_add() {
    let mut md = MultiDict::new();
    md.add("a", 1);
    md.add("a", 2);
    md.add("b", 3);

    assert_eq!(items(&md), pairs(&[("a", 1), ("a", 2), ("b", 3)]));
    assert_eq!(md.getall("a").unwrap(), [1, 2]);
    assert_eq!(md.getone("a").unwrap(), 1);
    assert_eq!(md.get("b"), Some(3));
    assert_eq!(md.get("c"), None);
    assert_eq!(md.len(), 3);
    assert!(md.contains_key("a"));
    assert!(!md.contains_key("A"));
}

#[test]
fn multidict_replace() {
    let mut md = MultiDict::from([
        ("key1", "val1"),
        ("key2", "val2"),
        ("key1", "val3"),
        ("key2", "val4"),
    ]);
    md.replace("key1", "val");
    assert_eq!(items(&md), pairs(&[("key2", "val2"), ("key1", "val"), ("key2", "val4")]));

    md.replace("key3", "val5");
    assert_eq!(md.getone("key3").unwrap(), "val5");
    assert_eq!(md.len(), 4);
}

#[test]
fn multidict_case_insensitive() {
    let mut md = CIMultiDict::from_args(Args::new().kwarg("KEY", "v1")).unwrap();
    assert_eq!(md.getone("key").unwrap(), "v1");

    md.add("Key", "v2");
    assert_eq!(md.getall("key").unwrap(), ["v1", "v2"]);
    assert!(md.contains_key(Istr::new("kEY")));

    // latest spelling is kept
    md.replace("kEy", "v3");
    assert_eq!(items(&md), pairs(&[("kEy", "v3")]));
}

#[test]
fn multidict_not_found() {
    let mut md = MultiDict::<i32>::new();
    assert_eq!(md.popitem(), Err(Error::Empty));

    let err = md.delete("missing").unwrap_err();
    assert_eq!(err, Error::KeyNotFound(ByteStr::from_static("missing")));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert!(md.getall("a").unwrap_err().is_not_found());
    assert!(md.getone("a").is_err());
    assert!(md.pop("a").is_err());
    assert!(md.popall("a").is_err());

    assert_eq!(md.getall_or("a", vec![7]), [7]);
    assert_eq!(md.getone_or("a", 7), 7);
    assert_eq!(md.pop_or("a", 7), 7);
    assert_eq!(md.popall_or("a", vec![]), Vec::<i32>::new());
}

#[test]
fn multidict_pop() {
    let mut md = CIMultiDict::from([("a", 1), ("b", 2), ("A", 3), ("c", 4)]);

    assert_eq!(md.pop("a"), Ok(1));
    assert_eq!(items(&md), pairs(&[("b", 2), ("A", 3), ("c", 4)]));

    md.add("a", 5);
    assert_eq!(md.popall("A"), Ok(vec![3, 5]));
    assert_eq!(items(&md), pairs(&[("b", 2), ("c", 4)]));

    assert_eq!(md.popitem(), Ok((ByteStr::from_static("b"), 2)));
    assert_eq!(md.popone("C"), Ok(4));
    assert!(md.is_empty());
}

#[test]
fn multidict_delete() {
    let mut md = MultiDict::from([("a", 1), ("b", 2), ("a", 3)]);
    md.delete("a").unwrap();
    assert_eq!(items(&md), pairs(&[("b", 2)]));
}

#[test]
fn multidict_setdefault() {
    let mut md = CIMultiDict::from([("a", 1)]);
    let version = getversion(&md);

    assert_eq!(md.setdefault("A", 2), 1);
    assert_eq!(getversion(&md), version);

    assert_eq!(md.setdefault("b", 3), 3);
    assert_eq!(items(&md), pairs(&[("a", 1), ("b", 3)]));
    assert!(getversion(&md) > version);
}

#[test]
fn multidict_extend() {
    let mut md = MultiDict::<i32>::new();
    md.extend([("a", 1)]).unwrap();
    md.extend(vec![("a", 2)]).unwrap();
    md.extend(BTreeMap::from([("b", 3)])).unwrap();
    md.extend(&MultiDict::from([("c", 4)])).unwrap();
    md.extend_args(Args::new().arg(&CIMultiDict::from([("d", 5)])).kwarg("e", 6)).unwrap();
    assert_eq!(
        items(&md),
        pairs(&[("a", 1), ("a", 2), ("b", 3), ("c", 4), ("d", 5), ("e", 6)])
    );

    let err = md
        .extend_args(Args::new().arg([("x", 0)]).arg([("y", 0)]))
        .unwrap_err();
    assert_eq!(err.to_string(), "extend takes at most 1 positional argument (2 given)");
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(md.len(), 6);
}

#[test]
fn multidict_extend_rejects_atomically() {
    let mut md = MultiDict::<String>::from([("a", String::from("0"))]);
    let version = getversion(&md);

    let err = md.extend(vec![vec!["b", "1"], vec!["c"]]).unwrap_err();
    assert_eq!(err, Error::TypeMismatch(Mismatch::NotAPair { method: "extend", len: 1 }));
    assert_eq!(md.len(), 1);
    assert_eq!(getversion(&md), version);

    let err = MultiDict::<String>::from_source(vec![vec!["a", "b", "c"]]).unwrap_err();
    assert_eq!(err, Error::TypeMismatch(Mismatch::NotAPair { method: "MultiDict", len: 3 }));
}

#[test]
fn multidict_update() {
    let mut md = MultiDict::from([("a", 1), ("b", 2), ("a", 3)]);
    md.update([("a", 4), ("c", 5)]).unwrap();
    assert_eq!(items(&md), pairs(&[("b", 2), ("a", 4), ("c", 5)]));

    // pairs apply one after another
    md.update([("c", 6), ("c", 7)]).unwrap();
    assert_eq!(items(&md), pairs(&[("b", 2), ("a", 4), ("c", 7)]));

    md.update_args(Args::new().arg(HashMap::from([("b", 8)])).kwarg("d", 9)).unwrap();
    assert_eq!(items(&md), pairs(&[("b", 8), ("a", 4), ("c", 7), ("d", 9)]));

    let err = md.update_args(Args::new().arg([("x", 0)]).arg([("y", 0)])).unwrap_err();
    assert_eq!(err.to_string(), "update takes at most 1 positional argument (2 given)");
}

#[test]
fn multidict_update_ci() {
    let mut md = CIMultiDict::from([("Key", 1), ("Other", 2), ("KEY", 3)]);
    md.update(&MultiDict::from([("key", 4)])).unwrap();
    assert_eq!(items(&md), pairs(&[("Other", 2), ("key", 4)]));
}

#[test]
fn multidict_eq() {
    let md = MultiDict::from([("a", 1), ("b", 2)]);
    assert_eq!(md, MultiDict::from([("a", 1), ("b", 2)]));
    assert_ne!(md, MultiDict::from([("b", 2), ("a", 1)]));
    assert_eq!(md, md.proxy());
    assert_eq!(md.copy(), md);

    assert!(md == HashMap::from([("a", 1), ("b", 2)]));
    assert!(md == BTreeMap::from([("a", 1), ("b", 2)]));
    assert!(md != HashMap::from([("a", 1)]));
    assert!(md != HashMap::from([("a", 1), ("b", 2), ("c", 3)]));

    // duplicates can not be represented by a plain mapping
    let dup = MultiDict::from([("a", 1), ("a", 2)]);
    assert!(dup != HashMap::from([("a", 1)]));
    let same = MultiDict::from([("a", 1), ("a", 1)]);
    assert!(same != HashMap::from([("a", 1)]));
    assert!(same != BTreeMap::from([("a", 1)]));

    let ci = CIMultiDict::from([("A", 1)]);
    assert_eq!(ci, CIMultiDict::from([("a", 1)]));
}

#[test]
fn multidict_copy() {
    let mut md = MultiDict::from([("a", 1)]);
    let copy = md.clone();
    md.add("b", 2);
    assert_eq!(copy.len(), 1);
    assert_ne!(getversion(&md), getversion(&copy));
}

#[test]
fn multidict_to_dict() {
    let md = CIMultiDict::from([("a", 1), ("b", 2), ("A", 3)]);
    let dict = md.to_dict();
    assert_eq!(dict.len(), 2);
    assert_eq!(dict.get_index(0), Some((&ByteStr::from_static("a"), &vec![1, 3])));
    assert_eq!(dict["b"], [2]);
}

#[test]
fn multidict_repr() {
    let md = MultiDict::from([("a", 1), ("b", 2)]);
    assert_eq!(format!("{md:?}"), "<MultiDict(\"a\": 1, \"b\": 2)>");
    assert_eq!(format!("{:?}", MultiDict::<i32>::new()), "<MultiDict()>");
}

#[test]
fn multidict_version() {
    let mut md = MultiDict::<i32>::new();
    let proxy = md.proxy();
    let mut last = getversion(&md);
    assert_ne!(last, getversion(&MultiDict::<i32>::new()));

    let mut bumped = |md: &MultiDict<i32>| {
        let version = getversion(md);
        assert_eq!(version, getversion(&proxy));
        let ok = version > last;
        last = version;
        ok
    };

    md.add("a", 1);
    assert!(bumped(&md));
    md.replace("a", 2);
    assert!(bumped(&md));
    md.extend([("b", 3), ("c", 4)]).unwrap();
    assert!(bumped(&md));
    md.update([("b", 5)]).unwrap();
    assert!(bumped(&md));
    md.pop("a").unwrap();
    assert!(bumped(&md));
    md.popitem().unwrap();
    assert!(bumped(&md));
    md.delete("c").unwrap();
    assert!(bumped(&md));
    md.setdefault("d", 6);
    assert!(bumped(&md));
    md.popall("d").unwrap();
    assert!(bumped(&md));

    // failed or no-op mutations
    assert!(md.delete("a").is_err());
    assert!(!bumped(&md));
    md.clear();
    assert!(!bumped(&md));
    md.extend(Vec::<(&str, i32)>::new()).unwrap();
    assert!(!bumped(&md));
}

#[test]
fn multidict_guard_all_mutators() {
    let mutators: [fn(&mut MultiDict<i32>); 5] = [
        |md| md.add("x", 0),
        |md| md.replace("a", 9),
        |md| md.delete("a").unwrap(),
        |md| { md.pop("a").unwrap(); },
        |md| md.clear(),
    ];

    for mutate in mutators {
        let mut md = MultiDict::from([("a", 1), ("b", 2)]);
        let mut keys = md.keys().iter();
        let mut items = md.items().iter();
        let mut values = md.values().iter();
        assert!(keys.next().unwrap().is_ok());

        mutate(&mut md);
        assert_eq!(keys.next(), Some(Err(Error::ChangedDuringIteration)));
        assert_eq!(items.next(), Some(Err(Error::ChangedDuringIteration)));
        assert_eq!(values.next(), Some(Err(Error::ChangedDuringIteration)));
        assert!(keys.next().is_none());
    }
}

// ===== Properties =====

fn arb_key() -> impl Strategy<Value = String> {
    "[a-cA-C]{1,3}"
}

fn arb_pairs() -> impl Strategy<Value = Vec<(String, u8)>> {
    prop::collection::vec((arb_key(), any::<u8>()), 0..24)
}

proptest! {
    /// Items are exactly the sequence of added pairs.
    #[test]
    fn prop_order_preserved(list in arb_pairs()) {
        let mut md = MultiDict::new();
        for (k, v) in &list {
            md.add(k, *v);
        }
        prop_assert_eq!(items(&md), list);
    }

    /// After a replace, one record with that identity remains, where the last one was.
    #[test]
    fn prop_replace_collapse(list in arb_pairs(), key in arb_key(), value in any::<u8>()) {
        let mut md = CIMultiDict::from_iter(list.iter().map(|(k, v)| (k.as_str(), *v)));
        let identity = title_case(&key).into_owned();
        let last = list.iter().rposition(|(k, _)| *title_case(k) == *identity);
        let before = list.iter().filter(|(k, _)| *title_case(k) == *identity).count();

        md.replace(key.as_str(), value);

        let after = items(&md);
        let matching = after
            .iter()
            .enumerate()
            .filter(|(_, (k, _))| *title_case(k) == *identity)
            .collect::<Vec<_>>();
        prop_assert_eq!(matching.len(), 1);
        prop_assert_eq!(matching[0].1.1, value);
        prop_assert_eq!(after.len(), list.len() + 1 - before.max(1));

        if let Some(last) = last {
            // records before the last occurrence shift by the removed duplicates
            let removed_before = list[..last]
                .iter()
                .filter(|(k, _)| *title_case(k) == *identity)
                .count();
            prop_assert_eq!(matching[0].0, last - removed_before);
        } else {
            prop_assert_eq!(matching[0].0, after.len() - 1);
        }
    }

    /// Setting with one spelling is visible with any other spelling of the same identity.
    #[test]
    fn prop_case_insensitive(list in arb_pairs(), key in arb_key(), value in any::<u8>()) {
        let mut md = CIMultiDict::from_iter(list.iter().map(|(k, v)| (k.as_str(), *v)));
        md.replace(key.to_uppercase(), value);
        prop_assert_eq!(md.getone(key.to_lowercase()), Ok(value));
        prop_assert_eq!(md.getall(Istr::new(key.as_str())), Ok(vec![value]));
    }

    /// `popall` removes every matching record and keeps the rest in order.
    #[test]
    fn prop_popall(list in arb_pairs(), key in arb_key()) {
        let mut md = MultiDict::from_iter(list.iter().map(|(k, v)| (k.as_str(), *v)));
        let expected = list.iter().filter(|(k, _)| *k == key).map(|(_, v)| *v).collect::<Vec<_>>();
        let rest = list.iter().filter(|(k, _)| *k != key).cloned().collect::<Vec<_>>();

        prop_assert_eq!(md.popall_or(key.as_str(), vec![]), expected);
        prop_assert_eq!(items(&md), rest);
    }

    /// Without duplicate keys, a multidict equals the mapping of its items.
    #[test]
    fn prop_eq_mapping(map in prop::collection::hash_map(arb_key(), any::<u8>(), 0..12)) {
        let md = MultiDict::from_iter(map.iter().map(|(k, v)| (k.as_str(), *v)));
        prop_assert!(md == map);
    }
}
