//! Keyed grouping: `Grouping`, `Lookup`, `to_lookup`, `group_by`, `to_map`.
//!
//! Keys are matched through an [`EqualityComparer`]; groups and keys both keep
//! first-appearance order.
//!
//! [`EqualityComparer`]: lazyseq_core::comparer::EqualityComparer

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use lazyseq_core::comparer::{default_eq, EqRef};
use lazyseq_core::{Result, SeqError};

use crate::seq::Seq;
use crate::trace;
use crate::traits::{cursor, Element};

/// A key with the elements that mapped to it, in arrival order.
pub struct Grouping<K, V> {
    key: K,
    items: Arc<[V]>,
}

impl<K: Clone, V> Clone for Grouping<K, V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            items: Arc::clone(&self.items),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Grouping<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grouping")
            .field("key", &self.key)
            .field("items", &&*self.items)
            .finish()
    }
}

impl<K, V> Grouping<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn items(&self) -> &[V] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn shared(&self) -> Arc<[V]> {
        Arc::clone(&self.items)
    }
}

impl<K, V: Element> Grouping<K, V> {
    /// The group's elements as a sequence sharing this grouping's storage.
    pub fn to_seq(&self) -> Seq<V> {
        Seq::from_shared(self.shared())
    }
}

/// Mutable accumulator behind every keyed operator.
pub(crate) struct GroupTable<K, V> {
    comparer: EqRef<K>,
    index: HashMap<u64, Vec<usize>>,
    keys: Vec<K>,
    items: Vec<Vec<V>>,
    total: usize,
}

impl<K, V> GroupTable<K, V> {
    pub(crate) fn new(comparer: EqRef<K>) -> Self {
        Self {
            comparer,
            index: HashMap::new(),
            keys: Vec::new(),
            items: Vec::new(),
            total: 0,
        }
    }

    pub(crate) fn push(&mut self, key: K, value: V) {
        let hash = self.comparer.hash(&key);
        let slots = self.index.entry(hash).or_default();
        let existing = slots
            .iter()
            .copied()
            .find(|&slot| self.comparer.equals(&self.keys[slot], &key));
        let slot = match existing {
            Some(slot) => slot,
            None => {
                let slot = self.keys.len();
                slots.push(slot);
                self.keys.push(key);
                self.items.push(Vec::new());
                slot
            }
        };
        self.items[slot].push(value);
        self.total += 1;
    }

    pub(crate) fn finish(self, op: &'static str) -> Lookup<K, V> {
        trace::grouped(op, self.total, self.keys.len());
        let groups = self
            .keys
            .into_iter()
            .zip(self.items)
            .map(|(key, items)| Grouping {
                key,
                items: items.into(),
            })
            .collect();
        Lookup {
            comparer: self.comparer,
            index: self.index,
            groups,
        }
    }
}

/// Build a lookup by pulling `source` to completion.
pub(crate) fn build_lookup<T, K, V, FK, FV>(
    op: &'static str,
    source: &Seq<T>,
    comparer: EqRef<K>,
    mut key: FK,
    mut value: FV,
) -> Result<Lookup<K, V>>
where
    T: Element,
    FK: FnMut(&T) -> K,
    FV: FnMut(T) -> V,
{
    let mut table = GroupTable::new(comparer);
    for item in source {
        let item = item?;
        let k = key(&item);
        table.push(k, value(item));
    }
    Ok(table.finish(op))
}

/// Immutable key → group index. Missing keys answer with an empty group.
pub struct Lookup<K, V> {
    comparer: EqRef<K>,
    index: HashMap<u64, Vec<usize>>,
    groups: Vec<Grouping<K, V>>,
}

impl<K: Clone, V> Clone for Lookup<K, V> {
    fn clone(&self) -> Self {
        Self {
            comparer: Arc::clone(&self.comparer),
            index: self.index.clone(),
            groups: self.groups.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Lookup<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.groups.iter()).finish()
    }
}

impl<K, V> Lookup<K, V> {
    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, key: &K) -> Option<&Grouping<K, V>> {
        let hash = self.comparer.hash(key);
        self.index.get(&hash)?.iter().find_map(|&slot| {
            let group = &self.groups[slot];
            self.comparer.equals(&group.key, key).then_some(group)
        })
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.group(key).is_some()
    }

    /// Elements for `key`; empty when the key never appeared.
    pub fn get(&self, key: &K) -> &[V] {
        self.group(key).map(Grouping::items).unwrap_or(&[])
    }

    /// Groups in key first-appearance order.
    pub fn iter(&self) -> std::slice::Iter<'_, Grouping<K, V>> {
        self.groups.iter()
    }
}

impl<K: Element, V: Element> Lookup<K, V> {
    /// The groups as a sequence; enumeration shares the lookup's storage.
    pub fn to_seq(&self) -> Seq<Grouping<K, V>> {
        Seq::from_shared(self.groups.clone().into())
    }
}

impl<'a, K, V> IntoIterator for &'a Lookup<K, V> {
    type Item = &'a Grouping<K, V>;
    type IntoIter = std::slice::Iter<'a, Grouping<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Element> Seq<T> {
    /// Eagerly group elements by `key`.
    pub fn to_lookup<K, F>(&self, key: F) -> Result<Lookup<K, T>>
    where
        K: Eq + Hash + 'static,
        F: FnMut(&T) -> K,
    {
        self.to_lookup_with(key, default_eq())
    }

    pub fn to_lookup_with<K, F>(&self, key: F, comparer: EqRef<K>) -> Result<Lookup<K, T>>
    where
        F: FnMut(&T) -> K,
    {
        build_lookup("to_lookup", self, comparer, key, |item| item)
    }

    /// Eagerly group projected elements by `key`.
    pub fn to_lookup_map<K, V, F, G>(
        &self,
        key: F,
        element: G,
        comparer: EqRef<K>,
    ) -> Result<Lookup<K, V>>
    where
        F: FnMut(&T) -> K,
        G: FnMut(T) -> V,
    {
        build_lookup("to_lookup", self, comparer, key, element)
    }

    /// Deferred grouping: the whole source is grouped at the first pull, then
    /// groups are yielded in key first-appearance order.
    pub fn group_by<K, F>(&self, key: F) -> Seq<Grouping<K, T>>
    where
        K: Element + Eq + Hash,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.group_by_with(key, default_eq())
    }

    pub fn group_by_with<K, F>(&self, key: F, comparer: EqRef<K>) -> Seq<Grouping<K, T>>
    where
        K: Element,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        let source = self.clone();
        let key = Arc::new(key);
        Seq::deferred("group_by", move || {
            let source = source.clone();
            let comparer = comparer.clone();
            let key = Arc::clone(&key);
            let mut groups: Option<std::vec::IntoIter<Grouping<K, T>>> = None;
            cursor(move || {
                if groups.is_none() {
                    let lookup =
                        build_lookup("group_by", &source, comparer.clone(), |t| key(t), |t| t)?;
                    groups = Some(lookup.groups.into_iter());
                }
                Ok(groups.as_mut().and_then(Iterator::next))
            })
        })
    }

    /// Eager keyed map; a repeated key fails with `DuplicateKey`.
    pub fn to_map<K, F>(&self, mut key: F) -> Result<HashMap<K, T>>
    where
        K: Eq + Hash + fmt::Debug,
        F: FnMut(&T) -> K,
    {
        let mut map = HashMap::with_capacity(self.prealloc_hint());
        for item in self {
            let item = item?;
            let k = key(&item);
            if map.contains_key(&k) {
                return Err(SeqError::DuplicateKey(format!("{k:?}")));
            }
            map.insert(k, item);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use lazyseq_core::comparer::{case_insensitive_eq, FnEquality};

    use super::*;

    fn words() -> Seq<String> {
        ["apple", "Avocado", "banana", "apricot", "Blueberry", "cherry"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn initial(s: &String) -> String {
        s[..1].to_string()
    }

    #[test]
    fn lookup_keeps_insertion_order() {
        let lookup = words().to_lookup(initial).unwrap();
        let keys: Vec<&str> = lookup.iter().map(|g| g.key().as_str()).collect();
        assert_eq!(keys, vec!["a", "A", "b", "B", "c"]);
        assert_eq!(lookup.get(&"a".to_string()), ["apple", "apricot"]);
        assert!(lookup.get(&"z".to_string()).is_empty());
        assert!(!lookup.contains_key(&"z".to_string()));
    }

    #[test]
    fn lookup_with_case_insensitive_keys() {
        let lookup = words()
            .to_lookup_with(initial, case_insensitive_eq())
            .unwrap();
        assert_eq!(lookup.len(), 3);
        let group = lookup.group(&"A".to_string()).unwrap();
        // The first key seen names the group.
        assert_eq!(group.key(), "a");
        assert_eq!(group.items(), ["apple", "Avocado", "apricot"]);
    }

    #[test]
    fn lookup_map_projects_elements() {
        let lookup = words()
            .to_lookup_map(|w| w.len(), |w| w.to_uppercase(), default_eq())
            .unwrap();
        assert_eq!(lookup.get(&6), ["BANANA", "CHERRY"]);
    }

    #[test]
    fn group_by_is_deferred() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let groups = Seq::from_vec(vec![1, 2, 3, 4, 5]).group_by(move |v| {
            seen.fetch_add(1, Ordering::SeqCst);
            v % 2
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let out: Vec<(i32, Vec<i32>)> = groups
            .to_vec()
            .unwrap()
            .into_iter()
            .map(|g| (*g.key(), g.items().to_vec()))
            .collect();
        assert_eq!(out, vec![(1, vec![1, 3, 5]), (0, vec![2, 4])]);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn grouping_as_sequence() {
        let lookup = Seq::from_vec(vec![1, 2, 3]).to_lookup(|_| ()).unwrap();
        let group = lookup.group(&()).unwrap();
        assert_eq!(group.to_seq().to_vec().unwrap(), vec![1, 2, 3]);
        assert_eq!(lookup.to_seq().count().unwrap(), 1);
    }

    #[test]
    fn to_map_rejects_duplicates() {
        let map = Seq::from_vec(vec![1, 2, 3]).to_map(|v| v * 10).unwrap();
        assert_eq!(map[&20], 2);
        let err = Seq::from_vec(vec![1, 3]).to_map(|v| v % 2).unwrap_err();
        assert!(matches!(err, SeqError::DuplicateKey(ref k) if k == "1"));
    }

    #[test]
    fn to_map_on_huge_known_count_fails_fast() {
        let err = Seq::repeat(1i32, i32::MAX)
            .unwrap()
            .to_map(|v| *v)
            .unwrap_err();
        assert!(matches!(err, SeqError::DuplicateKey(ref k) if k == "1"));
    }

    #[test]
    fn float_keys_group_through_comparer() {
        let by_bits: EqRef<f64> = Arc::new(FnEquality::new(
            |a: &f64, b: &f64| a.to_bits() == b.to_bits(),
            |v: &f64| v.to_bits(),
        ));
        let readings = Seq::from_vec(vec![(1.5, "a"), (2.0, "b"), (1.5, "c")]);
        let lookup = readings.to_lookup_with(|r| r.0, by_bits.clone()).unwrap();
        assert_eq!(lookup.get(&1.5), [(1.5, "a"), (1.5, "c")]);

        let sizes: Vec<(f64, usize)> = readings
            .group_by_with(|r| r.0, by_bits)
            .select(|g| (*g.key(), g.len()))
            .to_vec()
            .unwrap();
        assert_eq!(sizes, vec![(1.5, 2), (2.0, 1)]);
    }
}
