//! Comparer-driven set operators: distinct, union, intersect, except.

use std::collections::HashMap;
use std::hash::Hash;

use lazyseq_core::comparer::{default_eq, EqRef};
use lazyseq_core::Result;

use crate::seq::Seq;
use crate::trace;
use crate::traits::{cursor, Element};

/// Hash set whose equality and hashing come from an [`EqualityComparer`].
///
/// [`EqualityComparer`]: lazyseq_core::comparer::EqualityComparer
pub struct KeySet<K> {
    comparer: EqRef<K>,
    buckets: HashMap<u64, Vec<K>>,
    len: usize,
}

impl<K> KeySet<K> {
    pub fn new(comparer: EqRef<K>) -> Self {
        Self {
            comparer,
            buckets: HashMap::new(),
            len: 0,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        let hash = self.comparer.hash(key);
        self.buckets
            .get(&hash)
            .is_some_and(|bucket| bucket.iter().any(|k| self.comparer.equals(k, key)))
    }

    /// Returns `true` if `key` was not present.
    pub fn insert(&mut self, key: K) -> bool {
        let hash = self.comparer.hash(&key);
        let bucket = self.buckets.entry(hash).or_default();
        if bucket.iter().any(|k| self.comparer.equals(k, &key)) {
            return false;
        }
        bucket.push(key);
        self.len += 1;
        true
    }

    /// Returns `true` if `key` was present.
    pub fn remove(&mut self, key: &K) -> bool {
        let hash = self.comparer.hash(key);
        let Some(bucket) = self.buckets.get_mut(&hash) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|k| self.comparer.equals(k, key)) else {
            return false;
        };
        bucket.swap_remove(pos);
        self.len -= 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Membership set over a whole sequence.
fn collect_set<T: Element>(source: &Seq<T>, comparer: EqRef<T>) -> Result<KeySet<T>> {
    let mut set = KeySet::new(comparer);
    for item in source {
        set.insert(item?);
    }
    trace::buffered("membership_set", set.len());
    Ok(set)
}

impl<T: Element> Seq<T> {
    /// First occurrence of each element, in source order.
    pub fn distinct(&self) -> Seq<T>
    where
        T: Eq + Hash,
    {
        self.distinct_with(default_eq())
    }

    /// `distinct` under `comparer`; `T` needs no `Eq` or `Hash` of its own.
    pub fn distinct_with(&self, comparer: EqRef<T>) -> Seq<T> {
        let source = self.clone();
        Seq::deferred("distinct", move || {
            let mut it = source.iter();
            let mut seen = KeySet::new(comparer.clone());
            cursor(move || {
                while let Some(item) = it.pull()? {
                    if seen.insert(item.clone()) {
                        return Ok(Some(item));
                    }
                }
                Ok(None)
            })
        })
    }

    /// Distinct elements of `self` followed by those of `other` not yet seen.
    pub fn union(&self, other: &Seq<T>) -> Seq<T>
    where
        T: Eq + Hash,
    {
        self.union_with(other, default_eq())
    }

    pub fn union_with(&self, other: &Seq<T>, comparer: EqRef<T>) -> Seq<T> {
        self.concat(other).distinct_with(comparer)
    }

    /// Distinct elements of `self` that also occur in `other`.
    ///
    /// `other` is read completely at the first pull, before `self` is touched.
    pub fn intersect(&self, other: &Seq<T>) -> Seq<T>
    where
        T: Eq + Hash,
    {
        self.intersect_with(other, default_eq())
    }

    pub fn intersect_with(&self, other: &Seq<T>, comparer: EqRef<T>) -> Seq<T> {
        let first = self.clone();
        let second = other.clone();
        Seq::deferred("intersect", move || {
            let mut it = first.iter();
            let second = second.clone();
            let comparer = comparer.clone();
            let mut members: Option<KeySet<T>> = None;
            cursor(move || {
                if members.is_none() {
                    members = Some(collect_set(&second, comparer.clone())?);
                }
                let Some(members) = members.as_mut() else {
                    return Ok(None);
                };
                while let Some(item) = it.pull()? {
                    // Removing on match also de-duplicates the output.
                    if members.remove(&item) {
                        return Ok(Some(item));
                    }
                }
                Ok(None)
            })
        })
    }

    /// Distinct elements of `self` that do not occur in `other`.
    ///
    /// `other` is read completely at the first pull, before `self` is touched.
    pub fn except(&self, other: &Seq<T>) -> Seq<T>
    where
        T: Eq + Hash,
    {
        self.except_with(other, default_eq())
    }

    pub fn except_with(&self, other: &Seq<T>, comparer: EqRef<T>) -> Seq<T> {
        let first = self.clone();
        let second = other.clone();
        Seq::deferred("except", move || {
            let mut it = first.iter();
            let second = second.clone();
            let comparer = comparer.clone();
            let mut excluded: Option<KeySet<T>> = None;
            cursor(move || {
                if excluded.is_none() {
                    excluded = Some(collect_set(&second, comparer.clone())?);
                }
                let Some(excluded) = excluded.as_mut() else {
                    return Ok(None);
                };
                while let Some(item) = it.pull()? {
                    // Inserting yielded items de-duplicates the output.
                    if excluded.insert(item.clone()) {
                        return Ok(Some(item));
                    }
                }
                Ok(None)
            })
        })
    }
}
