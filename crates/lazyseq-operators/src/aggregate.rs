//! Eager reducers and quantifiers.
//!
//! Everything here consumes the sequence immediately. Quantifiers stop at the
//! first element that decides the answer; counting trusts `known_count` when
//! the pipeline advertises one.

use std::hash::Hash;

use lazyseq_core::comparer::{default_eq, EqRef};
use lazyseq_core::counter::Tally;
use lazyseq_core::{Result, SeqError};

use crate::seq::Seq;
use crate::traits::Element;

const NO_ELEMENTS: &str = "sequence contains no elements";

impl<T: Element> Seq<T> {
    /// Unseeded left fold; an empty sequence is an invalid operation.
    pub fn aggregate<F>(&self, mut f: F) -> Result<T>
    where
        F: FnMut(T, T) -> T,
    {
        let mut it = self.iter();
        let mut acc = it.pull()?.ok_or_else(|| SeqError::invalid_op(NO_ELEMENTS))?;
        while let Some(item) = it.pull()? {
            acc = f(acc, item);
        }
        Ok(acc)
    }

    /// Seeded left fold; an empty sequence returns `seed`.
    pub fn fold<A, F>(&self, seed: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, T) -> A,
    {
        let mut acc = seed;
        for item in self {
            acc = f(acc, item?);
        }
        Ok(acc)
    }

    /// Seeded fold followed by a final projection of the accumulator.
    pub fn fold_map<A, R, F, G>(&self, seed: A, f: F, result: G) -> Result<R>
    where
        F: FnMut(A, T) -> A,
        G: FnOnce(A) -> R,
    {
        self.fold(seed, f).map(result)
    }

    /// Element count as `i32`; `Overflow` past `i32::MAX`.
    pub fn count(&self) -> Result<i32> {
        let n = self.tally(Tally::i32(), |_| true)?;
        i32::try_from(n).map_err(|_| SeqError::overflow("element count exceeds i32::MAX"))
    }

    pub fn count_where<F>(&self, predicate: F) -> Result<i32>
    where
        F: FnMut(&T) -> bool,
    {
        let n = self.tally_where(Tally::i32(), predicate)?;
        i32::try_from(n).map_err(|_| SeqError::overflow("element count exceeds i32::MAX"))
    }

    /// Element count as `i64`; `Overflow` past `i64::MAX`.
    pub fn long_count(&self) -> Result<i64> {
        let n = self.tally(Tally::i64(), |_| true)?;
        i64::try_from(n).map_err(|_| SeqError::overflow("element count exceeds i64::MAX"))
    }

    pub fn long_count_where<F>(&self, predicate: F) -> Result<i64>
    where
        F: FnMut(&T) -> bool,
    {
        let n = self.tally_where(Tally::i64(), predicate)?;
        i64::try_from(n).map_err(|_| SeqError::overflow("element count exceeds i64::MAX"))
    }

    fn tally<F>(&self, tally: Tally, predicate: F) -> Result<u64>
    where
        F: FnMut(&T) -> bool,
    {
        if let Some(known) = self.known_count() {
            return tally.check_known(known);
        }
        self.tally_where(tally, predicate)
    }

    fn tally_where<F>(&self, mut tally: Tally, mut predicate: F) -> Result<u64>
    where
        F: FnMut(&T) -> bool,
    {
        for item in self {
            if predicate(&item?) {
                tally.bump()?;
            }
        }
        Ok(tally.get())
    }

    /// `true` if the sequence yields at least one element.
    pub fn any(&self) -> Result<bool> {
        if let Some(known) = self.known_count() {
            return Ok(known > 0);
        }
        Ok(self.iter().pull()?.is_some())
    }

    pub fn any_where<F>(&self, mut predicate: F) -> Result<bool>
    where
        F: FnMut(&T) -> bool,
    {
        for item in self {
            if predicate(&item?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// `true` for an empty sequence.
    pub fn all<F>(&self, mut predicate: F) -> Result<bool>
    where
        F: FnMut(&T) -> bool,
    {
        for item in self {
            if !predicate(&item?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn contains(&self, value: &T) -> Result<bool>
    where
        T: Eq + Hash,
    {
        self.contains_with(value, default_eq())
    }

    pub fn contains_with(&self, value: &T, comparer: EqRef<T>) -> Result<bool> {
        self.any_where(|item| comparer.equals(item, value))
    }

    /// Checked `i32` sum of projected values.
    pub fn sum_i32<F>(&self, mut f: F) -> Result<i32>
    where
        F: FnMut(&T) -> i32,
    {
        let mut sum: i32 = 0;
        for item in self {
            sum = sum
                .checked_add(f(&item?))
                .ok_or_else(|| SeqError::overflow("sum exceeds the i32 range"))?;
        }
        Ok(sum)
    }

    /// Checked `i64` sum of projected values.
    pub fn sum_i64<F>(&self, mut f: F) -> Result<i64>
    where
        F: FnMut(&T) -> i64,
    {
        let mut sum: i64 = 0;
        for item in self {
            sum = sum
                .checked_add(f(&item?))
                .ok_or_else(|| SeqError::overflow("sum exceeds the i64 range"))?;
        }
        Ok(sum)
    }

    pub fn sum_f64<F>(&self, mut f: F) -> Result<f64>
    where
        F: FnMut(&T) -> f64,
    {
        self.fold(0.0, |sum, item| sum + f(&item))
    }

    /// Mean of projected values; an empty sequence is an invalid operation.
    pub fn average_f64<F>(&self, mut f: F) -> Result<f64>
    where
        F: FnMut(&T) -> f64,
    {
        let (sum, n) = self.fold((0.0, 0u64), |(sum, n), item| (sum + f(&item), n + 1))?;
        if n == 0 {
            return Err(SeqError::invalid_op(NO_ELEMENTS));
        }
        Ok(sum / n as f64)
    }

    /// Smallest element; the first one wins among equals.
    pub fn min(&self) -> Result<T>
    where
        T: Ord,
    {
        self.aggregate(|best, item| if item < best { item } else { best })
    }

    /// Largest element; the first one wins among equals.
    pub fn max(&self) -> Result<T>
    where
        T: Ord,
    {
        self.aggregate(|best, item| if item > best { item } else { best })
    }

    pub fn min_by_key<K, F>(&self, key: F) -> Result<T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.extreme_by_key(key, |candidate, best| candidate < best)
    }

    pub fn max_by_key<K, F>(&self, key: F) -> Result<T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.extreme_by_key(key, |candidate, best| candidate > best)
    }

    fn extreme_by_key<K, F, B>(&self, mut key: F, beats: B) -> Result<T>
    where
        F: FnMut(&T) -> K,
        B: Fn(&K, &K) -> bool,
    {
        let mut it = self.iter();
        let first = it.pull()?.ok_or_else(|| SeqError::invalid_op(NO_ELEMENTS))?;
        let mut best_key = key(&first);
        let mut best = first;
        while let Some(item) = it.pull()? {
            let k = key(&item);
            if beats(&k, &best_key) {
                best_key = k;
                best = item;
            }
        }
        Ok(best)
    }

    /// Same length and pairwise-equal elements, in order.
    pub fn sequence_equal(&self, other: &Seq<T>) -> Result<bool>
    where
        T: Eq + Hash,
    {
        self.sequence_equal_with(other, default_eq())
    }

    pub fn sequence_equal_with(&self, other: &Seq<T>, comparer: EqRef<T>) -> Result<bool> {
        if let (Some(a), Some(b)) = (self.known_count(), other.known_count()) {
            if a != b {
                return Ok(false);
            }
        }
        let mut left = self.iter();
        let mut right = other.iter();
        loop {
            match (left.pull()?, right.pull()?) {
                (Some(a), Some(b)) if comparer.equals(&a, &b) => continue,
                (None, None) => return Ok(true),
                _ => return Ok(false),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lazyseq_core::comparer::{case_insensitive_eq, FnEquality};

    use super::*;

    #[test]
    fn aggregate_requires_an_element() {
        let err = Seq::<i32>::empty().aggregate(|a, b| a + b).unwrap_err();
        assert!(err.is_invalid_operation());
        assert_eq!(Seq::from_vec(vec![1, 2, 3]).aggregate(|a, b| a * 10 + b).unwrap(), 123);
    }

    #[test]
    fn seeded_folds() {
        let empty = Seq::<i32>::empty();
        assert_eq!(empty.fold(5, |a, b| a + b).unwrap(), 5);
        let words = Seq::from_vec(vec!["a", "b", "c"]);
        let joined = words
            .fold_map(String::new(), |acc, w| acc + w, |acc| acc.to_uppercase())
            .unwrap();
        assert_eq!(joined, "ABC");
    }

    #[test]
    fn counting() {
        let seq = Seq::from_vec(vec![1, 2, 3, 4]).filter(|v| v % 2 == 0);
        assert_eq!(seq.count().unwrap(), 2);
        assert_eq!(seq.long_count().unwrap(), 2);
        let all = Seq::from_vec(vec![1, 2, 3, 4]);
        assert_eq!(all.count_where(|v| *v > 1).unwrap(), 3);
        assert_eq!(all.long_count_where(|v| *v > 3).unwrap(), 1);
    }

    #[test]
    fn count_overflows_instead_of_wrapping() {
        let huge = Seq::repeat(0u8, i32::MAX)
            .unwrap()
            .concat(&Seq::repeat(0u8, 2).unwrap());
        assert!(huge.count().unwrap_err().is_overflow());
        assert_eq!(huge.long_count().unwrap(), i64::from(i32::MAX) + 2);
    }

    #[test]
    fn quantifiers_short_circuit() {
        let seq = Seq::from_vec(vec![1, 2, 3]).select(|v| {
            assert!(v < 3, "pulled past the deciding element");
            v
        });
        assert!(seq.any().unwrap());
        assert!(seq.any_where(|v| *v == 2).unwrap());
        assert!(!seq.all(|v| *v < 2).unwrap());
        assert!(seq.contains(&1).unwrap());
        assert!(Seq::<i32>::empty().all(|_| false).unwrap());
        assert!(!Seq::<i32>::empty().any().unwrap());
    }

    #[test]
    fn contains_with_comparer() {
        let seq = Seq::from_vec(vec!["Hello".to_string()]);
        assert!(!seq.contains(&"hello".to_string()).unwrap());
        assert!(seq
            .contains_with(&"hello".to_string(), case_insensitive_eq())
            .unwrap());
    }

    #[test]
    fn comparer_equality_on_floats() {
        let near: EqRef<f64> = std::sync::Arc::new(FnEquality::new(
            |a: &f64, b: &f64| (a - b).abs() < 1e-9,
            |_: &f64| 0,
        ));
        let seq = Seq::from_vec(vec![0.1 + 0.2, 1.0]);
        assert!(seq.contains_with(&0.3, near.clone()).unwrap());
        assert!(seq
            .sequence_equal_with(&Seq::from_vec(vec![0.3, 1.0]), near)
            .unwrap());
    }

    #[test]
    fn sums_are_checked() {
        let seq = Seq::from_vec(vec![i32::MAX, 1]);
        assert!(seq.sum_i32(|v| *v).unwrap_err().is_overflow());
        assert_eq!(seq.sum_i64(|v| i64::from(*v)).unwrap(), i64::from(i32::MAX) + 1);
        assert_eq!(Seq::from_vec(vec![1.5, 2.5]).sum_f64(|v| *v).unwrap(), 4.0);
    }

    #[test]
    fn average_of_empty_is_invalid() {
        assert!(Seq::<f64>::empty()
            .average_f64(|v| *v)
            .unwrap_err()
            .is_invalid_operation());
        assert_eq!(Seq::from_vec(vec![1, 2, 3, 6]).average_f64(|v| f64::from(*v)).unwrap(), 3.0);
    }

    #[test]
    fn extremes_keep_the_first_candidate() {
        let seq = Seq::from_vec(vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')]);
        assert_eq!(seq.min_by_key(|p| p.0).unwrap(), (1, 'b'));
        assert_eq!(seq.max_by_key(|p| p.0).unwrap(), (2, 'a'));
        assert_eq!(Seq::from_vec(vec![3, 9, 1]).max().unwrap(), 9);
        assert_eq!(Seq::from_vec(vec![3, 9, 1]).min().unwrap(), 1);
        assert!(Seq::<i32>::empty().min().unwrap_err().is_invalid_operation());
    }

    #[test]
    fn sequence_equality() {
        let a = Seq::from_vec(vec![1, 2, 3]);
        assert!(a.sequence_equal(&Seq::range(1, 3).unwrap()).unwrap());
        assert!(!a.sequence_equal(&Seq::range(1, 4).unwrap()).unwrap());
        assert!(!a.sequence_equal(&a.filter(|v| *v < 3)).unwrap());
    }
}
