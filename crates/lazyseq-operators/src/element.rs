//! Element accessors: first / last / single / element_at and their
//! `_or_default` forms.
//!
//! Each accessor pulls only as far as it must. `last` and `element_at` read a
//! single position when the source offers random access.

use lazyseq_core::{Result, SeqError};

use crate::seq::Seq;
use crate::traits::Element;

fn no_elements() -> SeqError {
    SeqError::invalid_op("sequence contains no elements")
}

fn no_match() -> SeqError {
    SeqError::invalid_op("sequence contains no matching element")
}

fn many(matching: bool) -> SeqError {
    if matching {
        SeqError::invalid_op("sequence contains more than one matching element")
    } else {
        SeqError::invalid_op("sequence contains more than one element")
    }
}

impl<T: Element> Seq<T> {
    fn find_first<F>(&self, mut predicate: F) -> Result<Option<T>>
    where
        F: FnMut(&T) -> bool,
    {
        for item in self {
            let item = item?;
            if predicate(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn find_last<F>(&self, mut predicate: F) -> Result<Option<T>>
    where
        F: FnMut(&T) -> bool,
    {
        let mut last = None;
        for item in self {
            let item = item?;
            if predicate(&item) {
                last = Some(item);
            }
        }
        Ok(last)
    }

    /// The only matching element; a second match fails as soon as it is seen.
    fn find_single<F>(&self, mut predicate: F, matching: bool) -> Result<Option<T>>
    where
        F: FnMut(&T) -> bool,
    {
        let mut found = None;
        for item in self {
            let item = item?;
            if predicate(&item) {
                if found.is_some() {
                    return Err(many(matching));
                }
                found = Some(item);
            }
        }
        Ok(found)
    }

    fn last_element(&self) -> Result<Option<T>> {
        if let Some(ra) = self.random_access() {
            return Ok(match ra.len() {
                0 => None,
                len => ra.get(len - 1),
            });
        }
        let mut it = self.iter();
        let mut last = None;
        while let Some(item) = it.pull()? {
            last = Some(item);
        }
        Ok(last)
    }

    /// `Ok(None)` for an index at or past the end.
    fn nth_element(&self, index: i32) -> Result<Option<T>> {
        let Ok(index) = u64::try_from(index) else {
            return Ok(None);
        };
        if let Some(ra) = self.random_access() {
            return Ok(ra.get(index));
        }
        let mut it = self.iter();
        let mut pos = 0u64;
        while let Some(item) = it.pull()? {
            if pos == index {
                return Ok(Some(item));
            }
            pos += 1;
        }
        Ok(None)
    }

    pub fn first(&self) -> Result<T> {
        self.iter().pull()?.ok_or_else(no_elements)
    }

    pub fn first_where<F>(&self, predicate: F) -> Result<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.find_first(predicate)?.ok_or_else(no_match)
    }

    pub fn first_or_default(&self) -> Result<T>
    where
        T: Default,
    {
        Ok(self.iter().pull()?.unwrap_or_default())
    }

    pub fn first_where_or_default<F>(&self, predicate: F) -> Result<T>
    where
        T: Default,
        F: FnMut(&T) -> bool,
    {
        Ok(self.find_first(predicate)?.unwrap_or_default())
    }

    pub fn last(&self) -> Result<T> {
        self.last_element()?.ok_or_else(no_elements)
    }

    pub fn last_where<F>(&self, predicate: F) -> Result<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.find_last(predicate)?.ok_or_else(no_match)
    }

    pub fn last_or_default(&self) -> Result<T>
    where
        T: Default,
    {
        Ok(self.last_element()?.unwrap_or_default())
    }

    pub fn last_where_or_default<F>(&self, predicate: F) -> Result<T>
    where
        T: Default,
        F: FnMut(&T) -> bool,
    {
        Ok(self.find_last(predicate)?.unwrap_or_default())
    }

    /// The sole element. Pulls at most two.
    pub fn single(&self) -> Result<T> {
        let mut it = self.iter();
        let only = it.pull()?.ok_or_else(no_elements)?;
        if it.pull()?.is_some() {
            return Err(many(false));
        }
        Ok(only)
    }

    pub fn single_where<F>(&self, predicate: F) -> Result<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.find_single(predicate, true)?.ok_or_else(no_match)
    }

    /// The sole element, or the default when empty; more than one element is
    /// still an invalid operation.
    pub fn single_or_default(&self) -> Result<T>
    where
        T: Default,
    {
        let mut it = self.iter();
        let Some(only) = it.pull()? else {
            return Ok(T::default());
        };
        if it.pull()?.is_some() {
            return Err(many(false));
        }
        Ok(only)
    }

    pub fn single_where_or_default<F>(&self, predicate: F) -> Result<T>
    where
        T: Default,
        F: FnMut(&T) -> bool,
    {
        Ok(self.find_single(predicate, true)?.unwrap_or_default())
    }

    /// Element at `index`; negative or past-the-end indices are `OutOfRange`.
    pub fn element_at(&self, index: i32) -> Result<T> {
        if index < 0 {
            return Err(SeqError::out_of_range("index", index));
        }
        self.nth_element(index)?
            .ok_or_else(|| SeqError::out_of_range("index", index))
    }

    pub fn element_at_or_default(&self, index: i32) -> Result<T>
    where
        T: Default,
    {
        Ok(self.nth_element(index)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counted(items: Vec<i32>) -> (Seq<i32>, Arc<AtomicUsize>) {
        let pulls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&pulls);
        let seq = Seq::from_vec(items).select(move |v| {
            seen.fetch_add(1, Ordering::SeqCst);
            v
        });
        (seq, pulls)
    }

    #[test]
    fn first_family() {
        let seq = Seq::from_vec(vec![1, 2, 3, 4]);
        assert_eq!(seq.first().unwrap(), 1);
        assert_eq!(seq.first_where(|v| *v > 2).unwrap(), 3);
        assert!(seq.first_where(|v| *v > 9).unwrap_err().is_invalid_operation());
        assert_eq!(seq.first_where_or_default(|v| *v > 9).unwrap(), 0);
        assert!(Seq::<i32>::empty().first().unwrap_err().is_invalid_operation());
        assert_eq!(Seq::<String>::empty().first_or_default().unwrap(), "");
    }

    #[test]
    fn first_pulls_once() {
        let (seq, pulls) = counted(vec![1, 2, 3]);
        seq.first().unwrap();
        assert_eq!(pulls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn last_family() {
        let seq = Seq::from_vec(vec![1, 2, 3, 4]);
        assert_eq!(seq.last().unwrap(), 4);
        assert_eq!(seq.last_where(|v| v % 2 == 1).unwrap(), 3);
        assert_eq!(seq.filter(|v| *v < 3).last().unwrap(), 2);
        assert_eq!(Seq::<i32>::empty().last_or_default().unwrap(), 0);
        assert_eq!(seq.last_where_or_default(|v| *v > 9).unwrap(), 0);
        assert!(Seq::<i32>::empty().last().unwrap_err().is_invalid_operation());
    }

    #[test]
    fn last_reads_one_position_on_indexable_sources() {
        // Enumerating two billion elements would not finish in a test run.
        let seq = Seq::range(0, i32::MAX).unwrap();
        assert_eq!(seq.last().unwrap(), i32::MAX - 1);
        assert_eq!(seq.element_at(1_000_000).unwrap(), 1_000_000);
    }

    #[test]
    fn single_family() {
        let one = Seq::from_vec(vec![7]);
        let two = Seq::from_vec(vec![7, 8]);
        assert_eq!(one.single().unwrap(), 7);
        assert!(two.single().unwrap_err().is_invalid_operation());
        assert!(Seq::<i32>::empty().single().unwrap_err().is_invalid_operation());
        assert_eq!(Seq::<i32>::empty().single_or_default().unwrap(), 0);
        assert!(two.single_or_default().unwrap_err().is_invalid_operation());
        assert_eq!(two.single_where(|v| *v > 7).unwrap(), 8);
        assert!(two.single_where(|v| *v > 0).unwrap_err().is_invalid_operation());
        assert!(two.single_where(|v| *v > 8).unwrap_err().is_invalid_operation());
        assert_eq!(two.single_where_or_default(|v| *v > 8).unwrap(), 0);
    }

    #[test]
    fn single_stops_after_second_element() {
        let (seq, pulls) = counted(vec![1, 2, 3, 4]);
        assert!(seq.single().is_err());
        assert_eq!(pulls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn element_at_bounds() {
        let seq = Seq::from_vec(vec![10, 20, 30]);
        let streamed = seq.filter(|_| true);
        assert_eq!(seq.element_at(2).unwrap(), 30);
        assert_eq!(streamed.element_at(1).unwrap(), 20);
        assert!(seq.element_at(3).unwrap_err().is_out_of_range());
        assert!(streamed.element_at(3).unwrap_err().is_out_of_range());
        assert!(seq.element_at(-1).unwrap_err().is_out_of_range());
        assert_eq!(seq.element_at_or_default(-1).unwrap(), 0);
        assert_eq!(streamed.element_at_or_default(5).unwrap(), 0);
    }
}
