//! Partitioning operators: take, skip, take_while, skip_while.

use std::sync::Arc;

use lazyseq_core::error::check_non_negative;
use lazyseq_core::Result;

use crate::seq::Seq;
use crate::traits::{cursor, Element};

impl<T: Element> Seq<T> {
    /// At most `count` leading elements. Never pulls past the last one taken.
    pub fn take(&self, count: i32) -> Result<Seq<T>> {
        check_non_negative("count", count)?;
        let source = self.clone();
        let counted = self.clone();
        Ok(Seq::deferred_counted(
            "take",
            move || {
                let mut it = source.iter();
                let mut remaining = count;
                cursor(move || {
                    if remaining == 0 {
                        return Ok(None);
                    }
                    remaining -= 1;
                    it.pull()
                })
            },
            move || Some(counted.known_count()?.min(count as u64)),
        ))
    }

    /// Everything after the first `count` elements.
    pub fn skip(&self, count: i32) -> Result<Seq<T>> {
        check_non_negative("count", count)?;
        let source = self.clone();
        let counted = self.clone();
        Ok(Seq::deferred_counted(
            "skip",
            move || {
                let mut it = source.iter();
                let mut to_skip = count;
                cursor(move || {
                    while to_skip > 0 {
                        to_skip -= 1;
                        if it.pull()?.is_none() {
                            return Ok(None);
                        }
                    }
                    it.pull()
                })
            },
            move || Some(counted.known_count()?.saturating_sub(count as u64)),
        ))
    }

    /// Leading elements while `predicate` holds.
    pub fn take_while<F>(&self, predicate: F) -> Seq<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Seq::deferred("take_while", move || {
            let mut it = source.iter();
            let predicate = Arc::clone(&predicate);
            let mut done = false;
            cursor(move || {
                if done {
                    return Ok(None);
                }
                match it.pull()? {
                    Some(item) if predicate(&item) => Ok(Some(item)),
                    _ => {
                        done = true;
                        Ok(None)
                    }
                }
            })
        })
    }

    /// Drop leading elements while `predicate` holds, then yield the rest.
    pub fn skip_while<F>(&self, predicate: F) -> Seq<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Seq::deferred("skip_while", move || {
            let mut it = source.iter();
            let predicate = Arc::clone(&predicate);
            let mut skipping = true;
            cursor(move || {
                while let Some(item) = it.pull()? {
                    if skipping && predicate(&item) {
                        continue;
                    }
                    skipping = false;
                    return Ok(Some(item));
                }
                Ok(None)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_and_skip() {
        let seq = Seq::range(0, 10).unwrap();
        assert_eq!(seq.take(3).unwrap().to_vec().unwrap(), vec![0, 1, 2]);
        assert_eq!(seq.skip(8).unwrap().to_vec().unwrap(), vec![8, 9]);
        assert_eq!(seq.skip(20).unwrap().count().unwrap(), 0);
        assert_eq!(seq.take(20).unwrap().known_count(), Some(10));
        assert_eq!(seq.skip(4).unwrap().known_count(), Some(6));
    }

    #[test]
    fn negative_counts_rejected_at_construction() {
        let seq = Seq::from_vec(vec![1]);
        assert!(seq.take(-1).unwrap_err().is_out_of_range());
        assert!(seq.skip(-1).unwrap_err().is_out_of_range());
    }

    #[test]
    fn take_does_not_over_pull() {
        let seq = Seq::from_vec(vec![1, 2, 3])
            .select(|v| {
                assert!(v < 3, "element past the taken prefix was pulled");
                v
            })
            .take(2)
            .unwrap();
        assert_eq!(seq.to_vec().unwrap(), vec![1, 2]);
    }

    #[test]
    fn while_variants() {
        let seq = Seq::from_vec(vec![1, 2, 5, 1, 7]);
        assert_eq!(seq.take_while(|v| *v < 3).to_vec().unwrap(), vec![1, 2]);
        assert_eq!(seq.skip_while(|v| *v < 3).to_vec().unwrap(), vec![5, 1, 7]);
    }
}
