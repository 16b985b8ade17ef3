use std::hash::Hash;
use std::sync::Arc;

use lazyseq_core::comparer::{default_eq, EqRef};

use super::index_inner;
use crate::lookup::Lookup;
use crate::seq::Seq;
use crate::traits::{cursor, Element};

impl<T: Element> Seq<T> {
    /// One result per outer element, paired with its (possibly empty) group of
    /// inner matches.
    pub fn group_join<I, K, FO, FI, R, FR>(
        &self,
        inner: &Seq<I>,
        outer_key: FO,
        inner_key: FI,
        result: FR,
    ) -> Seq<R>
    where
        I: Element,
        K: Element + Eq + Hash,
        R: Element,
        FO: Fn(&T) -> K + Send + Sync + 'static,
        FI: Fn(&I) -> K + Send + Sync + 'static,
        FR: Fn(T, Seq<I>) -> R + Send + Sync + 'static,
    {
        self.group_join_with(inner, outer_key, inner_key, result, default_eq())
    }

    pub fn group_join_with<I, K, FO, FI, R, FR>(
        &self,
        inner: &Seq<I>,
        outer_key: FO,
        inner_key: FI,
        result: FR,
        comparer: EqRef<K>,
    ) -> Seq<R>
    where
        I: Element,
        K: Element,
        R: Element,
        FO: Fn(&T) -> K + Send + Sync + 'static,
        FI: Fn(&I) -> K + Send + Sync + 'static,
        FR: Fn(T, Seq<I>) -> R + Send + Sync + 'static,
    {
        let outer = self.clone();
        let inner = inner.clone();
        let outer_key = Arc::new(outer_key);
        let inner_key = Arc::new(inner_key);
        let result = Arc::new(result);
        Seq::deferred("group_join", move || {
            let mut it = outer.iter();
            let inner = inner.clone();
            let comparer = comparer.clone();
            let (outer_key, inner_key, result) = (
                Arc::clone(&outer_key),
                Arc::clone(&inner_key),
                Arc::clone(&result),
            );
            let mut lookup: Option<Lookup<K, I>> = None;
            cursor(move || {
                if lookup.is_none() {
                    lookup = Some(index_inner(
                        "group_join",
                        &inner,
                        comparer.clone(),
                        &*inner_key,
                    )?);
                }
                let Some(lookup) = lookup.as_ref() else {
                    return Ok(None);
                };
                let Some(item) = it.pull()? else {
                    return Ok(None);
                };
                let group = match lookup.group(&outer_key(&item)) {
                    Some(group) => group.to_seq(),
                    None => Seq::empty(),
                };
                Ok(Some(result(item, group)))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_outer_element_appears_once() {
        let outer = Seq::from_vec(vec![1, 2, 3]);
        let inner = Seq::from_vec(vec![10, 30, 31]);
        let paired = outer.group_join(
            &inner,
            |o| *o,
            |i| i / 10,
            |o, group| (o, group.to_vec().unwrap_or_default()),
        );
        assert_eq!(
            paired.to_vec().unwrap(),
            vec![(1, vec![10]), (2, vec![]), (3, vec![30, 31])]
        );
    }

    #[test]
    fn empty_groups_share_the_empty_sequence() {
        let paired = Seq::from_vec(vec![7]).group_join(
            &Seq::<i32>::empty(),
            |o| *o,
            |i| *i,
            |_, group| group,
        );
        let group = paired.first().unwrap();
        assert!(group.ptr_eq(&Seq::empty()));
    }
}
