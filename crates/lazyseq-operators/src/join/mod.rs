//! Keyed joins.
//!
//! Both joins index the inner sequence into a [`Lookup`](crate::Lookup) at the
//! first pull, then stream the outer sequence in arrival order.

mod group;

use std::hash::Hash;
use std::sync::Arc;

use lazyseq_core::comparer::{default_eq, EqRef};
use lazyseq_core::Result;

use crate::lookup::{build_lookup, Lookup};
use crate::seq::Seq;
use crate::traits::{cursor, Element};

/// Index `inner` by key; used by both join flavours.
fn index_inner<I, K, F>(
    op: &'static str,
    inner: &Seq<I>,
    comparer: EqRef<K>,
    key: &F,
) -> Result<Lookup<K, I>>
where
    I: Element,
    F: Fn(&I) -> K,
{
    build_lookup(op, inner, comparer, |item| key(item), |item| item)
}

impl<T: Element> Seq<T> {
    /// Inner join. Output follows outer order, then each outer element's
    /// matches in inner order; outer elements without a match produce nothing.
    pub fn join<I, K, FO, FI, R, FR>(
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
        FR: Fn(T, I) -> R + Send + Sync + 'static,
    {
        self.join_with(inner, outer_key, inner_key, result, default_eq())
    }

    pub fn join_with<I, K, FO, FI, R, FR>(
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
        FR: Fn(T, I) -> R + Send + Sync + 'static,
    {
        let outer = self.clone();
        let inner = inner.clone();
        let outer_key = Arc::new(outer_key);
        let inner_key = Arc::new(inner_key);
        let result = Arc::new(result);
        Seq::deferred("join", move || {
            let mut it = outer.iter();
            let inner = inner.clone();
            let comparer = comparer.clone();
            let (outer_key, inner_key, result) = (
                Arc::clone(&outer_key),
                Arc::clone(&inner_key),
                Arc::clone(&result),
            );
            let mut lookup: Option<Lookup<K, I>> = None;
            // Outer element being paired, its matches, and the next match.
            let mut current: Option<(T, Arc<[I]>, usize)> = None;
            cursor(move || {
                if lookup.is_none() {
                    lookup = Some(index_inner("join", &inner, comparer.clone(), &*inner_key)?);
                }
                let Some(lookup) = lookup.as_ref() else {
                    return Ok(None);
                };
                loop {
                    if let Some((item, matches, next)) = current.as_mut() {
                        if let Some(matched) = matches.get(*next) {
                            *next += 1;
                            return Ok(Some(result(item.clone(), matched.clone())));
                        }
                        current = None;
                    }
                    let Some(item) = it.pull()? else {
                        return Ok(None);
                    };
                    if let Some(group) = lookup.group(&outer_key(&item)) {
                        current = Some((item, group.shared(), 0));
                    }
                }
            })
        })
    }
}
