//! Ordering engine: `order_by*` / `then_by*`.
//!
//! Construction only records tiers. The first pull buffers the source,
//! computes each tier's keys once per element, and runs one stable sort over
//! the whole tier list; full ties keep input order.

mod tier;

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use lazyseq_core::comparer::{default_ord, OrdRef};
use lazyseq_core::Result;

use crate::seq::Seq;
use crate::trace;
use crate::traits::{cursor, Element};

use tier::{sorted_positions, KeyTier, SortTier};

type Tiers<T> = Arc<[Arc<dyn SortTier<T>>]>;

/// A sequence produced by the ordering engine; the only type offering
/// `then_by*`. Dereferences to [`Seq`] for every other operator.
pub struct OrderedSeq<T> {
    source: Seq<T>,
    tiers: Tiers<T>,
    sorted: Seq<T>,
}

impl<T> Clone for OrderedSeq<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            tiers: Arc::clone(&self.tiers),
            sorted: self.sorted.clone(),
        }
    }
}

impl<T> fmt::Debug for OrderedSeq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedSeq")
            .field("tiers", &self.tiers.len())
            .finish()
    }
}

impl<T: Element> OrderedSeq<T> {
    fn new(source: Seq<T>, tiers: Vec<Arc<dyn SortTier<T>>>) -> Self {
        let tiers: Tiers<T> = tiers.into();
        let sorted = sort_source(source.clone(), Arc::clone(&tiers));
        Self {
            source,
            tiers,
            sorted,
        }
    }

    fn with_tier(&self, tier: Arc<dyn SortTier<T>>) -> Self {
        let mut tiers = self.tiers.to_vec();
        tiers.push(tier);
        Self::new(self.source.clone(), tiers)
    }

    pub fn as_seq(&self) -> &Seq<T> {
        &self.sorted
    }

    pub fn into_seq(self) -> Seq<T> {
        self.sorted
    }

    /// Number of recorded tiers.
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    pub fn then_by<K, F>(&self, key: F) -> OrderedSeq<T>
    where
        K: Ord + Send + Sync + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.then_by_with(key, default_ord())
    }

    pub fn then_by_with<K, F>(&self, key: F, comparer: OrdRef<K>) -> OrderedSeq<T>
    where
        K: Send + Sync + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.with_tier(Arc::new(KeyTier::new(key, comparer, false)))
    }

    pub fn then_by_descending<K, F>(&self, key: F) -> OrderedSeq<T>
    where
        K: Ord + Send + Sync + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.then_by_descending_with(key, default_ord())
    }

    pub fn then_by_descending_with<K, F>(
        &self,
        key: F,
        comparer: OrdRef<K>,
    ) -> OrderedSeq<T>
    where
        K: Send + Sync + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.with_tier(Arc::new(KeyTier::new(key, comparer, true)))
    }
}

impl<T> Deref for OrderedSeq<T> {
    type Target = Seq<T>;

    fn deref(&self) -> &Seq<T> {
        &self.sorted
    }
}

impl<T> From<OrderedSeq<T>> for Seq<T> {
    fn from(ordered: OrderedSeq<T>) -> Self {
        ordered.sorted
    }
}

fn sort_source<T: Element>(source: Seq<T>, tiers: Tiers<T>) -> Seq<T> {
    let counted = source.clone();
    Seq::deferred_counted(
        "order_by",
        move || {
            let source = source.clone();
            let tiers = Arc::clone(&tiers);
            let mut sorted: Option<std::vec::IntoIter<T>> = None;
            cursor(move || {
                if sorted.is_none() {
                    sorted = Some(buffer_sorted(&source, &tiers)?.into_iter());
                }
                Ok(sorted.as_mut().and_then(Iterator::next))
            })
        },
        move || counted.known_count(),
    )
}

fn buffer_sorted<T: Element>(
    source: &Seq<T>,
    tiers: &[Arc<dyn SortTier<T>>],
) -> Result<Vec<T>> {
    let items = source.iter().collect::<Result<Vec<T>>>()?;
    trace::buffered("order_by", items.len());
    let keys: Vec<_> = tiers.iter().map(|tier| tier.keys(&items)).collect();
    let positions = sorted_positions(items.len(), &keys);
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    Ok(positions
        .into_iter()
        .filter_map(|pos| slots[pos].take())
        .collect())
}

impl<T: Element> Seq<T> {
    /// Ascending by `key`. Deferred: nothing runs until the first pull.
    pub fn order_by<K, F>(&self, key: F) -> OrderedSeq<T>
    where
        K: Ord + Send + Sync + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.order_by_with(key, default_ord())
    }

    pub fn order_by_with<K, F>(&self, key: F, comparer: OrdRef<K>) -> OrderedSeq<T>
    where
        K: Send + Sync + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        let tier: Arc<dyn SortTier<T>> =
            Arc::new(KeyTier::new(key, comparer, false));
        OrderedSeq::new(self.clone(), vec![tier])
    }

    pub fn order_by_descending<K, F>(&self, key: F) -> OrderedSeq<T>
    where
        K: Ord + Send + Sync + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.order_by_descending_with(key, default_ord())
    }

    pub fn order_by_descending_with<K, F>(
        &self,
        key: F,
        comparer: OrdRef<K>,
    ) -> OrderedSeq<T>
    where
        K: Send + Sync + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        let tier: Arc<dyn SortTier<T>> =
            Arc::new(KeyTier::new(key, comparer, true));
        OrderedSeq::new(self.clone(), vec![tier])
    }
}
