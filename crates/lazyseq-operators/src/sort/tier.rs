//! Sort tiers: one `(key selector, comparer, direction)` per `order_by` /
//! `then_by` call.

use std::cmp::Ordering;

use lazyseq_core::comparer::OrdRef;

use crate::traits::Element;

/// A recorded ordering tier, applied to a whole buffer at once.
pub(crate) trait SortTier<T>: Send + Sync {
    /// Compute this tier's key for every buffered element (exactly once each).
    fn keys(&self, items: &[T]) -> Box<dyn TierKeys>;
}

/// Keys of one tier, compared by buffer position.
pub(crate) trait TierKeys {
    fn compare(&self, a: usize, b: usize) -> Ordering;
}

pub(crate) struct KeyTier<K, F> {
    key: F,
    comparer: OrdRef<K>,
    descending: bool,
}

impl<K, F> KeyTier<K, F> {
    pub(crate) fn new(key: F, comparer: OrdRef<K>, descending: bool) -> Self {
        Self {
            key,
            comparer,
            descending,
        }
    }
}

impl<T, K, F> SortTier<T> for KeyTier<K, F>
where
    T: Element,
    K: Send + Sync + 'static,
    F: Fn(&T) -> K + Send + Sync,
{
    fn keys(&self, items: &[T]) -> Box<dyn TierKeys> {
        Box::new(ComputedKeys {
            keys: items.iter().map(&self.key).collect(),
            comparer: self.comparer.clone(),
            descending: self.descending,
        })
    }
}

struct ComputedKeys<K> {
    keys: Vec<K>,
    comparer: OrdRef<K>,
    descending: bool,
}

impl<K> TierKeys for ComputedKeys<K> {
    fn compare(&self, a: usize, b: usize) -> Ordering {
        let ord = self.comparer.compare(&self.keys[a], &self.keys[b]);
        // Only this tier flips; the sort itself stays ascending and stable.
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

/// Stable permutation of `0..len` under `tiers`, left to right.
pub(crate) fn sorted_positions(len: usize, tiers: &[Box<dyn TierKeys>]) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..len).collect();
    positions.sort_by(|&a, &b| {
        tiers
            .iter()
            .map(|tier| tier.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    positions
}
