//! Materializers. Both always snapshot into fresh storage the caller owns.

use lazyseq_core::Result;

use crate::seq::Seq;
use crate::traits::Element;

/// Upper bound on capacity reserved up front from `known_count`.
const MAX_PREALLOC: u64 = 1 << 16;

impl<T: Element> Seq<T> {
    /// Capacity to reserve for a materialization of `self`.
    pub(crate) fn prealloc_hint(&self) -> usize {
        self.known_count().unwrap_or(0).min(MAX_PREALLOC) as usize
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        let mut out = Vec::with_capacity(self.prealloc_hint());
        for item in self {
            out.push(item?);
        }
        Ok(out)
    }

    pub fn to_array(&self) -> Result<Box<[T]>> {
        self.to_vec().map(Vec::into_boxed_slice)
    }
}
