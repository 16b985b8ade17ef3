//! Sequence constructors: vectors, closures, ranges, repeats and the shared
//! empty sequence.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;

use lazyseq_core::error::check_non_negative;
use lazyseq_core::{Result, SeqError};

use crate::seq::Seq;
use crate::traits::{cursor, BoxCursor, Element, IterCursor, RandomAccess, Source};

/// Elements held contiguously; supports counting and positional reads.
struct SharedSlice<T> {
    items: Arc<[T]>,
}

impl<T: Element> Source<T> for SharedSlice<T> {
    fn name(&self) -> &'static str {
        "slice"
    }

    fn open(&self) -> BoxCursor<T> {
        let items = Arc::clone(&self.items);
        let mut pos = 0usize;
        cursor(move || {
            let item = items.get(pos).cloned();
            if item.is_some() {
                pos += 1;
            }
            Ok(item)
        })
    }

    fn known_count(&self) -> Option<u64> {
        Some(self.items.len() as u64)
    }

    fn random_access(&self) -> Option<&dyn RandomAccess<T>> {
        Some(self)
    }
}

impl<T: Element> RandomAccess<T> for SharedSlice<T> {
    fn len(&self) -> u64 {
        self.items.len() as u64
    }

    fn get(&self, index: u64) -> Option<T> {
        let index = usize::try_from(index).ok()?;
        self.items.get(index).cloned()
    }
}

struct FromFn<F> {
    factory: F,
}

impl<T, I, F> Source<T> for FromFn<F>
where
    T: Element,
    I: IntoIterator<Item = T>,
    I::IntoIter: Send + 'static,
    F: Fn() -> I + Send + Sync,
{
    fn name(&self) -> &'static str {
        "from_fn"
    }

    fn open(&self) -> BoxCursor<T> {
        Box::new(IterCursor((self.factory)().into_iter()))
    }
}

struct Range {
    start: i32,
    count: i32,
}

impl Source<i32> for Range {
    fn name(&self) -> &'static str {
        "range"
    }

    fn open(&self) -> BoxCursor<i32> {
        // Validated at construction: start + count - 1 fits in i32.
        Box::new(IterCursor(
            (0..self.count).map({
                let start = self.start;
                move |i| start + i
            }),
        ))
    }

    fn known_count(&self) -> Option<u64> {
        Some(self.count as u64)
    }

    fn random_access(&self) -> Option<&dyn RandomAccess<i32>> {
        Some(self)
    }
}

impl RandomAccess<i32> for Range {
    fn len(&self) -> u64 {
        self.count as u64
    }

    fn get(&self, index: u64) -> Option<i32> {
        let index = i32::try_from(index).ok().filter(|i| *i < self.count)?;
        Some(self.start + index)
    }
}

struct Repeat<T> {
    value: T,
    count: i32,
}

impl<T: Element> Source<T> for Repeat<T> {
    fn name(&self) -> &'static str {
        "repeat"
    }

    fn open(&self) -> BoxCursor<T> {
        let value = self.value.clone();
        let mut remaining = self.count;
        cursor(move || {
            if remaining == 0 {
                return Ok(None);
            }
            remaining -= 1;
            Ok(Some(value.clone()))
        })
    }

    fn known_count(&self) -> Option<u64> {
        Some(self.count as u64)
    }

    fn random_access(&self) -> Option<&dyn RandomAccess<T>> {
        Some(self)
    }
}

impl<T: Element> RandomAccess<T> for Repeat<T> {
    fn len(&self) -> u64 {
        self.count as u64
    }

    fn get(&self, index: u64) -> Option<T> {
        (index < self.len()).then(|| self.value.clone())
    }
}

struct Empty;

impl<T: Element> Source<T> for Empty {
    fn name(&self) -> &'static str {
        "empty"
    }

    fn open(&self) -> BoxCursor<T> {
        cursor(|| Ok(None))
    }

    fn known_count(&self) -> Option<u64> {
        Some(0)
    }

    fn random_access(&self) -> Option<&dyn RandomAccess<T>> {
        Some(self)
    }
}

impl<T: Element> RandomAccess<T> for Empty {
    fn len(&self) -> u64 {
        0
    }

    fn get(&self, _index: u64) -> Option<T> {
        None
    }
}

/// One shared empty sequence per element type, created on first request.
static EMPTIES: Lazy<Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

impl<T: Element> Seq<T> {
    /// Sequence over an owned vector. Enumeration clones elements out; the
    /// vector itself is never handed back to callers.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::from_shared(Arc::from(items))
    }

    pub(crate) fn from_shared(items: Arc<[T]>) -> Self {
        Self::from_source(SharedSlice { items })
    }

    /// Sequence whose elements come from `factory`, called once per enumeration.
    pub fn from_fn<I, F>(factory: F) -> Self
    where
        I: IntoIterator<Item = T> + 'static,
        I::IntoIter: Send + 'static,
        F: Fn() -> I + Send + Sync + 'static,
    {
        Self::from_source(FromFn { factory })
    }

    /// `count` copies of `value`.
    pub fn repeat(value: T, count: i32) -> Result<Self> {
        check_non_negative("count", count)?;
        Ok(Self::from_source(Repeat { value, count }))
    }

    /// The process-wide empty sequence for `T`. Repeated calls return handles
    /// to the same pipeline object (`ptr_eq` holds).
    pub fn empty() -> Self {
        let mut shared = EMPTIES.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = shared
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Seq::<T>::from_source(Empty)) as Box<dyn Any + Send + Sync>);
        match (**entry).downcast_ref::<Seq<T>>() {
            Some(seq) => seq.clone(),
            None => Seq::from_source(Empty),
        }
    }
}

impl Seq<i32> {
    /// `count` consecutive integers starting at `start`.
    pub fn range(start: i32, count: i32) -> Result<Self> {
        check_non_negative("count", count)?;
        if i64::from(start) + i64::from(count) - 1 > i64::from(i32::MAX) {
            return Err(SeqError::overflow(format!(
                "range start {start} with count {count} exceeds i32::MAX"
            )));
        }
        Ok(Self::from_source(Range { start, count }))
    }
}

impl<T: Element> From<Vec<T>> for Seq<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T: Element> FromIterator<T> for Seq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}
