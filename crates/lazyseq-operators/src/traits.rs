//! Source + cursor protocol.
//!
//! A [`Source`] is the immutable, shareable half of an operator: it captures its
//! upstream sequence(s), closures and comparers, and opens a fresh [`Cursor`]
//! each time the sequence is enumerated. The cursor owns all in-progress state
//! (buffers, hash sets, positions) and is never shared.

use lazyseq_core::Result;

/// Bound shared by every element type flowing through the engine.
pub trait Element: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Element for T {}

/// Pull cursor: `Ok(Some(_))` yields, `Ok(None)` completes, `Err(_)` faults.
///
/// Callers never advance a cursor again after it completed or faulted; the
/// [`SeqIter`](crate::SeqIter) wrapper enforces that.
pub trait Cursor<T>: Send {
    fn advance(&mut self) -> Result<Option<T>>;
}

pub type BoxCursor<T> = Box<dyn Cursor<T>>;

/// Positional read access for sources that hold their elements addressably.
pub trait RandomAccess<T>: Send + Sync {
    fn len(&self) -> u64;

    fn get(&self, index: u64) -> Option<T>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Repeatable producer of cursors.
///
/// Invariants:
/// - `open` must not consume anything upstream; work starts at the first
///   `advance` of the returned cursor.
/// - `known_count`, when `Some`, is the exact number of elements `open` would
///   produce, and computing it must not run caller-supplied functions.
pub trait Source<T>: Send + Sync {
    /// Human-readable operator name (stable).
    fn name(&self) -> &'static str;

    fn open(&self) -> BoxCursor<T>;

    fn known_count(&self) -> Option<u64> {
        None
    }

    fn random_access(&self) -> Option<&dyn RandomAccess<T>> {
        None
    }
}

/// Cursor driven by a closure; the usual way operators express their state.
pub(crate) struct FnCursor<P>(pub(crate) P);

impl<T, P> Cursor<T> for FnCursor<P>
where
    P: FnMut() -> Result<Option<T>> + Send,
{
    fn advance(&mut self) -> Result<Option<T>> {
        (self.0)()
    }
}

pub(crate) fn cursor<T, P>(step: P) -> BoxCursor<T>
where
    T: 'static,
    P: FnMut() -> Result<Option<T>> + Send + 'static,
{
    Box::new(FnCursor(step))
}

/// Adapts an infallible std iterator.
pub(crate) struct IterCursor<I>(pub(crate) I);

impl<I> Cursor<I::Item> for IterCursor<I>
where
    I: Iterator + Send,
{
    fn advance(&mut self) -> Result<Option<I::Item>> {
        Ok(self.0.next())
    }
}
