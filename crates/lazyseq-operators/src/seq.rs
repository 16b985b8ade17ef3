//! `Seq<T>` descriptor and the single-enumeration iterator.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use lazyseq_core::Result;

use crate::traits::{BoxCursor, Element, RandomAccess, Source};

/// A repeatable, lazily evaluated sequence.
///
/// Cloning is cheap and shares the same immutable pipeline. Every call to
/// [`Seq::iter`] re-runs the pipeline from its ultimate source.
pub struct Seq<T> {
    src: Arc<dyn Source<T>>,
}

impl<T> Clone for Seq<T> {
    fn clone(&self) -> Self {
        Self {
            src: Arc::clone(&self.src),
        }
    }
}

impl<T> fmt::Debug for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seq")
            .field("op", &self.src.name())
            .field("known_count", &self.src.known_count())
            .finish()
    }
}

impl<T: Element> Seq<T> {
    pub fn from_source<S>(source: S) -> Self
    where
        S: Source<T> + 'static,
    {
        Self {
            src: Arc::new(source),
        }
    }

    /// Start a new enumeration. Nothing upstream runs until the first pull.
    pub fn iter(&self) -> SeqIter<T> {
        SeqIter {
            state: State::NotStarted(Arc::clone(&self.src)),
        }
    }

    pub fn op_name(&self) -> &'static str {
        self.src.name()
    }

    /// Exact element count, if the pipeline knows it without enumerating.
    pub fn known_count(&self) -> Option<u64> {
        self.src.known_count()
    }

    pub fn random_access(&self) -> Option<&dyn RandomAccess<T>> {
        self.src.random_access()
    }

    /// Reference equality: both handles share the same pipeline object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.src) as *const (),
            Arc::as_ptr(&other.src) as *const (),
        )
    }

    /// Operator whose cursor is built by `open` on each enumeration.
    pub(crate) fn deferred<F>(name: &'static str, open: F) -> Self
    where
        F: Fn() -> BoxCursor<T> + Send + Sync + 'static,
    {
        Self::from_source(Deferred {
            name,
            open: Box::new(open),
            count: None,
        })
    }

    /// Like [`Seq::deferred`], with a cardinality derived from upstream.
    pub(crate) fn deferred_counted<F, C>(name: &'static str, open: F, count: C) -> Self
    where
        F: Fn() -> BoxCursor<T> + Send + Sync + 'static,
        C: Fn() -> Option<u64> + Send + Sync + 'static,
    {
        Self::from_source(Deferred {
            name,
            open: Box::new(open),
            count: Some(Box::new(count)),
        })
    }
}

impl<'a, T: Element> IntoIterator for &'a Seq<T> {
    type Item = Result<T>;
    type IntoIter = SeqIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

type OpenFn<T> = Box<dyn Fn() -> BoxCursor<T> + Send + Sync>;
type CountFn = Box<dyn Fn() -> Option<u64> + Send + Sync>;

struct Deferred<T> {
    name: &'static str,
    open: OpenFn<T>,
    count: Option<CountFn>,
}

impl<T: Element> Source<T> for Deferred<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn open(&self) -> BoxCursor<T> {
        (self.open)()
    }

    fn known_count(&self) -> Option<u64> {
        self.count.as_ref().and_then(|count| count())
    }
}

enum State<T> {
    NotStarted(Arc<dyn Source<T>>),
    Active(BoxCursor<T>),
    Completed,
}

/// Single-use cursor over a [`Seq`].
///
/// States: not started -> active -> completed. The operator's cursor is opened
/// on the first pull. Completion and faults are terminal: every later pull
/// reports completion, and any buffered state is dropped right away.
pub struct SeqIter<T> {
    state: State<T>,
}

impl<T> SeqIter<T> {
    /// Advance once.
    pub fn pull(&mut self) -> Result<Option<T>> {
        if let State::NotStarted(src) = &self.state {
            let opened = src.open();
            self.state = State::Active(opened);
        }
        let State::Active(cursor) = &mut self.state else {
            return Ok(None);
        };
        match cursor.advance() {
            Ok(Some(item)) => Ok(Some(item)),
            Ok(None) => {
                self.state = State::Completed;
                Ok(None)
            }
            Err(e) => {
                self.state = State::Completed;
                Err(e)
            }
        }
    }

    pub fn is_started(&self) -> bool {
        !matches!(self.state, State::NotStarted(_))
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, State::Completed)
    }
}

impl<T> Iterator for SeqIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pull().transpose()
    }
}

impl<T> FusedIterator for SeqIter<T> {}

impl<T> fmt::Debug for SeqIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::NotStarted(_) => "not-started",
            State::Active(_) => "active",
            State::Completed => "completed",
        };
        f.debug_struct("SeqIter").field("state", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn iterator_states_are_terminal() {
        let seq = Seq::from_vec(vec![1, 2]);
        let mut it = seq.iter();
        assert!(!it.is_started());
        assert_eq!(it.pull().unwrap(), Some(1));
        assert!(it.is_started());
        assert_eq!(it.pull().unwrap(), Some(2));
        assert_eq!(it.pull().unwrap(), None);
        assert!(it.is_completed());
        assert_eq!(it.pull().unwrap(), None);
    }

    #[test]
    fn opening_is_deferred_to_first_pull() {
        let opened = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&opened);
        let seq = Seq::from_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![1, 2, 3]
        });

        let mut it = seq.iter();
        assert_eq!(opened.load(Ordering::SeqCst), 0);
        it.pull().unwrap();
        assert_eq!(opened.load(Ordering::SeqCst), 1);

        // Each enumeration re-runs the source.
        assert_eq!(seq.to_vec().unwrap(), vec![1, 2, 3]);
        assert_eq!(opened.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn clones_share_the_pipeline() {
        let a = Seq::from_vec(vec![1]);
        let b = a.clone();
        let c = Seq::from_vec(vec![1]);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }
}
