//! Filtering operators.

use std::sync::Arc;

use lazyseq_core::counter::Position;
use lazyseq_core::Result;

use crate::seq::Seq;
use crate::traits::{cursor, Element};

impl<T: Element> Seq<T> {
    /// Keep elements satisfying `predicate`.
    pub fn filter<F>(&self, predicate: F) -> Seq<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Seq::deferred("filter", move || {
            let mut it = source.iter();
            let predicate = Arc::clone(&predicate);
            cursor(move || {
                while let Some(item) = it.pull()? {
                    if predicate(&item) {
                        return Ok(Some(item));
                    }
                }
                Ok(None)
            })
        })
    }

    /// Keep elements satisfying `predicate(element, source_index)`.
    ///
    /// The index counts every source element, kept or not, and fails with
    /// `Overflow` once it would exceed `i32::MAX`.
    pub fn filter_indexed<F>(&self, predicate: F) -> Seq<T>
    where
        F: Fn(&T, i32) -> bool + Send + Sync + 'static,
    {
        self.filter_indexed_from(Position::new(), predicate)
    }

    /// `filter_indexed` with numbering resumed at `start`.
    pub(crate) fn filter_indexed_from<F>(&self, start: Position, predicate: F) -> Seq<T>
    where
        F: Fn(&T, i32) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Seq::deferred("filter_indexed", move || {
            let mut it = source.iter();
            let mut pos = start.clone();
            let predicate = Arc::clone(&predicate);
            cursor(move || {
                while let Some(item) = it.pull()? {
                    let index = pos.next()?;
                    if predicate(&item, index) {
                        return Ok(Some(item));
                    }
                }
                Ok(None)
            })
        })
    }

    /// Filter with a fallible predicate; its error surfaces unchanged.
    pub fn try_filter<F>(&self, predicate: F) -> Seq<T>
    where
        F: Fn(&T) -> Result<bool> + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Seq::deferred("try_filter", move || {
            let mut it = source.iter();
            let predicate = Arc::clone(&predicate);
            cursor(move || {
                while let Some(item) = it.pull()? {
                    if predicate(&item)? {
                        return Ok(Some(item));
                    }
                }
                Ok(None)
            })
        })
    }
}
