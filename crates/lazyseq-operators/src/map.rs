//! Projection operators: select, select_many and zip.

use std::sync::Arc;

use lazyseq_core::counter::Position;
use lazyseq_core::Result;

use crate::seq::{Seq, SeqIter};
use crate::traits::{cursor, Element};

impl<T: Element> Seq<T> {
    /// Project each element.
    pub fn select<U, F>(&self, f: F) -> Seq<U>
    where
        U: Element,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Seq::deferred("select", move || {
            let mut it = source.iter();
            let f = Arc::clone(&f);
            cursor(move || Ok(it.pull()?.map(|item| f(item))))
        })
    }

    /// Project each element together with its 0-based position.
    ///
    /// Fails with `Overflow` at the pull whose index would exceed `i32::MAX`.
    pub fn select_indexed<U, F>(&self, f: F) -> Seq<U>
    where
        U: Element,
        F: Fn(T, i32) -> U + Send + Sync + 'static,
    {
        self.select_indexed_from(Position::new(), f)
    }

    /// `select_indexed` with numbering resumed at `start`.
    pub(crate) fn select_indexed_from<U, F>(&self, start: Position, f: F) -> Seq<U>
    where
        U: Element,
        F: Fn(T, i32) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Seq::deferred("select_indexed", move || {
            let mut it = source.iter();
            let mut pos = start.clone();
            let f = Arc::clone(&f);
            cursor(move || match it.pull()? {
                Some(item) => {
                    let index = pos.next()?;
                    Ok(Some(f(item, index)))
                }
                None => Ok(None),
            })
        })
    }

    /// Project with a fallible function; its error is surfaced unchanged at
    /// the pull that invoked it.
    pub fn try_select<U, F>(&self, f: F) -> Seq<U>
    where
        U: Element,
        F: Fn(T) -> Result<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Seq::deferred("try_select", move || {
            let mut it = source.iter();
            let f = Arc::clone(&f);
            cursor(move || it.pull()?.map(|item| f(item)).transpose())
        })
    }

    /// Flatten the sequences produced for each element.
    pub fn select_many<U, F>(&self, f: F) -> Seq<U>
    where
        U: Element,
        F: Fn(T) -> Seq<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Seq::deferred("select_many", move || {
            let mut outer = source.iter();
            let mut inner: Option<SeqIter<U>> = None;
            let f = Arc::clone(&f);
            cursor(move || loop {
                if let Some(current) = inner.as_mut() {
                    if let Some(item) = current.pull()? {
                        return Ok(Some(item));
                    }
                    inner = None;
                }
                match outer.pull()? {
                    Some(item) => inner = Some(f(item).iter()),
                    None => return Ok(None),
                }
            })
        })
    }

    /// `select_many` whose selector also receives the outer element's index.
    pub fn select_many_indexed<U, F>(&self, f: F) -> Seq<U>
    where
        U: Element,
        F: Fn(T, i32) -> Seq<U> + Send + Sync + 'static,
    {
        let indexed = self.select_indexed(move |item, index| (item, index));
        let f = Arc::new(f);
        indexed.select_many(move |(item, index)| f(item, index))
    }

    /// Flatten, then combine each outer element with each of its inner elements.
    pub fn select_many_with<C, U, R, F>(&self, collection: C, result: F) -> Seq<R>
    where
        U: Element,
        R: Element,
        C: Fn(&T) -> Seq<U> + Send + Sync + 'static,
        F: Fn(&T, U) -> R + Send + Sync + 'static,
    {
        let source = self.clone();
        let collection = Arc::new(collection);
        let result = Arc::new(result);
        Seq::deferred("select_many_with", move || {
            let mut outer = source.iter();
            let mut current: Option<(T, SeqIter<U>)> = None;
            let collection = Arc::clone(&collection);
            let result = Arc::clone(&result);
            cursor(move || loop {
                if let Some((item, inner)) = current.as_mut() {
                    if let Some(sub) = inner.pull()? {
                        return Ok(Some(result(item, sub)));
                    }
                    current = None;
                }
                match outer.pull()? {
                    Some(item) => {
                        let inner = collection(&item).iter();
                        current = Some((item, inner));
                    }
                    None => return Ok(None),
                }
            })
        })
    }

    /// Pair elements in lockstep; stops as soon as either side is exhausted.
    pub fn zip<U, R, F>(&self, other: &Seq<U>, f: F) -> Seq<R>
    where
        U: Element,
        R: Element,
        F: Fn(T, U) -> R + Send + Sync + 'static,
    {
        let left = self.clone();
        let right = other.clone();
        let f = Arc::new(f);
        Seq::deferred("zip", move || {
            let mut a = left.iter();
            let mut b = right.iter();
            let f = Arc::clone(&f);
            cursor(move || {
                let Some(x) = a.pull()? else {
                    return Ok(None);
                };
                let Some(y) = b.pull()? else {
                    return Ok(None);
                };
                Ok(Some(f(x, y)))
            })
        })
    }
}
