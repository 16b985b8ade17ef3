//! Operators that combine or rearrange whole sequences: concat, prepend,
//! append, reverse, default_if_empty.

use lazyseq_core::Result;

use crate::seq::Seq;
use crate::trace;
use crate::traits::{cursor, Element};

impl<T: Element> Seq<T> {
    /// All of `self`, then all of `other`.
    pub fn concat(&self, other: &Seq<T>) -> Seq<T> {
        let first = self.clone();
        let second = other.clone();
        let (count_a, count_b) = (self.clone(), other.clone());
        Seq::deferred_counted(
            "concat",
            move || {
                let mut a = first.iter();
                let mut b = second.iter();
                cursor(move || match a.pull()? {
                    Some(item) => Ok(Some(item)),
                    None => b.pull(),
                })
            },
            move || {
                let a = count_a.known_count()?;
                let b = count_b.known_count()?;
                Some(a.saturating_add(b))
            },
        )
    }

    pub fn prepend(&self, value: T) -> Seq<T> {
        Seq::from_vec(vec![value]).concat(self)
    }

    pub fn append(&self, value: T) -> Seq<T> {
        self.concat(&Seq::from_vec(vec![value]))
    }

    /// Elements in reverse order. The whole source is buffered at the first pull.
    pub fn reverse(&self) -> Seq<T> {
        let source = self.clone();
        let counted = self.clone();
        Seq::deferred_counted(
            "reverse",
            move || {
                let source = source.clone();
                let mut buffer: Option<Vec<T>> = None;
                cursor(move || {
                    if buffer.is_none() {
                        let items = source.iter().collect::<Result<Vec<T>>>()?;
                        trace::buffered("reverse", items.len());
                        buffer = Some(items);
                    }
                    Ok(buffer.as_mut().and_then(Vec::pop))
                })
            },
            move || counted.known_count(),
        )
    }

    /// The source, or a single `value` when the source is empty.
    pub fn default_if_empty(&self, value: T) -> Seq<T> {
        let source = self.clone();
        Seq::deferred("default_if_empty", move || {
            let mut it = source.iter();
            let value = value.clone();
            let mut any = false;
            let mut substituted = false;
            cursor(move || match it.pull()? {
                Some(item) => {
                    any = true;
                    Ok(Some(item))
                }
                None if !any && !substituted => {
                    substituted = true;
                    Ok(Some(value.clone()))
                }
                None => Ok(None),
            })
        })
    }
}
