#![forbid(unsafe_code)]
//! lazyseq-operators: lazy, pull-based sequence operators.
//!
//! Design intent:
//! - Every operator is two-phase: a cheap, eagerly validated descriptor
//!   (`Seq<T>`) and a cursor factory that runs only when enumeration starts.
//! - Re-enumerating a sequence re-runs the whole pipeline from its source.
//! - Single-threaded pull model; no async, no internal parallelism.
//! - Faults surface unchanged at the exact pull that raised them.

pub mod seq;
pub mod traits;

mod trace;

pub mod generate;
pub mod materialize;

pub mod combine;
pub mod dynamic;
pub mod filter;
pub mod map;
pub mod partition;

pub mod join;
pub mod lookup;
pub mod set;
pub mod sort;

pub mod aggregate;
pub mod element;

pub use lookup::{Grouping, Lookup};
pub use seq::{Seq, SeqIter};
pub use set::KeySet;
pub use sort::OrderedSeq;
pub use traits::{BoxCursor, Cursor, Element, RandomAccess, Source};
