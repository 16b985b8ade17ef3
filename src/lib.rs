#![forbid(unsafe_code)]
//! lazyseq: lazy, pull-based sequence operators with pluggable comparers,
//! plus a declarative query layer over JSON records.
//!
//! - `lazyseq_core`: errors, comparers, dynamic values, checked counters.
//! - `lazyseq_operators`: `Seq<T>` and every operator.
//! - `lazyseq_planner`: YAML/JSON query documents lowered onto `Seq<Record>`.

pub use lazyseq_core;
pub use lazyseq_operators;
pub use lazyseq_planner;

pub use lazyseq_core::prelude::*;
pub use lazyseq_operators::{Grouping, Lookup, OrderedSeq, Seq, SeqIter};
