#![forbid(unsafe_code)]
//! lazyseq-core: shared vocabulary for the lazyseq engine.
//!
//! - `error`: the failure kinds every operator raises.
//! - `comparer`: equality / ordering capabilities and their defaults.
//! - `value`: dynamically typed elements and the `FromValue` view capability.
//! - `counter`: checked index and count tallies.
//! - `hash`: stable content hashes for query documents.
//!
//! No IO, no logging, no threads in core.

pub mod comparer;
pub mod counter;
pub mod error;
pub mod hash;
pub mod prelude;
pub mod value;

pub use error::{Result, SeqError};
