//! Convenient re-exports for downstream crates.

pub use crate::comparer::{
    case_insensitive_eq, case_insensitive_ord, CaseInsensitive, Comparer, DefaultEquality,
    DefaultOrder, EqRef, EqualityComparer, FnEquality, FnOrder, OrdRef,
};
pub use crate::counter::{Position, Tally};
pub use crate::error::{Result, SeqError};
pub use crate::value::{FromValue, Value};
