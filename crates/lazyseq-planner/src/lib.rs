#![forbid(unsafe_code)]
//! lazyseq-planner: declarative YAML/JSON query documents lowered onto
//! `Seq<Record>` pipelines.
//!
//! Design:
//! - A query is a linear list of stages (`dsl::yaml`), optionally carrying a
//!   `config:` block.
//! - `lower` validates every stage eagerly and builds the lazy pipeline; no
//!   record is read until the result is enumerated.
//! - Config precedence: environment < document < caller overrides.
//! - `explain` describes a query without any input.

pub mod config;
pub mod dsl;
pub mod error;
pub mod explain;
pub mod lower;
pub mod predicate;
pub mod record;

pub use config::{PlannerConfig, QueryConfig, StringComparer, ValueComparer};
pub use dsl::yaml::{parse_query, parse_query_json, QueryDoc, SortKey, Stage};
pub use error::PlanError;
pub use explain::{explain, Explain};
pub use lower::{effective_config, lower};
pub use predicate::{CmpOp, Predicate, PredicateError};
pub use record::{records_from_json, Record};
