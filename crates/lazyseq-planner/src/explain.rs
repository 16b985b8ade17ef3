//! EXPLAIN: a printable summary of a query without touching any input.

use std::fmt;

use lazyseq_core::hash::Hash256;
use lazyseq_operators::Seq;

use crate::config::PlannerConfig;
use crate::dsl::yaml::QueryDoc;
use crate::error::PlanError;
use crate::lower::{effective_config, lower};
use crate::record::Record;

#[derive(Debug, Clone)]
pub struct Explain {
    pub fingerprint: Hash256,
    pub config: PlannerConfig,
    pub stages: Vec<String>,
    /// Name of the outermost operator after lowering.
    pub root_op: &'static str,
}

/// Validate `doc` against an empty source and describe it.
pub fn explain(doc: &QueryDoc, base: &PlannerConfig) -> Result<Explain, PlanError> {
    let config = effective_config(base, doc);
    let root = lower(doc, Seq::<Record>::empty(), &config)?;
    Ok(Explain {
        fingerprint: doc.fingerprint()?,
        stages: doc.steps.iter().map(ToString::to_string).collect(),
        root_op: root.op_name(),
        config,
    })
}

impl fmt::Display for Explain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Query Plan")?;
        writeln!(f, "==========")?;
        writeln!(f, "Fingerprint: {}", self.fingerprint.short())?;
        writeln!(f, "String comparer: {:?}", self.config.string_comparer)?;
        match self.config.max_output_rows {
            Some(cap) => writeln!(f, "Row cap: {cap}")?,
            None => writeln!(f, "Row cap: none")?,
        }
        writeln!(f)?;
        writeln!(f, "Stages:")?;
        for (i, stage) in self.stages.iter().enumerate() {
            writeln!(f, "  {}. {stage}", i + 1)?;
        }
        write!(f, "Root operator: {}", self.root_op)
    }
}
