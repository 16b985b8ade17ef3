//! Lowering: `QueryDoc` → `Seq<Record>`.
//!
//! Every stage is validated here, synchronously, before any record is pulled.
//! The returned sequence is lazy; per-record faults (bad predicate literals)
//! surface during enumeration.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use lazyseq_core::comparer::{EqRef, EqualityComparer};
use lazyseq_core::SeqError;
use lazyseq_operators::{OrderedSeq, Seq};

use crate::config::{PlannerConfig, StringComparer, ValueComparer};
use crate::dsl::yaml::{QueryDoc, SortKey, Stage};
use crate::error::PlanError;
use crate::predicate::Predicate;
use crate::record::Record;

/// Config in effect for `doc`: `base` overridden by the document's block.
pub fn effective_config(base: &PlannerConfig, doc: &QueryDoc) -> PlannerConfig {
    let mut cfg = base.clone();
    if let Some(block) = &doc.config {
        cfg.apply(block);
    }
    cfg
}

/// Validate and lower `doc` over `source`. `config` is used as given; callers
/// resolve precedence beforehand (see [`effective_config`]).
pub fn lower(
    doc: &QueryDoc,
    source: Seq<Record>,
    config: &PlannerConfig,
) -> Result<Seq<Record>, PlanError> {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        query = %doc.fingerprint().map(|fp| fp.short()).unwrap_or_default(),
        stages = doc.steps.len(),
        "lowering query"
    );

    let mut seq = source;
    for stage in &doc.steps {
        seq = lower_stage(stage, seq, config)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(stage = %stage, op = seq.op_name(), "lowered stage");
    }

    if let Some(cap) = config.max_output_rows {
        seq = seq.take(cap)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(cap, "applied output row cap");
    }
    Ok(seq)
}

fn lower_stage(
    stage: &Stage,
    seq: Seq<Record>,
    config: &PlannerConfig,
) -> Result<Seq<Record>, PlanError> {
    let strings = config.string_comparer;
    Ok(match stage {
        Stage::Filter { expr } => {
            let expr = expr.as_deref().ok_or(SeqError::missing("expr"))?;
            let predicate = Predicate::parse(expr)?;
            seq.try_filter(move |r| predicate.eval(r, strings))
        }
        Stage::Select { fields } => {
            let fields = fields.clone().ok_or(SeqError::missing("fields"))?;
            if fields.is_empty() {
                return Err(PlanError::Invalid("select needs at least one field".into()));
            }
            seq.select(move |r| r.project(&fields))
        }
        Stage::Distinct { fields } => {
            let comparer: EqRef<Record> = Arc::new(RecordEq {
                fields: fields.clone(),
                strings,
            });
            seq.distinct_with(comparer)
        }
        Stage::OrderBy { keys } => {
            let keys = keys.as_deref().ok_or(SeqError::missing("keys"))?;
            lower_order_by(&seq, keys, strings)?.into_seq()
        }
        Stage::Take { count } => seq.take(count_arg(*count)?)?,
        Stage::Skip { count } => seq.skip(count_arg(*count)?)?,
        Stage::GroupCount { field } => {
            let field = field.clone().ok_or(SeqError::missing("field"))?;
            seq.group_by_with(move |r| r.value(&field), strings.value_eq())
                .select(|g| {
                    let count = i64::try_from(g.len()).unwrap_or(i64::MAX);
                    Record::new().with("key", g.key().clone()).with("count", count)
                })
        }
        Stage::Reverse => seq.reverse(),
    })
}

fn count_arg(count: Option<i64>) -> Result<i32, SeqError> {
    let count = count.ok_or(SeqError::missing("count"))?;
    i32::try_from(count).map_err(|_| SeqError::out_of_range("count", count))
}

fn lower_order_by(
    seq: &Seq<Record>,
    keys: &[SortKey],
    strings: StringComparer,
) -> Result<OrderedSeq<Record>, PlanError> {
    let (first, rest) = keys
        .split_first()
        .ok_or_else(|| PlanError::Invalid("order_by needs at least one key".into()))?;

    let tier = |key: &SortKey| {
        let field = key.field.clone();
        let comparer = key.comparer.unwrap_or(strings).value_ord();
        (move |r: &Record| r.value(&field), comparer)
    };

    let (selector, comparer) = tier(first);
    let mut ordered = if first.descending {
        seq.order_by_descending_with(selector, comparer)
    } else {
        seq.order_by_with(selector, comparer)
    };
    for key in rest {
        let (selector, comparer) = tier(key);
        ordered = if key.descending {
            ordered.then_by_descending_with(selector, comparer)
        } else {
            ordered.then_by_with(selector, comparer)
        };
    }
    Ok(ordered)
}

/// Record equality over all fields, or only over `fields` when given.
struct RecordEq {
    fields: Option<Vec<String>>,
    strings: StringComparer,
}

impl EqualityComparer<Record> for RecordEq {
    fn equals(&self, a: &Record, b: &Record) -> bool {
        let values = ValueComparer(self.strings);
        match &self.fields {
            Some(fields) => fields
                .iter()
                .all(|f| values.equals(&a.value(f), &b.value(f))),
            None => {
                a.len() == b.len()
                    && a.names().zip(b.names()).all(|(x, y)| x == y)
                    && a.names().all(|f| values.equals(&a.value(f), &b.value(f)))
            }
        }
    }

    fn hash(&self, record: &Record) -> u64 {
        let values = ValueComparer(self.strings);
        let mut h = std::collections::hash_map::DefaultHasher::new();
        match &self.fields {
            Some(fields) => {
                for f in fields {
                    values.hash(&record.value(f)).hash(&mut h);
                }
            }
            None => {
                for f in record.names() {
                    f.hash(&mut h);
                    values.hash(&record.value(f)).hash(&mut h);
                }
            }
        }
        h.finish()
    }
}

#[cfg(test)]
mod tests {
    use lazyseq_core::value::Value;

    use super::*;
    use crate::dsl::yaml::parse_query;

    fn people() -> Seq<Record> {
        let rows = [
            ("Hedlund", "Magnus", 40),
            ("Adams", "Terry", 25),
            ("Weiss", "Charlotte", 17),
            ("adams", "Ann", 31),
            ("Hedlund", "Lisa", 40),
        ];
        rows.into_iter()
            .map(|(last, first, age)| {
                Record::new()
                    .with("last", last)
                    .with("first", first)
                    .with("age", age)
            })
            .collect()
    }

    fn run(query: &str, config: &PlannerConfig) -> Result<Vec<Record>, PlanError> {
        let doc = parse_query(query)?;
        let cfg = effective_config(config, &doc);
        Ok(lower(&doc, people(), &cfg)?.to_vec()?)
    }

    fn column(rows: &[Record], field: &str) -> Vec<Value> {
        rows.iter().map(|r| r.value(field)).collect()
    }

    fn strs(items: &[&str]) -> Vec<Value> {
        items.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn filter_order_select() {
        let rows = run(
            r#"
steps:
  - { op: filter, expr: "age >= 18" }
  - op: order_by
    keys: [ { field: age, descending: true }, { field: first } ]
  - { op: select, fields: [first] }
"#,
            &PlannerConfig::default(),
        )
        .unwrap();
        assert_eq!(
            column(&rows, "first"),
            strs(&["Lisa", "Magnus", "Ann", "Terry"])
        );
        assert!(rows.iter().all(|r| r.len() == 1));
    }

    #[test]
    fn case_insensitive_grouping_from_document_config() {
        let query = r#"
config: { string_comparer: case_insensitive }
steps:
  - { op: group_count, field: last }
"#;
        let rows = run(query, &PlannerConfig::default()).unwrap();
        assert_eq!(
            column(&rows, "key"),
            strs(&["Hedlund", "Adams", "Weiss"])
        );
        assert_eq!(
            column(&rows, "count"),
            vec![Value::I64(2), Value::I64(2), Value::I64(1)]
        );
    }

    #[test]
    fn distinct_on_fields() {
        let rows = run(
            "steps: [ { op: distinct, fields: [last] }, { op: select, fields: [first] } ]",
            &PlannerConfig::default(),
        )
        .unwrap();
        assert_eq!(
            column(&rows, "first"),
            strs(&["Magnus", "Terry", "Charlotte", "Ann"])
        );
    }

    #[test]
    fn row_cap_applies_last() {
        let cfg = PlannerConfig {
            max_output_rows: Some(2),
            ..Default::default()
        };
        let rows = run("steps: [ { op: reverse } ]", &cfg).unwrap();
        assert_eq!(column(&rows, "first"), strs(&["Lisa", "Ann"]));
    }

    #[test]
    fn missing_fields_are_reported_at_lowering() {
        for (query, name) in [
            ("steps: [ { op: filter } ]", "expr"),
            ("steps: [ { op: select } ]", "fields"),
            ("steps: [ { op: order_by } ]", "keys"),
            ("steps: [ { op: take } ]", "count"),
            ("steps: [ { op: group_count } ]", "field"),
        ] {
            let doc = parse_query(query).unwrap();
            let err = lower(&doc, people(), &PlannerConfig::default()).unwrap_err();
            assert!(
                matches!(err.as_seq(), Some(SeqError::MissingArgument { name: n }) if *n == name),
                "{query}: {err}"
            );
        }
    }

    #[test]
    fn validation_never_touches_the_source() {
        let untouchable: Seq<Record> = Seq::from_fn(|| -> Vec<Record> {
            panic!("source enumerated during lowering")
        });
        let doc = parse_query(
            "steps: [ { op: order_by, keys: [ { field: a } ] }, { op: skip, count: -1 } ]",
        )
        .unwrap();
        let err = lower(&doc, untouchable, &PlannerConfig::default()).unwrap_err();
        assert!(err.as_seq().is_some_and(SeqError::is_out_of_range));
    }

    #[test]
    fn bad_literal_faults_during_enumeration() {
        let doc = parse_query("steps: [ { op: filter, expr: 'age > old' } ]").unwrap();
        let seq = lower(&doc, people(), &PlannerConfig::default()).unwrap();
        let err = seq.to_vec().unwrap_err();
        assert!(err.to_string().contains("cannot parse 'old'"));
    }
}
