//! Minimal YAML/JSON → `QueryDoc` parser for *linear* record pipelines.
//!
//! Example:
//! ```yaml
//! config: { string_comparer: case_insensitive }
//! steps:
//!   - op: filter
//!     expr: "age >= 18"
//!   - op: order_by
//!     keys:
//!       - { field: last_name }
//!       - { field: age, descending: true }
//!   - op: select
//!     fields: [last_name, age]
//!   - op: take
//!     count: 10
//! ```
//!
//! Stage fields are optional at the parse level; lowering reports a missing
//! required field as `MissingArgument`.

use serde::{Deserialize, Serialize};

use lazyseq_core::hash::{hash_serde, Hash256};

use crate::config::{QueryConfig, StringComparer};
use crate::error::PlanError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<QueryConfig>,
    pub steps: Vec<Stage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op")]
pub enum Stage {
    Filter {
        #[serde(default)]
        expr: Option<String>,
    },

    Select {
        #[serde(default)]
        fields: Option<Vec<String>>,
    },

    /// Whole-record distinct, or distinct on `fields` when given.
    Distinct {
        #[serde(default)]
        fields: Option<Vec<String>>,
    },

    OrderBy {
        #[serde(default)]
        keys: Option<Vec<SortKey>>,
    },

    Take {
        #[serde(default)]
        count: Option<i64>,
    },

    Skip {
        #[serde(default)]
        count: Option<i64>,
    },

    /// Group by `field` and emit `{key, count}` per group.
    GroupCount {
        #[serde(default)]
        field: Option<String>,
    },

    Reverse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub descending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparer: Option<StringComparer>,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Filter { .. } => "filter",
            Stage::Select { .. } => "select",
            Stage::Distinct { .. } => "distinct",
            Stage::OrderBy { .. } => "order_by",
            Stage::Take { .. } => "take",
            Stage::Skip { .. } => "skip",
            Stage::GroupCount { .. } => "group_count",
            Stage::Reverse => "reverse",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn opt<T: std::fmt::Debug>(v: &Option<T>) -> String {
            v.as_ref().map_or_else(|| "<missing>".to_string(), |v| format!("{v:?}"))
        }
        match self {
            Stage::Filter { expr } => write!(f, "filter {}", opt(expr)),
            Stage::Select { fields } => write!(f, "select {}", opt(fields)),
            Stage::Distinct { fields: None } => write!(f, "distinct (whole record)"),
            Stage::Distinct { fields } => write!(f, "distinct on {}", opt(fields)),
            Stage::OrderBy { keys: Some(keys) } => {
                write!(f, "order_by")?;
                for (i, k) in keys.iter().enumerate() {
                    let sep = if i == 0 { " " } else { ", then " };
                    let dir = if k.descending { "desc" } else { "asc" };
                    write!(f, "{sep}{} {dir}", k.field)?;
                    if let Some(c) = k.comparer {
                        write!(f, " ({c:?})")?;
                    }
                }
                Ok(())
            }
            Stage::OrderBy { keys: None } => write!(f, "order_by <missing>"),
            Stage::Take { count } => write!(f, "take {}", opt(count)),
            Stage::Skip { count } => write!(f, "skip {}", opt(count)),
            Stage::GroupCount { field } => write!(f, "group_count by {}", opt(field)),
            Stage::Reverse => write!(f, "reverse"),
        }
    }
}

impl QueryDoc {
    /// Stable identity of the document: blake3 over its canonical JSON.
    pub fn fingerprint(&self) -> Result<Hash256, PlanError> {
        Ok(hash_serde(self)?)
    }
}

/// Parse a YAML query document (JSON is accepted too, being valid YAML).
pub fn parse_query(src: &str) -> Result<QueryDoc, PlanError> {
    let doc: QueryDoc = serde_yaml::from_str(src)?;
    if doc.steps.is_empty() {
        return Err(PlanError::Invalid("query has no steps".into()));
    }
    Ok(doc)
}

/// Parse a strict JSON query document.
pub fn parse_query_json(src: &str) -> Result<QueryDoc, PlanError> {
    let doc: QueryDoc = serde_json::from_str(src)?;
    if doc.steps.is_empty() {
        return Err(PlanError::Invalid("query has no steps".into()));
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
config: { string_comparer: case_insensitive, max_output_rows: 100 }
steps:
  - op: filter
    expr: "age >= 18"
  - op: order_by
    keys:
      - { field: last_name, comparer: ordinal }
      - { field: age, descending: true }
  - op: distinct
  - op: take
    count: 10
  - op: reverse
"#;

    #[test]
    fn parses_linear_pipeline() {
        let doc = parse_query(DOC).unwrap();
        assert_eq!(doc.steps.len(), 5);
        assert_eq!(
            doc.config.as_ref().and_then(|c| c.string_comparer),
            Some(StringComparer::CaseInsensitive)
        );
        assert_eq!(
            doc.steps[0],
            Stage::Filter {
                expr: Some("age >= 18".into())
            }
        );
        assert_eq!(doc.steps[2], Stage::Distinct { fields: None });
        assert_eq!(doc.steps[4], Stage::Reverse);
    }

    #[test]
    fn yaml_and_json_forms_share_a_fingerprint() {
        let yaml = parse_query(DOC).unwrap();
        let json = serde_json::to_string(&yaml).unwrap();
        let reparsed = parse_query_json(&json).unwrap();
        assert_eq!(yaml, reparsed);
        assert_eq!(yaml.fingerprint().unwrap(), reparsed.fingerprint().unwrap());
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let a = parse_query("steps: [ { op: take, count: 1 } ]").unwrap();
        let b = parse_query("steps: [ { op: take, count: 2 } ]").unwrap();
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn rejects_unknown_ops_and_empty_documents() {
        assert!(matches!(
            parse_query("steps: [ { op: explode } ]"),
            Err(PlanError::Yaml(_))
        ));
        assert!(matches!(
            parse_query("steps: []"),
            Err(PlanError::Invalid(_))
        ));
    }

    #[test]
    fn display_describes_stages() {
        let doc = parse_query(DOC).unwrap();
        assert_eq!(
            doc.steps[1].to_string(),
            "order_by last_name asc (Ordinal), then age desc"
        );
        assert_eq!(Stage::Take { count: None }.to_string(), "take <missing>");
    }
}
