//! Planner configuration that the CLI and query documents can serialize/deserialize.
//!
//! Precedence: environment < query document `config:` block < CLI flags.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use lazyseq_core::comparer::{CaseInsensitive, Comparer, EqRef, EqualityComparer, OrdRef};
use lazyseq_core::value::Value;

/// How string values are compared by keyed and ordering stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringComparer {
    #[default]
    Ordinal,
    #[serde(alias = "case-insensitive")]
    CaseInsensitive,
}

impl StringComparer {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ordinal" => Some(StringComparer::Ordinal),
            "case_insensitive" | "case-insensitive" => Some(StringComparer::CaseInsensitive),
            _ => None,
        }
    }

    pub fn value_eq(self) -> EqRef<Value> {
        Arc::new(ValueComparer(self))
    }

    pub fn value_ord(self) -> OrdRef<Value> {
        Arc::new(ValueComparer(self))
    }
}

/// `Value` comparer whose string handling follows a [`StringComparer`];
/// non-string values use `Value`'s own total order.
#[derive(Debug, Clone, Copy)]
pub struct ValueComparer(pub StringComparer);

impl EqualityComparer<Value> for ValueComparer {
    fn equals(&self, a: &Value, b: &Value) -> bool {
        match (self.0, a, b) {
            (StringComparer::CaseInsensitive, Value::Str(x), Value::Str(y)) => {
                EqualityComparer::<str>::equals(&CaseInsensitive, x, y)
            }
            _ => a == b,
        }
    }

    fn hash(&self, value: &Value) -> u64 {
        match (self.0, value) {
            (StringComparer::CaseInsensitive, Value::Str(s)) => {
                EqualityComparer::<str>::hash(&CaseInsensitive, s)
            }
            _ => {
                let mut h = std::collections::hash_map::DefaultHasher::new();
                value.hash(&mut h);
                h.finish()
            }
        }
    }
}

impl Comparer<Value> for ValueComparer {
    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match (self.0, a, b) {
            (StringComparer::CaseInsensitive, Value::Str(x), Value::Str(y)) => {
                Comparer::<str>::compare(&CaseInsensitive, x, y)
            }
            _ => mixed_numeric(a, b).unwrap_or_else(|| a.cmp(b)),
        }
    }
}

/// Order numbers of different widths by exact magnitude rather than by type.
/// Equal magnitudes fall back to type rank, and NaN sorts above every number.
fn mixed_numeric(a: &Value, b: &Value) -> Option<Ordering> {
    if std::mem::discriminant(a) == std::mem::discriminant(b) {
        return None;
    }
    let int = |v: &Value| match v {
        Value::I32(i) => Some(i64::from(*i)),
        Value::I64(i) => Some(*i),
        _ => None,
    };
    let ord = match (a, b) {
        (Value::F64(x), other) => int_float_cmp(int(other)?, *x).reverse(),
        (other, Value::F64(y)) => int_float_cmp(int(other)?, *y),
        _ => int(a)?.cmp(&int(b)?),
    };
    Some(ord.then_with(|| a.cmp(b)))
}

/// Exact comparison of an integer against a float, without rounding either.
fn int_float_cmp(i: i64, f: f64) -> Ordering {
    // 2^63: the first float above the i64 range.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() || f >= LIMIT {
        return Ordering::Less;
    }
    if f < -LIMIT {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&f).unwrap_or(Ordering::Equal),
        other => other,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Default string comparer for stages that do not name one.
    pub string_comparer: StringComparer,

    /// Cap on output rows, applied as a trailing `take`.
    pub max_output_rows: Option<i32>,
}

/// Per-document overrides (`config:` block); absent fields keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub string_comparer: Option<StringComparer>,
    pub max_output_rows: Option<i32>,
}

impl PlannerConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `LAZYSEQ_STRING_COMPARER`: `ordinal` | `case_insensitive`
    /// - `LAZYSEQ_MAX_OUTPUT_ROWS`: output row cap
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`PlannerConfig::from_env`], reading variables through `var`.
    pub fn from_lookup<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(s) = var("LAZYSEQ_STRING_COMPARER") {
            if let Some(c) = StringComparer::parse(&s) {
                cfg.string_comparer = c;
            }
        }

        if let Some(s) = var("LAZYSEQ_MAX_OUTPUT_ROWS") {
            if let Ok(v) = s.trim().parse::<i32>() {
                cfg.max_output_rows = Some(v);
            }
        }

        cfg
    }

    pub fn apply(&mut self, doc: &QueryConfig) {
        if let Some(c) = doc.string_comparer {
            self.string_comparer = c;
        }
        if let Some(n) = doc.max_output_rows {
            self.max_output_rows = Some(n);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn env_values_are_parsed_and_bad_ones_ignored() {
        let env: HashMap<&str, &str> = [
            ("LAZYSEQ_STRING_COMPARER", "Case-Insensitive"),
            ("LAZYSEQ_MAX_OUTPUT_ROWS", "nope"),
        ]
        .into_iter()
        .collect();
        let cfg = PlannerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.string_comparer, StringComparer::CaseInsensitive);
        assert_eq!(cfg.max_output_rows, None);
    }

    #[test]
    fn document_overrides_env() {
        let mut cfg = PlannerConfig {
            string_comparer: StringComparer::CaseInsensitive,
            max_output_rows: Some(5),
        };
        cfg.apply(&QueryConfig {
            max_output_rows: Some(2),
            ..Default::default()
        });
        assert_eq!(cfg.string_comparer, StringComparer::CaseInsensitive);
        assert_eq!(cfg.max_output_rows, Some(2));
    }

    #[test]
    fn value_comparer_folds_only_strings() {
        let ci = ValueComparer(StringComparer::CaseInsensitive);
        let (a, b) = (Value::from("Hedlund"), Value::from("HEDLUND"));
        assert!(EqualityComparer::equals(&ci, &a, &b));
        assert_eq!(EqualityComparer::hash(&ci, &a), EqualityComparer::hash(&ci, &b));
        assert_eq!(Comparer::compare(&ci, &a, &b), Ordering::Equal);
        assert!(!EqualityComparer::equals(&ci, &Value::I32(1), &Value::I64(1)));

        let ordinal = ValueComparer(StringComparer::Ordinal);
        assert!(!EqualityComparer::equals(&ordinal, &a, &b));
    }

    #[test]
    fn mixed_width_numbers_order_by_magnitude() {
        let ord = ValueComparer(StringComparer::Ordinal);
        let big_negative = Value::I64(-3_000_000_000);
        assert_eq!(Comparer::compare(&ord, &big_negative, &Value::I32(5)), Ordering::Less);
        assert_eq!(Comparer::compare(&ord, &Value::F64(2.5), &Value::I32(3)), Ordering::Less);
        assert_eq!(Comparer::compare(&ord, &Value::Null, &Value::I32(3)), Ordering::Less);
    }

    #[test]
    fn integers_beyond_float_precision_compare_exactly() {
        let ord = ValueComparer(StringComparer::Ordinal);
        let cmp = |a: &Value, b: &Value| Comparer::compare(&ord, a, b);
        let two_53 = 1i64 << 53;
        let above = Value::I64(two_53 + 1);
        let float = Value::F64(two_53 as f64);
        let exact = Value::I64(two_53);

        assert_eq!(cmp(&above, &float), Ordering::Greater);
        assert_eq!(cmp(&float, &above), Ordering::Less);
        assert_eq!(cmp(&float, &exact), Ordering::Greater);
        assert_eq!(cmp(&exact, &float), Ordering::Less);
        assert_eq!(cmp(&exact, &above), Ordering::Less);

        let mut values = vec![above.clone(), float.clone(), exact.clone()];
        values.sort_by(|a, b| cmp(a, b));
        assert_eq!(values, vec![exact, float, above]);
    }

    #[test]
    fn float_edges_against_integers() {
        let ord = ValueComparer(StringComparer::Ordinal);
        let cmp = |a: Value, b: Value| Comparer::compare(&ord, &a, &b);
        assert_eq!(cmp(Value::F64(f64::NAN), Value::I64(i64::MAX)), Ordering::Greater);
        assert_eq!(cmp(Value::F64(f64::INFINITY), Value::I64(i64::MAX)), Ordering::Greater);
        assert_eq!(cmp(Value::F64(f64::NEG_INFINITY), Value::I64(i64::MIN)), Ordering::Less);
        assert_eq!(cmp(Value::F64(9.3e18), Value::I64(i64::MAX)), Ordering::Greater);
        assert_eq!(cmp(Value::F64(-9.3e18), Value::I64(i64::MIN)), Ordering::Less);
        assert_eq!(cmp(Value::F64(2.5), Value::I32(2)), Ordering::Greater);
        assert_eq!(cmp(Value::F64(-2.5), Value::I32(-2)), Ordering::Less);
        assert_eq!(cmp(Value::F64(-2.5), Value::I32(-3)), Ordering::Greater);
    }
}
