//! `Record`: an ordered map of field name → [`Value`], the element type of
//! planned queries.

use lazyseq_core::value::Value;

use crate::error::PlanError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set `name`, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Value of `name`, `Null` when absent.
    pub fn value(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or(Value::Null)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Keep only `names`, in the order given; missing fields become `Null`.
    pub fn project(&self, names: &[String]) -> Record {
        Record {
            fields: names.iter().map(|n| (n.clone(), self.value(n))).collect(),
        }
    }

    /// Build from a JSON object of scalars.
    pub fn from_json(json: &serde_json::Value) -> Result<Record, PlanError> {
        let obj = json
            .as_object()
            .ok_or_else(|| PlanError::Invalid(format!("expected a JSON object, got {json}")))?;
        let mut rec = Record::new();
        for (name, v) in obj {
            let value = Value::from_json(v).ok_or_else(|| {
                PlanError::Invalid(format!("field '{name}' is not a scalar"))
            })?;
            rec.fields.push((name.clone(), value));
        }
        Ok(rec)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let obj = self
            .fields
            .iter()
            .map(|(n, v)| (n.clone(), v.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(obj)
    }
}

/// Parse a JSON array of objects (or JSON lines) into records.
pub fn records_from_json(src: &str) -> Result<Vec<Record>, PlanError> {
    let trimmed = src.trim_start();
    if trimmed.starts_with('[') {
        let rows: Vec<serde_json::Value> = serde_json::from_str(trimmed)?;
        return rows.iter().map(Record::from_json).collect();
    }
    trimmed
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Record::from_json(&serde_json::from_str(line)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_field_order() {
        let mut rec = Record::new().with("b", 1).with("a", "x");
        rec.insert("b", 2);
        assert_eq!(rec.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(rec.get("b"), Some(&Value::I32(2)));
        assert_eq!(rec.value("missing"), Value::Null);
    }

    #[test]
    fn projection_fills_missing_with_null() {
        let rec = Record::new().with("a", 1).with("b", 2);
        let p = rec.project(&["b".to_string(), "z".to_string()]);
        assert_eq!(p, Record::new().with("b", 2).with("z", Value::Null));
    }

    #[test]
    fn json_array_and_lines() {
        let arr = records_from_json(r#"[{"a": 1}, {"a": "two"}]"#).unwrap();
        let lines = records_from_json("{\"a\": 1}\n\n{\"a\": \"two\"}\n").unwrap();
        assert_eq!(arr, lines);
        assert_eq!(arr[1].get("a"), Some(&Value::from("two")));
        assert!(records_from_json(r#"[{"a": [1]}]"#).is_err());
        assert!(records_from_json("[1]").is_err());
    }
}
