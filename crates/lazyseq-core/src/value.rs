//! Dynamically typed element values.
//!
//! `Value` is the element type for sequences whose members are only known at
//! runtime (query records, heterogeneous inputs). [`FromValue`] is the runtime
//! "can this value be viewed as T" capability behind `cast` and `of_type`.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F64(_) => "f64",
            Value::Str(_) => "string",
            Value::Bin(_) => "bytes",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// View this value as `T`, if the value's runtime type allows it.
    pub fn view<T: FromValue>(&self) -> Option<T> {
        T::from_value(self)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Convert from a JSON scalar. Arrays and objects are rejected.
    pub fn from_json(json: &serde_json::Value) -> Option<Value> {
        use serde_json::Value as J;
        Some(match json {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(*b),
            J::Number(n) => {
                if let Some(i) = n.as_i64() {
                    match i32::try_from(i) {
                        Ok(small) => Value::I32(small),
                        Err(_) => Value::I64(i),
                    }
                } else {
                    Value::F64(n.as_f64()?)
                }
            }
            J::String(s) => Value::Str(s.clone()),
            J::Array(_) | J::Object(_) => return None,
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;
        match self {
            Value::Null => J::Null,
            Value::Bool(b) => J::Bool(*b),
            Value::I32(i) => J::from(*i),
            Value::I64(i) => J::from(*i),
            Value::F64(f) => serde_json::Number::from_f64(*f)
                .map(J::Number)
                .unwrap_or(J::Null),
            Value::Str(s) => J::String(s.clone()),
            Value::Bin(b) => J::Array(b.iter().map(|x| J::from(*x)).collect()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

// Equality, hashing and ordering are total and mutually consistent: NaN equals
// NaN, -0.0 equals 0.0, and values of different types order by type rank.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(x), Bool(y)) => x.cmp(y),
            (I32(x), I32(y)) => x.cmp(y),
            (I64(x), I64(y)) => x.cmp(y),
            (F64(x), F64(y)) => float_cmp(*x, *y),
            (Str(x), Str(y)) => x.cmp(y),
            (Bin(x), Bin(y)) => x.cmp(y),
            _ => type_rank(self).cmp(&type_rank(other)),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        type_rank(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::I32(i) => i.hash(state),
            Value::I64(i) => i.hash(state),
            Value::F64(f) => canonical_bits(*f).hash(state),
            Value::Str(s) => s.hash(state),
            Value::Bin(b) => b.hash(state),
        }
    }
}

/// NaN sorts after every number and equals itself.
fn float_cmp(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}

fn canonical_bits(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else if f == 0.0 {
        0.0f64.to_bits()
    } else {
        f.to_bits()
    }
}

/// Null sorts first.
fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::I32(_) => 2,
        Value::I64(_) => 3,
        Value::F64(_) => 4,
        Value::Str(_) => 5,
        Value::Bin(_) => 6,
    }
}

/// Runtime type capability: can a `Value` be viewed as `Self`?
pub trait FromValue: Sized {
    /// Name used in cast failures.
    const TYPE_NAME: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    const TYPE_NAME: &'static str = "i32";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::I32(i) => Some(*i),
            _ => None,
        }
    }
}

/// Widening view: both integer widths are viewable as `i64`.
impl FromValue for i64 {
    const TYPE_NAME: &'static str = "i64";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::I32(i) => Some(i64::from(*i)),
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for Vec<u8> {
    const TYPE_NAME: &'static str = "bytes";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bin(b) => Some(b.clone()),
            _ => None,
        }
    }
}

/// Nullable view: `Null` is viewable as `None`.
impl<T: FromValue> FromValue for Option<T> {
    const TYPE_NAME: &'static str = "option";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}
