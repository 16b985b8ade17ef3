//! Simple predicates of the form `field OP literal`, OP ∈ {==, !=, <, <=, >, >=}.
//!
//! Parsing happens when a query is lowered; evaluation happens per record, so
//! literal conversion failures surface at the pull that reaches the record.

use std::cmp::Ordering;

use thiserror::Error;

use lazyseq_core::comparer::{Comparer, EqualityComparer};
use lazyseq_core::value::Value;
use lazyseq_core::SeqError;

use crate::config::{StringComparer, ValueComparer};
use crate::error::PlanError;
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    fn holds(self, ord: Ordering) -> bool {
        match self {
            CmpOp::Eq => ord.is_eq(),
            CmpOp::Ne => ord.is_ne(),
            CmpOp::Lt => ord.is_lt(),
            CmpOp::Le => ord.is_le(),
            CmpOp::Gt => ord.is_gt(),
            CmpOp::Ge => ord.is_ge(),
        }
    }
}

/// Per-record evaluation failure.
#[derive(Debug, Error)]
pub enum PredicateError {
    #[error("cannot parse '{literal}' as {ty} for field '{field}'")]
    Literal {
        field: String,
        literal: String,
        ty: &'static str,
    },

    #[error("unsupported op '{op}' for {ty} field '{field}'")]
    Op {
        field: String,
        op: &'static str,
        ty: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: String,
    pub op: CmpOp,
    pub literal: String,
}

impl Predicate {
    /// Parse a simple predicate like "age > 18" or "name == Alice".
    pub fn parse(expr: &str) -> Result<Predicate, PlanError> {
        // Two-character operators first so "<=" is not read as "<".
        let ops = [
            ("==", CmpOp::Eq),
            ("!=", CmpOp::Ne),
            ("<=", CmpOp::Le),
            (">=", CmpOp::Ge),
            ("<", CmpOp::Lt),
            (">", CmpOp::Gt),
        ];

        for (symbol, op) in ops {
            if let Some(pos) = expr.find(symbol) {
                let field = expr[..pos].trim().to_string();
                let literal = unquote(expr[pos + symbol.len()..].trim()).to_string();
                if field.is_empty() {
                    return Err(PlanError::Invalid(format!("predicate without field: {expr}")));
                }
                return Ok(Predicate { field, op, literal });
            }
        }

        Err(PlanError::Invalid(format!("unparseable predicate: {expr}")))
    }

    /// Evaluate against one record. Missing fields and nulls never match.
    pub fn eval(&self, record: &Record, strings: StringComparer) -> Result<bool, SeqError> {
        let value = match record.get(&self.field) {
            None | Some(Value::Null) => return Ok(false),
            Some(v) => v,
        };
        let literal = self.literal_as(value)?;
        let cmp = ValueComparer(strings);
        match (self.op, value) {
            (CmpOp::Eq, _) => Ok(cmp.equals(value, &literal)),
            (CmpOp::Ne, _) => Ok(!cmp.equals(value, &literal)),
            (_, Value::Bool(_)) | (_, Value::Bin(_)) => Err(SeqError::custom(PredicateError::Op {
                field: self.field.clone(),
                op: self.op.symbol(),
                ty: value.type_name(),
            })),
            (op, _) => Ok(op.holds(cmp.compare(value, &literal))),
        }
    }

    /// Convert the literal to the runtime type of `value`.
    fn literal_as(&self, value: &Value) -> Result<Value, SeqError> {
        let lit = self.literal.as_str();
        let parsed = match value {
            Value::Bool(_) => lit.parse::<bool>().ok().map(Value::Bool),
            Value::I32(_) => lit.parse::<i32>().ok().map(Value::I32),
            Value::I64(_) => lit.parse::<i64>().ok().map(Value::I64),
            Value::F64(_) => lit.parse::<f64>().ok().map(Value::F64),
            Value::Str(_) => Some(Value::Str(lit.to_string())),
            Value::Null | Value::Bin(_) => None,
        };
        parsed.ok_or_else(|| {
            SeqError::custom(PredicateError::Literal {
                field: self.field.clone(),
                literal: self.literal.clone(),
                ty: value.type_name(),
            })
        })
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.field, self.op.symbol(), self.literal)
    }
}

fn unquote(s: &str) -> &str {
    for q in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(q).and_then(|rest| rest.strip_suffix(q)) {
            return inner;
        }
    }
    s
}
