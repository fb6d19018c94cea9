//! Direct evaluation of an `Expr` against a record.
//!
//! Numeric comparisons promote Int to Decimal. Text supports only equality.
//! `null` compares equal only to a missing or null field, and ordering
//! against null is false.

use rust_decimal::Decimal;
use std::cmp::Ordering;

use crate::ast::{BinaryOp, Expr, Function, Literal};
use crate::error::EvalError;
use crate::value::{Record, Value};

/// Evaluate an expression that must produce a boolean.
pub fn eval_bool(expr: &Expr, record: &Record) -> Result<bool, EvalError> {
    match eval_value(expr, record)? {
        Value::Bool(b) => Ok(b),
        other => Err(EvalError::NotABool {
            got: other.type_name(),
        }),
    }
}

pub fn eval_value(expr: &Expr, record: &Record) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(lit) => Ok(literal_value(lit)),

        Expr::Member { name, .. } => Ok(record.get(name).clone()),

        Expr::Not(inner) => Ok(Value::Bool(!eval_bool(inner, record)?)),

        Expr::Call { function, arg } => match function {
            Function::IsNullOrWhiteSpace => match eval_value(arg, record)? {
                Value::Null => Ok(Value::Bool(true)),
                Value::Text(s) => Ok(Value::Bool(s.trim().is_empty())),
                other => Err(EvalError::BadArgument {
                    function: function.name(),
                    got: other.type_name(),
                }),
            },
        },

        Expr::Binary { op, left, right } => match op {
            BinaryOp::AndAlso => {
                // Short-circuit: left is false, skip right
                if !eval_bool(left, record)? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(eval_bool(right, record)?))
            }
            BinaryOp::OrElse => {
                // Short-circuit: left is true, skip right
                if eval_bool(left, record)? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(eval_bool(right, record)?))
            }
            _ => {
                let l = eval_value(left, record)?;
                let r = eval_value(right, record)?;
                compare_values(&l, *op, &r).map(Value::Bool)
            }
        },
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(i) => Value::Int(*i),
        Literal::Decimal(d) => Value::Decimal(*d),
        Literal::Text(s) => Value::Text(s.clone()),
    }
}

/// Compare two values with a comparison operator.
pub fn compare_values(left: &Value, op: BinaryOp, right: &Value) -> Result<bool, EvalError> {
    let mismatch = || EvalError::TypeMismatch {
        op: op.symbol().to_string(),
        left: left.type_name(),
        right: right.type_name(),
    };

    let ordering = match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Int(l), Value::Int(r)) => Some(l.cmp(r)),
        (Value::Decimal(l), Value::Decimal(r)) => Some(l.cmp(r)),
        (Value::Int(l), Value::Decimal(r)) => Some(Decimal::from(*l).cmp(r)),
        (Value::Decimal(l), Value::Int(r)) => Some(l.cmp(&Decimal::from(*r))),
        (Value::Bool(l), Value::Bool(r)) => {
            if !is_equality(op) {
                return Err(mismatch());
            }
            Some(l.cmp(r))
        }
        (Value::Text(l), Value::Text(r)) => {
            if !is_equality(op) {
                return Err(mismatch());
            }
            Some(l.cmp(r))
        }
        _ => return Err(mismatch()),
    };

    let result = match (op, ordering) {
        (BinaryOp::Equal, ord) => ord == Some(Ordering::Equal),
        (BinaryOp::NotEqual, ord) => ord != Some(Ordering::Equal),
        // Ordering against null is always false
        (_, None) => false,
        (BinaryOp::LessThan, Some(ord)) => ord == Ordering::Less,
        (BinaryOp::LessThanOrEqual, Some(ord)) => ord != Ordering::Greater,
        (BinaryOp::GreaterThan, Some(ord)) => ord == Ordering::Greater,
        (BinaryOp::GreaterThanOrEqual, Some(ord)) => ord != Ordering::Less,
        (BinaryOp::AndAlso | BinaryOp::OrElse, _) => return Err(mismatch()),
    };
    Ok(result)
}

fn is_equality(op: BinaryOp) -> bool {
    matches!(op, BinaryOp::Equal | BinaryOp::NotEqual)
}
