//! Printed form of predicates.
//!
//! Every binary node prints fully parenthesized as `(left op right)`, so the
//! rendering of a connective is always `"(" + left + " " + op + " " + right + ")"`.
//! Branch decomposition and condition splitting work on this text.

use std::fmt;

use crate::ast::{Expr, Literal, Predicate};

pub fn render(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Binary { op, left, right } => {
            out.push('(');
            write_expr(out, left);
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            write_expr(out, right);
            out.push(')');
        }
        Expr::Not(inner) => {
            out.push_str("Not(");
            write_expr(out, inner);
            out.push(')');
        }
        Expr::Member { param, name } => {
            if let Some(p) = param {
                out.push_str(p);
                out.push('.');
            }
            out.push_str(name);
        }
        Expr::Literal(lit) => write_literal(out, lit),
        Expr::Call { function, arg } => {
            out.push_str(function.name());
            out.push('(');
            write_expr(out, arg);
            out.push(')');
        }
    }
}

fn write_literal(out: &mut String, lit: &Literal) {
    match lit {
        Literal::Null => out.push_str("null"),
        Literal::Bool(true) => out.push_str("True"),
        Literal::Bool(false) => out.push_str("False"),
        Literal::Int(n) => out.push_str(&n.to_string()),
        Literal::Decimal(d) => out.push_str(&d.to_string()),
        Literal::Text(s) => {
            out.push('"');
            for c in s.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    other => out.push(other),
                }
            }
            out.push('"');
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parameters.as_slice() {
            [] => {}
            [single] => write!(f, "{} => ", single)?,
            many => write!(f, "({}) => ", many.join(", "))?,
        }
        f.write_str(&render(&self.body))
    }
}
