//! Expression compiler: text in, callable predicate over one record out.

use crate::ast::Expr;
use crate::error::{CompileError, EvalError};
use crate::eval::eval_bool;
use crate::parser::parse_expr;
use crate::schema::RecordType;
use crate::value::Record;

/// Turns boolean expression text into a predicate bound to a record type.
///
/// Implementations must report balance and other grammar problems as
/// `CompileError::Syntax` and keep every other failure distinct from it.
pub trait ExpressionCompiler: Send + Sync {
    fn compile(
        &self,
        text: &str,
        record_type: &dyn RecordType,
    ) -> Result<CompiledPredicate, CompileError>;
}

/// The default compiler, backed by this crate's parser and evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCompiler;

impl ExpressionCompiler for TextCompiler {
    fn compile(
        &self,
        text: &str,
        record_type: &dyn RecordType,
    ) -> Result<CompiledPredicate, CompileError> {
        let expr = parse_expr(text)?;
        if let Some(unknown) = expr
            .members()
            .into_iter()
            .find(|name| !record_type.has_property(name))
        {
            return Err(CompileError::UnknownProperty {
                name: unknown.to_string(),
            });
        }
        Ok(CompiledPredicate::new(expr))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPredicate {
    expr: Expr,
}

impl CompiledPredicate {
    pub fn new(expr: Expr) -> Self {
        CompiledPredicate { expr }
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn evaluate(&self, record: &Record) -> Result<bool, EvalError> {
        eval_bool(&self.expr, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, Schema};
    use crate::value::Value;

    fn schema() -> Schema {
        Schema::new()
            .field("Age", FieldType::Int)
            .field("Income", FieldType::Int)
    }

    #[test]
    fn compiles_and_evaluates() {
        let p = TextCompiler.compile("(Income > 1000)", &schema()).unwrap();
        let r = Record::new().with("Income", Value::Int(1200));
        assert!(p.evaluate(&r).unwrap());
    }

    #[test]
    fn unbalanced_text_is_a_syntax_error() {
        let err = TextCompiler.compile("(Income > 1000", &schema()).unwrap_err();
        assert!(err.is_syntax());
    }

    #[test]
    fn unknown_property_is_not_a_syntax_error() {
        let err = TextCompiler.compile("Salary > 1000", &schema()).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnknownProperty {
                name: "Salary".into()
            }
        );
        assert!(!err.is_syntax());
    }
}
