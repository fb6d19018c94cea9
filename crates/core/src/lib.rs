//! nearmiss core -- the predicate language.
//!
//! Lexer, parser and printer for boolean rules over flat records, the
//! record/value model, record type descriptors, and the default expression
//! compiler that turns rule text back into something callable.

pub mod ast;
pub mod compile;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod schema;
pub mod value;

pub use ast::{BinaryOp, Expr, Function, Literal, Predicate};
pub use compile::{CompiledPredicate, ExpressionCompiler, TextCompiler};
pub use error::{CompileError, EvalError, RecordError, SyntaxError};
pub use render::render;
pub use schema::{FieldDecl, FieldType, RecordType, Schema};
pub use value::{Record, Value};
