use thiserror::Error;

/// A lexing or parsing failure. `position` is the character offset of the
/// offending token in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct SyntaxError {
    pub message: String,
    pub position: usize,
}

impl SyntaxError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            message: message.into(),
            position,
        }
    }
}

/// Errors produced when compiling expression text into a callable predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The text does not parse. Unbalanced parentheses end up here.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// The text parses but references a property the record type does not declare.
    #[error("unknown property: {name}")]
    UnknownProperty { name: String },
}

impl CompileError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, CompileError::Syntax(_))
    }
}

/// Errors raised while evaluating a compiled expression against a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Operands of a comparison have incompatible runtime types.
    #[error("cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        op: String,
        left: &'static str,
        right: &'static str,
    },

    /// A boolean position (connective operand, negation, whole predicate)
    /// produced a non-boolean value.
    #[error("expected Bool, got {got}")]
    NotABool { got: &'static str },

    /// A helper function received an argument of the wrong type.
    #[error("{function} expects Text, got {got}")]
    BadArgument {
        function: &'static str,
        got: &'static str,
    },
}

/// Errors converting external data (JSON, serde values) into records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record must be a JSON object, got {got}")]
    NotAnObject { got: &'static str },

    #[error("field '{field}' has unsupported value: {message}")]
    UnsupportedValue { field: String, message: String },

    #[error("record serialization failed: {0}")]
    Serialize(String),
}
