use nearmiss_core::{CompileError, EvalError};

/// Errors surfaced by decomposition and inference.
///
/// None of these is ever folded into a failing condition: a `false` in a
/// report always means the condition was evaluated and did not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferError {
    /// The predicate's shape cannot be decomposed (e.g. its root is not a
    /// binary node).
    #[error("malformed predicate: {message}")]
    MalformedPredicate { message: String },

    /// Parenthesis repair could not make the fragment compile.
    #[error("could not repair fragment '{fragment}' after {attempts} deletions")]
    RepairExhausted { fragment: String, attempts: usize },

    /// No branch was available to select from.
    #[error("predicate produced no branches to score")]
    EmptyBranchSet,

    /// The fragment compiled syntactically but was rejected for another
    /// reason (e.g. unknown identifier). Not retried.
    #[error("fragment '{fragment}' failed to compile: {source}")]
    Fragment {
        fragment: String,
        #[source]
        source: CompileError,
    },

    /// The expression compiled but could not be evaluated against the record.
    #[error("evaluating '{expression}' failed: {source}")]
    Evaluation {
        expression: String,
        #[source]
        source: EvalError,
    },
}
