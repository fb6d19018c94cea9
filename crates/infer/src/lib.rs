//! nearmiss inference -- for a record that fails an OR-of-ANDs rule, find
//! the OR branch it came closest to satisfying and the conditions that
//! still fail.
//!
//! Pipeline: [`PredicateTree`] → [`decompose`] into branches → per record,
//! [`split_conditions`] → [`FragmentEvaluator`] (parenthesis repair and
//! evaluation) → [`score_branch`] → [`InferenceEngine`] picks the branch
//! with the fewest failures and emits an [`InferenceReport`].

pub mod decompose;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod repair;
pub mod score;
pub mod split;
pub mod tree;

pub use decompose::{decompose, Branch};
pub use engine::{
    EngineOptions, InferenceEngine, InferenceReport, InferenceResult, DEFAULT_PARALLEL_THRESHOLD,
};
pub use error::InferError;
pub use repair::{FragmentEvaluator, RepairOutcome};
pub use score::{score_branch, ConditionOutcome, ScoredBranch};
pub use split::{split_conditions, Fragment};
pub use tree::{PredicateTree, TreeNode};

use nearmiss_core::{Predicate, Record, RecordType, Schema};

/// Branches of `predicate`, rightmost OR operand first.
pub fn branches(predicate: &Predicate) -> Result<Vec<Branch>, InferError> {
    let tree = PredicateTree::new(predicate)?;
    Ok(decompose(&tree))
}

/// Score one record, whether or not it satisfies the predicate.
pub fn infer<S: RecordType>(
    predicate: &Predicate,
    record_type: S,
    record: &Record,
) -> Result<InferenceReport, InferError> {
    InferenceEngine::new(predicate.clone(), record_type)?.infer(record)
}

/// One report per record that fails `predicate`, in input order. The
/// record type is derived from the records themselves.
pub fn infer_all(predicate: &Predicate, records: &[Record]) -> Result<InferenceResult, InferError> {
    InferenceEngine::new(predicate.clone(), Schema::infer(records))?.infer_all(records)
}
