//! Inference orchestration: best branch per record, and the report.
//!
//! The engine is built once per predicate. Each record is scored against
//! every branch independently, so batch inference fans records out over
//! rayon once the batch is large enough; results keep input order.

use nearmiss_core::{
    eval::eval_bool, render, ExpressionCompiler, Predicate, Record, RecordType, Schema,
    TextCompiler,
};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::decompose::{decompose, Branch};
use crate::error::InferError;
use crate::repair::FragmentEvaluator;
use crate::score::{score_branch, ScoredBranch};
use crate::tree::PredicateTree;

/// Batches at or above this many failing records are scored in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub parallel_threshold: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// What a failing record would need to satisfy the closest branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InferenceReport {
    pub id: usize,
    pub data: Record,
    /// Pass/fail per scored condition of the winning branch.
    pub ratings: Vec<bool>,
    pub properties_to_change: Vec<String>,
    /// Passing share of `ratings`: `0`, or two decimals (`0.67`).
    pub pass_ratio: String,
    /// Passing share as a truncated integer percentage (`66%`).
    pub hits_percentage: String,
    /// Failing conditions left in the winning branch.
    pub errors: usize,
    /// Printed form of the winning branch.
    pub branch: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InferenceResult {
    pub inferences: Vec<InferenceReport>,
}

pub fn format_pass_ratio(passed: usize, total: usize) -> String {
    if passed == 0 || total == 0 {
        return "0".to_string();
    }
    format!("{:.2}", passed as f64 / total as f64)
}

pub fn format_hits_percentage(passed: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{}%", passed * 100 / total)
}

pub struct InferenceEngine<S = Schema, C = TextCompiler> {
    predicate: Predicate,
    tree: PredicateTree,
    branches: Vec<Branch>,
    record_type: S,
    compiler: C,
    options: EngineOptions,
}

impl<S: RecordType> InferenceEngine<S, TextCompiler> {
    /// Decompose `predicate` once. Fails fast on shapes that cannot be
    /// decomposed.
    pub fn new(predicate: Predicate, record_type: S) -> Result<Self, InferError> {
        let tree = PredicateTree::new(&predicate)?;
        let branches = decompose(&tree);
        if branches.is_empty() {
            return Err(InferError::EmptyBranchSet);
        }
        debug!(
            predicate = %predicate,
            branches = branches.len(),
            "predicate decomposed"
        );
        Ok(InferenceEngine {
            predicate,
            tree,
            branches,
            record_type,
            compiler: TextCompiler,
            options: EngineOptions::default(),
        })
    }
}

impl<S: RecordType, C: ExpressionCompiler> InferenceEngine<S, C> {
    /// Swap the expression compiler used for fragment evaluation.
    pub fn with_compiler<D: ExpressionCompiler>(self, compiler: D) -> InferenceEngine<S, D> {
        InferenceEngine {
            predicate: self.predicate,
            tree: self.tree,
            branches: self.branches,
            record_type: self.record_type,
            compiler,
            options: self.options,
        }
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn tree(&self) -> &PredicateTree {
        &self.tree
    }

    /// Branches in decomposition order.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn record_type(&self) -> &S {
        &self.record_type
    }

    /// Evaluate the whole predicate against a record.
    pub fn is_satisfied(&self, record: &Record) -> Result<bool, InferError> {
        eval_bool(&self.predicate.body, record).map_err(|source| InferError::Evaluation {
            expression: render(&self.predicate.body),
            source,
        })
    }

    pub fn satisfying<'r>(&self, records: &'r [Record]) -> Result<Vec<&'r Record>, InferError> {
        self.partition(records, true)
    }

    pub fn failing<'r>(&self, records: &'r [Record]) -> Result<Vec<&'r Record>, InferError> {
        self.partition(records, false)
    }

    fn partition<'r>(
        &self,
        records: &'r [Record],
        keep: bool,
    ) -> Result<Vec<&'r Record>, InferError> {
        let mut out = Vec::new();
        for record in records {
            if self.is_satisfied(record)? == keep {
                out.push(record);
            }
        }
        Ok(out)
    }

    /// Score every branch against `record`, in branch order.
    pub fn score(&self, record: &Record) -> Result<Vec<ScoredBranch>, InferError> {
        let evaluator = self.evaluator();
        self.branches
            .iter()
            .map(|branch| score_branch(branch, record, &evaluator))
            .collect()
    }

    /// Single-record inference. The record is scored whether or not it
    /// already satisfies the predicate.
    pub fn infer(&self, record: &Record) -> Result<InferenceReport, InferError> {
        self.report(record, 0)
    }

    fn report(&self, record: &Record, id: usize) -> Result<InferenceReport, InferError> {
        let scored = self.score(record)?;
        // min_by_key keeps the first of equal minima: earliest branch wins ties
        let (index, best) = scored
            .into_iter()
            .enumerate()
            .min_by_key(|(_, s)| s.errors())
            .ok_or(InferError::EmptyBranchSet)?;
        debug!(id, branch = index, errors = best.errors(), "closest branch selected");

        let total = best.outcomes.len();
        let passed = best.passes();
        Ok(InferenceReport {
            id,
            data: record.clone(),
            ratings: best.ratings(),
            pass_ratio: format_pass_ratio(passed, total),
            hits_percentage: format_hits_percentage(passed, total),
            errors: best.errors(),
            properties_to_change: best.properties_to_change,
            branch: self.branches[index].text().to_string(),
        })
    }

    fn evaluator(&self) -> FragmentEvaluator<'_> {
        FragmentEvaluator::new(&self.compiler, &self.record_type, self.tree.parameters())
    }
}

impl<S, C> InferenceEngine<S, C>
where
    S: RecordType + Sync,
    C: ExpressionCompiler,
{
    /// Batch inference: one report per record that does not satisfy the
    /// predicate, in input order, numbered from 0.
    pub fn infer_all(&self, records: &[Record]) -> Result<InferenceResult, InferError> {
        let failing = self.failing(records)?;
        let inferences = if failing.len() >= self.options.parallel_threshold {
            debug!(records = failing.len(), "scoring in parallel");
            failing
                .par_iter()
                .enumerate()
                .map(|(id, record)| self.report(record, id))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            failing
                .iter()
                .enumerate()
                .map(|(id, record)| self.report(record, id))
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(InferenceResult { inferences })
    }
}
