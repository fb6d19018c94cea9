//! Scoring one branch against one record.

use nearmiss_core::Record;
use serde::Serialize;
use tracing::trace;

use crate::decompose::Branch;
use crate::error::InferError;
use crate::repair::FragmentEvaluator;
use crate::split::{split_conditions, Fragment};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionOutcome {
    pub fragment: String,
    pub passed: bool,
}

/// Per-condition results for one (record, branch) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredBranch {
    pub outcomes: Vec<ConditionOutcome>,
    /// Properties of every failing condition, repeated once per failure.
    pub properties_to_change: Vec<String>,
}

impl ScoredBranch {
    pub fn ratings(&self) -> Vec<bool> {
        self.outcomes.iter().map(|o| o.passed).collect()
    }

    pub fn errors(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed).count()
    }

    pub fn passes(&self) -> usize {
        self.outcomes.len() - self.errors()
    }
}

/// Evaluate every scorable condition of `branch` against `record`, in
/// branch order.
pub fn score_branch(
    branch: &Branch,
    record: &Record,
    evaluator: &FragmentEvaluator<'_>,
) -> Result<ScoredBranch, InferError> {
    let mut scored = ScoredBranch {
        outcomes: Vec::new(),
        properties_to_change: Vec::new(),
    };
    for text in split_conditions(branch.text()) {
        let fragment = Fragment::tag(text, evaluator.record_type());
        if !fragment.is_scorable() {
            trace!(fragment = %text, "skipping fragment without properties");
            continue;
        }
        let outcome = evaluator.evaluate(&fragment, record)?;
        if !outcome.holds {
            scored
                .properties_to_change
                .extend(fragment.properties.iter().cloned());
        }
        scored.outcomes.push(ConditionOutcome {
            fragment: fragment.text,
            passed: outcome.holds,
        });
    }
    Ok(scored)
}
