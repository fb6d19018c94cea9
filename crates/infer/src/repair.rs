//! Parenthesis repair and evaluation of a single fragment.
//!
//! A fragment cut from a branch may carry unmatched parentheses. The loop
//! compiles the normalized text; on a syntax error it deletes one
//! parenthesis-related character and tries again. Deletions are bounded by
//! the fragment's length, so the loop always terminates, either with a
//! compiled result or with `InferError::RepairExhausted`.

use std::collections::VecDeque;

use nearmiss_core::{CompileError, ExpressionCompiler, FieldType, Record, RecordType};
use tracing::{debug, trace, warn};

use crate::error::InferError;
use crate::normalize;
use crate::split::Fragment;

const OPEN: char = '(';
const CLOSE: char = ')';

/// Result of evaluating one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    /// Whether the condition holds for the record.
    pub holds: bool,
    /// The fragment text that finally compiled, before keyword rewriting.
    pub repaired: String,
    /// Number of characters deleted to get there.
    pub deletions: usize,
}

/// Which character the next repair step removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deletion {
    FirstOpen,
    BeforeLastClose,
}

/// Positions of `(` and `)` in the unrepaired text. Entries are consumed as
/// deletions happen; the positions themselves are never shifted.
#[derive(Debug, Clone)]
struct ParenLedger {
    opens: VecDeque<usize>,
    closes: Vec<usize>,
    len: usize,
}

impl ParenLedger {
    fn scan(text: &str) -> ParenLedger {
        let mut opens = VecDeque::new();
        let mut closes = Vec::new();
        for (i, c) in text.char_indices() {
            match c {
                OPEN => opens.push_back(i),
                CLOSE => closes.push(i),
                _ => {}
            }
        }
        ParenLedger {
            opens,
            closes,
            len: text.len(),
        }
    }

    fn next_deletion(&self) -> Option<Deletion> {
        use std::cmp::Ordering::*;
        match self.opens.len().cmp(&self.closes.len()) {
            Greater => Some(Deletion::FirstOpen),
            Less => Some(Deletion::BeforeLastClose),
            Equal => {
                if self.opens_lead() {
                    Some(Deletion::BeforeLastClose)
                } else if self.closes_trail() {
                    Some(Deletion::FirstOpen)
                } else {
                    None
                }
            }
        }
    }

    /// Opens form a contiguous run starting at the first character.
    fn opens_lead(&self) -> bool {
        !self.opens.is_empty() && self.opens.iter().enumerate().all(|(k, &pos)| pos == k)
    }

    /// Closes form a contiguous run ending at the last character.
    fn closes_trail(&self) -> bool {
        let n = self.closes.len();
        n > 0
            && self
                .closes
                .iter()
                .enumerate()
                .all(|(k, &pos)| pos + n == self.len + k)
    }

    /// Apply the next deletion to `text`. Returns `false` when no rule
    /// applies or the target character does not exist.
    fn repair(&mut self, text: &mut String) -> bool {
        match self.next_deletion() {
            Some(Deletion::FirstOpen) => {
                let Some(i) = text.find(OPEN) else {
                    return false;
                };
                text.remove(i);
                self.opens.pop_front();
                true
            }
            Some(Deletion::BeforeLastClose) => {
                let Some(last) = text.rfind(CLOSE) else {
                    return false;
                };
                let Some((prev, _)) = text[..last].char_indices().next_back() else {
                    return false;
                };
                text.remove(prev);
                self.closes.pop();
                true
            }
            None => false,
        }
    }
}

/// Compiles and evaluates fragments against records, repairing
/// parenthesis balance as needed.
pub struct FragmentEvaluator<'a> {
    compiler: &'a dyn ExpressionCompiler,
    record_type: &'a dyn RecordType,
    parameters: &'a [String],
}

impl<'a> FragmentEvaluator<'a> {
    pub fn new(
        compiler: &'a dyn ExpressionCompiler,
        record_type: &'a dyn RecordType,
        parameters: &'a [String],
    ) -> Self {
        FragmentEvaluator {
            compiler,
            record_type,
            parameters,
        }
    }

    pub fn record_type(&self) -> &'a dyn RecordType {
        self.record_type
    }

    pub fn evaluate(
        &self,
        fragment: &Fragment,
        record: &Record,
    ) -> Result<RepairOutcome, InferError> {
        let mut text = if self.mentions_decimal(fragment) {
            normalize::decimal_separators(&fragment.text)
        } else {
            fragment.text.clone()
        };
        // A lone member operand is scored from the member itself. The
        // deletion rules would otherwise cut into its name.
        if let Some(member) = normalize::bare_member(&text) {
            text = member.to_string();
        }
        let mut ledger = ParenLedger::scan(&text);
        let bound = text.chars().count();
        let mut deletions = 0usize;

        loop {
            let native = normalize::native_syntax(&text, self.parameters);
            let err = match self.compiler.compile(&native, self.record_type) {
                Ok(compiled) => {
                    let holds = compiled.evaluate(record).map_err(|source| {
                        InferError::Evaluation {
                            expression: native.clone(),
                            source,
                        }
                    })?;
                    trace!(fragment = %fragment.text, compiled = %native, holds, "fragment evaluated");
                    return Ok(RepairOutcome {
                        holds,
                        repaired: text,
                        deletions,
                    });
                }
                Err(err) => err,
            };

            if !matches!(err, CompileError::Syntax(_)) {
                return Err(InferError::Fragment {
                    fragment: fragment.text.clone(),
                    source: err,
                });
            }

            if deletions >= bound || !ledger.repair(&mut text) {
                warn!(fragment = %fragment.text, deletions, error = %err, "parenthesis repair exhausted");
                return Err(InferError::RepairExhausted {
                    fragment: fragment.text.clone(),
                    attempts: deletions,
                });
            }
            deletions += 1;
            debug!(fragment = %fragment.text, now = %text, "deleted one character to rebalance");
        }
    }

    fn mentions_decimal(&self, fragment: &Fragment) -> bool {
        fragment
            .properties
            .iter()
            .any(|p| self.record_type.property_type(p) == Some(FieldType::Decimal))
    }
}
