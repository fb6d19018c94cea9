//! Splitting a predicate into its OR-delimited branches.
//!
//! Branches come out rightmost OR operand first, walking down the left
//! spine, with the leftmost remaining conjunction last. Downstream
//! tie-breaking depends on this order.

use nearmiss_core::{render, Expr};
use serde::Serialize;

use crate::tree::{PredicateTree, TreeNode};

/// Marker that precedes the right operand in an OR node's printed form.
const OR_MARKER: &str = "OrElse ";

/// One OR-delimited conjunction of the predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    text: String,
    #[serde(skip)]
    expr: Expr,
}

impl Branch {
    fn from_expr(expr: &Expr) -> Branch {
        Branch {
            text: render(expr),
            expr: expr.clone(),
        }
    }

    fn from_node(node: &TreeNode) -> Branch {
        Branch {
            text: node.text().to_string(),
            expr: node.expr().clone(),
        }
    }

    /// Printed form of the branch, the input to condition splitting.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The sub-expression this branch was cut from.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

pub fn decompose(tree: &PredicateTree) -> Vec<Branch> {
    let mut branches = Vec::new();
    collect(tree.root(), &mut branches);
    branches
}

fn collect(node: &TreeNode, out: &mut Vec<Branch>) {
    let right_text = match node.right() {
        Some(r) => r.text().to_string(),
        None => render(node.right_operand()),
    };
    let splits_here = node
        .text()
        .strip_suffix(')')
        .and_then(|head| head.strip_suffix(right_text.as_str()))
        .is_some_and(|head| head.ends_with(OR_MARKER));

    if !splits_here {
        out.push(Branch::from_node(node));
        return;
    }

    out.push(match node.right() {
        Some(r) => Branch::from_node(r),
        None => Branch::from_expr(node.right_operand()),
    });
    match node.left() {
        Some(l) => collect(l, out),
        None => out.push(Branch::from_expr(node.left_operand())),
    }
}
