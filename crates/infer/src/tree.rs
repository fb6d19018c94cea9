//! Binary-tree view over a predicate, built once per rule.
//!
//! Only binary nodes (connectives and comparisons) become tree nodes. An
//! operand that is not binary -- a negation, a helper call, a bare boolean
//! member -- has no child node on that side; its text is still part of the
//! parent's rendering.

use nearmiss_core::{render, BinaryOp, Expr, Predicate};

use crate::error::InferError;

#[derive(Debug, Clone)]
pub struct TreeNode {
    op: BinaryOp,
    text: String,
    expr: Expr,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

impl TreeNode {
    /// Returns `None` when `expr` is not a binary node.
    fn build(expr: &Expr) -> Option<TreeNode> {
        let (op, left, right) = expr.as_binary()?;
        Some(TreeNode {
            op,
            text: render(expr),
            expr: expr.clone(),
            left: TreeNode::build(left).map(Box::new),
            right: TreeNode::build(right).map(Box::new),
        })
    }

    pub fn op(&self) -> BinaryOp {
        self.op
    }

    /// Printed form of the subtree rooted here.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The sub-expression this node was built from.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn left(&self) -> Option<&TreeNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&TreeNode> {
        self.right.as_deref()
    }

    /// Left operand expression, whether or not it became a node.
    pub fn left_operand(&self) -> &Expr {
        match &self.expr {
            Expr::Binary { left, .. } => left,
            _ => &self.expr,
        }
    }

    /// Right operand expression, whether or not it became a node.
    pub fn right_operand(&self) -> &Expr {
        match &self.expr {
            Expr::Binary { right, .. } => right,
            _ => &self.expr,
        }
    }

    /// A node with no child nodes: an atomic comparison, or a connective
    /// over non-binary operands.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct PredicateTree {
    parameters: Vec<String>,
    root: TreeNode,
}

impl PredicateTree {
    pub fn new(predicate: &Predicate) -> Result<PredicateTree, InferError> {
        let root =
            TreeNode::build(&predicate.body).ok_or_else(|| InferError::MalformedPredicate {
                message: format!(
                    "root of '{}' is not a binary expression",
                    render(&predicate.body)
                ),
            })?;
        Ok(PredicateTree {
            parameters: predicate.parameters.clone(),
            root,
        })
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Names bound by the predicate's lambda header.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }
}
