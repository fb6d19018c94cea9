//! Predicate AST produced by the parser.
//!
//! A predicate is a tree of binary nodes (connectives and comparisons) over
//! record members, literals, negations and helper calls. Nothing here is
//! typed against a record schema; that happens in `compile`.

use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    AndAlso,
    OrElse,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl BinaryOp {
    /// Token used by the printed form.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::AndAlso => "AndAlso",
            BinaryOp::OrElse => "OrElse",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
        }
    }

    pub fn is_connective(&self) -> bool {
        matches!(self, BinaryOp::AndAlso | BinaryOp::OrElse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Text(String),
}

/// Helper functions callable from predicate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    IsNullOrWhiteSpace,
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::IsNullOrWhiteSpace => "IsNullOrWhiteSpace",
        }
    }

    pub fn from_name(name: &str) -> Option<Function> {
        match name {
            "IsNullOrWhiteSpace" => Some(Function::IsNullOrWhiteSpace),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// left op right -- connective or comparison
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Not(e)
    Not(Box<Expr>),
    /// param.name, or a bare name when the predicate has no bound parameter
    Member { param: Option<String>, name: String },
    Literal(Literal),
    /// Helper call with a single argument
    Call { function: Function, arg: Box<Expr> },
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn member(name: impl Into<String>) -> Expr {
        Expr::Member {
            param: None,
            name: name.into(),
        }
    }

    pub fn as_binary(&self) -> Option<(BinaryOp, &Expr, &Expr)> {
        match self {
            Expr::Binary { op, left, right } => Some((*op, left, right)),
            _ => None,
        }
    }

    /// Member names referenced anywhere in this expression, in order of
    /// first appearance.
    pub fn members(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_members(&mut out);
        out
    }

    fn collect_members<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Binary { left, right, .. } => {
                left.collect_members(out);
                right.collect_members(out);
            }
            Expr::Not(inner) => inner.collect_members(out),
            Expr::Call { arg, .. } => arg.collect_members(out),
            Expr::Member { name, .. } => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Expr::Literal(_) => {}
        }
    }
}

/// A parsed rule: the optional lambda parameters (`x => ...`) and the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub parameters: Vec<String>,
    pub body: Expr,
}

impl Predicate {
    pub fn new(body: Expr) -> Self {
        Predicate {
            parameters: Vec::new(),
            body,
        }
    }

    pub fn parse(src: &str) -> Result<Predicate, crate::error::SyntaxError> {
        crate::parser::parse_predicate(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_are_deduplicated_in_order() {
        let e = Expr::binary(
            BinaryOp::AndAlso,
            Expr::binary(
                BinaryOp::GreaterThan,
                Expr::member("Income"),
                Expr::Literal(Literal::Int(1)),
            ),
            Expr::binary(
                BinaryOp::OrElse,
                Expr::member("Age"),
                Expr::Not(Box::new(Expr::member("Income"))),
            ),
        );
        assert_eq!(e.members(), vec!["Income", "Age"]);
    }

    #[test]
    fn function_names_round_trip() {
        let f = Function::from_name("IsNullOrWhiteSpace").unwrap();
        assert_eq!(f.name(), "IsNullOrWhiteSpace");
        assert_eq!(Function::from_name("IsNullOrEmpty"), None);
    }
}
