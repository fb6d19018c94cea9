//! Recursive-descent parser for predicate text.
//!
//! Accepts both the printed form (`AndAlso`, `OrElse`, `Not(..)`) and the
//! symbolic form (`&&`, `||`, `!`), so a rendered predicate and a normalized
//! fragment go through the same grammar.
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::ast::{BinaryOp, Expr, Function, Literal, Predicate};
use crate::error::SyntaxError;
use crate::lexer::{lex, Spanned, Token};

/// Parse a full rule, with an optional `param =>` header.
pub fn parse_predicate(src: &str) -> Result<Predicate, SyntaxError> {
    let tokens = lex(src)?;
    let mut p = Parser::new(&tokens);
    let parameters = p.parse_header();
    let body = p.parse_expr()?;
    p.expect_eof()?;
    Ok(Predicate { parameters, body })
}

/// Parse a bare boolean expression (no lambda header).
pub fn parse_expr(src: &str) -> Result<Expr, SyntaxError> {
    let tokens = lex(src)?;
    let mut p = Parser::new(&tokens);
    let e = p.parse_expr()?;
    p.expect_eof()?;
    Ok(e)
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let i = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[i].token
    }

    fn advance(&mut self) -> &Spanned {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn err(&self, msg: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.cur().pos, msg)
    }

    fn is_word(&self, w: &str) -> bool {
        matches!(self.peek(), Token::Word(x) if x == w)
    }

    fn take_word(&mut self) -> Result<String, SyntaxError> {
        if let Token::Word(w) = self.peek().clone() {
            self.advance();
            Ok(w)
        } else {
            Err(self.err(format!("expected identifier, got {:?}", self.peek())))
        }
    }

    fn expect_lparen(&mut self) -> Result<(), SyntaxError> {
        if self.peek() == &Token::LParen {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected '(', got {:?}", self.peek())))
        }
    }

    fn expect_rparen(&mut self) -> Result<(), SyntaxError> {
        if self.peek() == &Token::RParen {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected ')', got {:?}", self.peek())))
        }
    }

    fn expect_eof(&self) -> Result<(), SyntaxError> {
        if self.peek() == &Token::Eof {
            Ok(())
        } else {
            Err(self.err(format!("unexpected {:?} after expression", self.peek())))
        }
    }

    /// Consumes an `x =>` or `(a, b) =>` header. Without one, nothing is
    /// consumed and the parameter list is empty.
    fn parse_header(&mut self) -> Vec<String> {
        let start = self.pos;
        let mut params = Vec::new();
        if let Token::Word(w) = self.peek().clone() {
            params.push(w);
            self.advance();
        } else if self.peek() == &Token::LParen {
            self.advance();
            while let Token::Word(w) = self.peek().clone() {
                params.push(w);
                self.advance();
                if self.peek() != &Token::Comma {
                    break;
                }
                self.advance();
            }
            if self.peek() == &Token::RParen {
                self.advance();
            } else {
                params.clear();
            }
        }
        if !params.is_empty() && self.peek() == &Token::Arrow {
            self.advance();
            params
        } else {
            self.pos = start;
            Vec::new()
        }
    }

    // -- Expression parsing --------------------------------------

    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_or_expr()
    }

    fn parse_or_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_and_expr()?;
        while self.peek() == &Token::OrOr || self.is_word("OrElse") {
            self.advance();
            let right = self.parse_and_expr()?;
            left = Expr::binary(BinaryOp::OrElse, left, right);
        }
        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_unary_expr()?;
        while self.peek() == &Token::AndAnd || self.is_word("AndAlso") {
            self.advance();
            let right = self.parse_unary_expr()?;
            left = Expr::binary(BinaryOp::AndAlso, left, right);
        }
        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, SyntaxError> {
        if self.peek() == &Token::Bang || self.is_word("Not") {
            self.advance();
            let e = self.parse_unary_expr()?;
            return Ok(Expr::Not(Box::new(e)));
        }
        self.parse_compare_expr()
    }

    fn parse_compare_expr(&mut self) -> Result<Expr, SyntaxError> {
        let left = self.parse_operand()?;
        let op = match self.peek() {
            Token::Eq => BinaryOp::Equal,
            Token::Neq => BinaryOp::NotEqual,
            Token::Lt => BinaryOp::LessThan,
            Token::Lte => BinaryOp::LessThanOrEqual,
            Token::Gt => BinaryOp::GreaterThan,
            Token::Gte => BinaryOp::GreaterThanOrEqual,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_operand()?;
        Ok(Expr::binary(op, left, right))
    }

    fn parse_operand(&mut self) -> Result<Expr, SyntaxError> {
        match self.peek().clone() {
            Token::LParen => {
                self.advance();
                let e = self.parse_expr()?;
                self.expect_rparen()?;
                Ok(e)
            }
            Token::Int(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::Int(n)))
            }
            Token::Decimal(s) => {
                let d = Decimal::from_str(&s)
                    .map_err(|e| self.err(format!("invalid decimal '{}': {}", s, e)))?;
                self.advance();
                Ok(Expr::Literal(Literal::Decimal(d)))
            }
            Token::Str(s) => {
                self.advance();
                Ok(Expr::Literal(Literal::Text(s)))
            }
            Token::Word(w) => self.parse_word(w),
            other => Err(self.err(format!("expected operand, got {:?}", other))),
        }
    }

    fn parse_word(&mut self, w: String) -> Result<Expr, SyntaxError> {
        match w.as_str() {
            "true" | "True" => {
                self.advance();
                return Ok(Expr::Literal(Literal::Bool(true)));
            }
            "false" | "False" => {
                self.advance();
                return Ok(Expr::Literal(Literal::Bool(false)));
            }
            "null" => {
                self.advance();
                return Ok(Expr::Literal(Literal::Null));
            }
            _ => {}
        }

        // string.IsNullOrWhiteSpace(..)
        if (w == "string" || w == "String") && self.peek_at(1) == &Token::Dot {
            if let Token::Word(name) = self.peek_at(2).clone() {
                if let Some(function) = Function::from_name(&name) {
                    self.advance();
                    self.advance();
                    self.advance();
                    return self.parse_call_args(function);
                }
            }
        }

        // IsNullOrWhiteSpace(..)
        if let Some(function) = Function::from_name(&w) {
            if self.peek_at(1) == &Token::LParen {
                self.advance();
                return self.parse_call_args(function);
            }
        }

        self.advance();
        if self.peek() == &Token::Dot {
            self.advance();
            let name = self.take_word()?;
            return Ok(Expr::Member {
                param: Some(w),
                name,
            });
        }
        Ok(Expr::Member {
            param: None,
            name: w,
        })
    }

    fn parse_call_args(&mut self, function: Function) -> Result<Expr, SyntaxError> {
        self.expect_lparen()?;
        let arg = self.parse_expr()?;
        self.expect_rparen()?;
        Ok(Expr::Call {
            function,
            arg: Box::new(arg),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(op: BinaryOp, name: &str, lit: Literal) -> Expr {
        Expr::binary(op, Expr::member(name), Expr::Literal(lit))
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let e = parse_expr("Age >= 18 AndAlso Income > 1000 OrElse HasGuarantor == true").unwrap();
        let expected = Expr::binary(
            BinaryOp::OrElse,
            Expr::binary(
                BinaryOp::AndAlso,
                cmp(BinaryOp::GreaterThanOrEqual, "Age", Literal::Int(18)),
                cmp(BinaryOp::GreaterThan, "Income", Literal::Int(1000)),
            ),
            cmp(BinaryOp::Equal, "HasGuarantor", Literal::Bool(true)),
        );
        assert_eq!(e, expected);
    }

    #[test]
    fn symbolic_and_word_connectives_are_equivalent() {
        let a = parse_expr("A == 1 && B == 2 || !(C == 3)").unwrap();
        let b = parse_expr("A == 1 AndAlso B == 2 OrElse Not(C == 3)").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn or_chain_is_left_associative() {
        let e = parse_expr("A == 1 || B == 2 || C == 3").unwrap();
        let (op, left, right) = e.as_binary().unwrap();
        assert_eq!(op, BinaryOp::OrElse);
        assert_eq!(right, &cmp(BinaryOp::Equal, "C", Literal::Int(3)));
        assert_eq!(left.as_binary().unwrap().0, BinaryOp::OrElse);
    }

    #[test]
    fn lambda_header_binds_parameter() {
        let p = parse_predicate("x => x.Age > 3").unwrap();
        assert_eq!(p.parameters, vec!["x".to_string()]);
        assert_eq!(
            p.body,
            Expr::binary(
                BinaryOp::GreaterThan,
                Expr::Member {
                    param: Some("x".into()),
                    name: "Age".into()
                },
                Expr::Literal(Literal::Int(3)),
            )
        );
    }

    #[test]
    fn tuple_header_binds_every_parameter() {
        let p = parse_predicate("(a, b) => a.Age > b.Age").unwrap();
        assert_eq!(p.parameters, vec!["a".to_string(), "b".to_string()]);
        let (_, left, right) = p.body.as_binary().unwrap();
        assert_eq!(
            left,
            &Expr::Member {
                param: Some("a".into()),
                name: "Age".into()
            }
        );
        assert_eq!(
            right,
            &Expr::Member {
                param: Some("b".into()),
                name: "Age".into()
            }
        );
    }

    #[test]
    fn parenthesized_body_is_not_a_header() {
        let p = parse_predicate("(Active) AndAlso Age > 3").unwrap();
        assert!(p.parameters.is_empty());
        let p = parse_predicate("(Age > 3)").unwrap();
        assert!(p.parameters.is_empty());
    }

    #[test]
    fn stray_comma_is_syntax_error_at_its_position() {
        let err = parse_expr("Price > 10,5").unwrap_err();
        assert_eq!(err.position, 10);
        assert!(parse_predicate("(a, ) => a.Age > 1").is_err());
    }

    #[test]
    fn predicate_without_header_has_no_parameters() {
        let p = parse_predicate("Age > 3").unwrap();
        assert!(p.parameters.is_empty());
    }

    #[test]
    fn qualified_and_bare_helper_calls() {
        let a = parse_expr("string.IsNullOrWhiteSpace(Name)").unwrap();
        let b = parse_expr("IsNullOrWhiteSpace(Name)").unwrap();
        assert_eq!(a, b);
        assert!(matches!(
            a,
            Expr::Call {
                function: Function::IsNullOrWhiteSpace,
                ..
            }
        ));
    }

    #[test]
    fn bare_boolean_member_is_an_operand() {
        let e = parse_expr("Active AndAlso Age > 1").unwrap();
        let (_, left, _) = e.as_binary().unwrap();
        assert_eq!(left, &Expr::member("Active"));
    }

    #[test]
    fn decimal_literal() {
        let e = parse_expr("Price > 10.5").unwrap();
        assert_eq!(
            e,
            cmp(
                BinaryOp::GreaterThan,
                "Price",
                Literal::Decimal(Decimal::new(105, 1))
            )
        );
    }

    #[test]
    fn missing_close_paren_is_syntax_error() {
        let err = parse_expr("((Age >= 18)").unwrap_err();
        assert!(err.message.contains("expected ')'"));
    }

    #[test]
    fn surplus_close_paren_is_syntax_error() {
        let err = parse_expr("(Income > 1000))").unwrap_err();
        assert!(err.message.contains("after expression"));
        assert_eq!(err.position, 15);
    }

    #[test]
    fn dangling_operator_is_syntax_error() {
        assert!(parse_expr("Age >").is_err());
        assert!(parse_expr("Age > 1 AndAlso").is_err());
    }
}
