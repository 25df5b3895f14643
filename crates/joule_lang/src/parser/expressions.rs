//! Expression parsing: a Pratt-style precedence climb equivalent to the
//! grammar's stratification (`Assignment` down to `Primary`).

use super::Parser;
use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::diagnostic::{Diagnostic, ErrorKind, Stage};
use crate::token::TokenKind;

impl<'t> Parser<'t> {
    pub(super) fn expression(&mut self) -> Option<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Option<Expr> {
        let target = self.logical_or()?;
        if self.matches(&TokenKind::Eq) {
            let value = self.assignment()?;
            let span = target.span.merge(value.span);
            if !target.is_lvalue() {
                self.errors.push(Diagnostic::new(
                    Stage::Syntax,
                    ErrorKind::InvalidAssignmentTarget,
                    "left-hand side of assignment must be a variable, index, or member expression".to_string(),
                    target.span,
                ));
            }
            return Some(Expr::new(ExprKind::Assign { target: Box::new(target), value: Box::new(value) }, span));
        }
        Some(target)
    }

    fn logical_or(&mut self) -> Option<Expr> {
        let mut left = self.logical_and()?;
        while self.matches(&TokenKind::PipePipe) {
            let right = self.logical_and()?;
            left = binary(left, BinaryOp::Or, right);
        }
        Some(left)
    }

    fn logical_and(&mut self) -> Option<Expr> {
        let mut left = self.equality()?;
        while self.matches(&TokenKind::AmpAmp) {
            let right = self.equality()?;
            left = binary(left, BinaryOp::And, right);
        }
        Some(left)
    }

    fn equality(&mut self) -> Option<Expr> {
        let mut left = self.relational()?;
        loop {
            let op = if self.matches(&TokenKind::EqEq) {
                BinaryOp::EqEq
            } else if self.matches(&TokenKind::BangEq) {
                BinaryOp::NotEq
            } else {
                break;
            };
            let right = self.relational()?;
            left = binary(left, op, right);
        }
        Some(left)
    }

    fn relational(&mut self) -> Option<Expr> {
        let mut left = self.additive()?;
        loop {
            let op = if self.matches(&TokenKind::Lt) {
                BinaryOp::Lt
            } else if self.matches(&TokenKind::LtEq) {
                BinaryOp::LtEq
            } else if self.matches(&TokenKind::Gt) {
                BinaryOp::Gt
            } else if self.matches(&TokenKind::GtEq) {
                BinaryOp::GtEq
            } else {
                break;
            };
            let right = self.additive()?;
            left = binary(left, op, right);
        }
        Some(left)
    }

    fn additive(&mut self) -> Option<Expr> {
        let mut left = self.multiplicative()?;
        loop {
            let op = if self.matches(&TokenKind::Plus) {
                BinaryOp::Add
            } else if self.matches(&TokenKind::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };
            let right = self.multiplicative()?;
            left = binary(left, op, right);
        }
        Some(left)
    }

    fn multiplicative(&mut self) -> Option<Expr> {
        let mut left = self.unary()?;
        loop {
            let op = if self.matches(&TokenKind::Star) {
                BinaryOp::Mul
            } else if self.matches(&TokenKind::Slash) {
                BinaryOp::Div
            } else if self.matches(&TokenKind::Percent) {
                BinaryOp::Rem
            } else {
                break;
            };
            let right = self.unary()?;
            left = binary(left, op, right);
        }
        Some(left)
    }

    fn unary(&mut self) -> Option<Expr> {
        let start = self.peek(0).clone();
        let op = if self.matches(&TokenKind::Bang) {
            Some(UnaryOp::Not)
        } else if self.matches(&TokenKind::Minus) {
            Some(UnaryOp::Neg)
        } else if self.matches(&TokenKind::Plus) {
            Some(UnaryOp::Plus)
        } else {
            None
        };
        match op {
            Some(op) => {
                let operand = self.unary()?;
                let span = start.span.merge(operand.span);
                Some(Expr::new(ExprKind::Unary { op, operand: Box::new(operand) }, span))
            }
            None => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Option<Expr> {
        let mut expr = self.primary()?;
        loop {
            if self.matches(&TokenKind::LParen) {
                let mut args = Vec::new();
                if !self.check(&TokenKind::RParen) {
                    loop {
                        args.push(self.expression()?);
                        if !self.matches(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                let end = self.consume(TokenKind::RParen);
                let span = expr.span.merge(end.map(|t| t.span).unwrap_or(expr.span));
                expr = Expr::new(ExprKind::Call { callee: Box::new(expr), args }, span);
            } else if self.matches(&TokenKind::LBracket) {
                let index = self.expression()?;
                let end = self.consume(TokenKind::RBracket);
                let span = expr.span.merge(end.map(|t| t.span).unwrap_or(index.span));
                expr = Expr::new(ExprKind::Index { object: Box::new(expr), index: Box::new(index) }, span);
            } else if self.matches(&TokenKind::Dot) {
                let name_token = self.consume(TokenKind::Identifier(String::new()))?;
                let name = match name_token.kind {
                    TokenKind::Identifier(name) => name,
                    _ => unreachable!(),
                };
                let span = expr.span.merge(name_token.span);
                expr = Expr::new(ExprKind::Member { object: Box::new(expr), name }, span);
            } else {
                break;
            }
        }
        Some(expr)
    }

    fn primary(&mut self) -> Option<Expr> {
        let token = self.peek(0).clone();
        match token.kind {
            TokenKind::Number { value, .. } => {
                self.advance();
                Some(Expr::new(ExprKind::NumberLit(value), token.span))
            }
            TokenKind::String(value) => {
                self.advance();
                Some(Expr::new(ExprKind::StringLit(value), token.span))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLit(true), token.span))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLit(false), token.span))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Some(Expr::new(ExprKind::Identifier(name), token.span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expression()?;
                self.consume(TokenKind::RParen);
                Some(inner)
            }
            _ => {
                self.unexpected_token();
                None
            }
        }
    }
}

fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, span)
}
