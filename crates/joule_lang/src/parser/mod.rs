//! Hand-written recursive-descent parser.
//!
//! Consumes the flat token sequence the lexer produces and builds a
//! [`Program`] AST plus a list of syntactic errors. The parser never
//! raises: on a missing or unexpected token it records an error and
//! resynchronizes at the next statement boundary.
//!
//! The cursor exposes exactly two primitives, per the grammar's design:
//! [`Parser::peek`] (look `k` tokens ahead without consuming) and
//! [`Parser::consume`] (advance past an expected kind, or record an error
//! and stay put). Every other parsing function is built from those two.

mod expressions;

use crate::ast::{DeclKind, Program, Stmt, StmtKind};
use crate::diagnostic::{Diagnostic, ErrorKind, Stage};
use crate::token::{Token, TokenKind};
use joule_base::Span;

/// Synchronization tokens used during error recovery: `;`, `}`, and every
/// statement-starter keyword.
fn is_sync_token(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Semicolon | TokenKind::RBrace) || kind.starts_statement()
}

pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    errors: Vec<Diagnostic>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Parser { tokens, pos: 0, errors: Vec::new() }
    }

    /// Parses the full token sequence into a [`Program`], returning the
    /// AST alongside every syntactic error recorded along the way.
    ///
    /// The root always exists, even if every statement fails to parse:
    /// statements that could not be parsed are simply omitted rather than
    /// represented with a placeholder node.
    pub fn parse(tokens: &'t [Token]) -> (Program, Vec<Diagnostic>) {
        let mut parser = Parser::new(tokens);
        let start = parser.peek(0).span.start;
        let mut statements = Vec::new();
        while !parser.is_at_end() {
            match parser.statement() {
                Some(stmt) => statements.push(stmt),
                None => parser.synchronize(),
            }
        }
        let end = parser.previous_end(start);
        let program = Program::new(statements, Span::new(start, end));
        (program, parser.errors)
    }

    fn previous_end(&self, start: joule_base::Position) -> joule_base::Position {
        if self.pos == 0 {
            start
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    /// Looks at the `k`-th upcoming token without consuming it. Requests
    /// past the end of the stream return the trailing `EOF` token.
    fn peek(&self, k: usize) -> &Token {
        let index = (self.pos + k).min(self.tokens.len().saturating_sub(1));
        &self.tokens[index]
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek(0).kind, TokenKind::Eof)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// Whether the current token's kind matches `target`'s variant,
    /// ignoring any payload (so e.g. checking for `Identifier(_)` doesn't
    /// need the actual name).
    fn check(&self, target: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek(0).kind) == std::mem::discriminant(target)
    }

    fn matches(&mut self, target: &TokenKind) -> bool {
        if self.check(target) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advances past a token matching `expected`'s variant, or records an
    /// `Expected` error at the current token and returns `None`, leaving
    /// the cursor in place so the caller (or [`Parser::synchronize`]) can
    /// decide what happens next.
    fn consume(&mut self, expected: TokenKind) -> Option<Token> {
        if self.check(&expected) {
            Some(self.advance_clone())
        } else {
            let found = self.peek(0).clone();
            self.errors.push(Diagnostic::new(
                Stage::Syntax,
                ErrorKind::Expected(expected.describe().to_string()),
                format!("expected {}, found {}", expected.describe(), found.kind.describe()),
                found.span,
            ));
            None
        }
    }

    fn advance_clone(&mut self) -> Token {
        let token = self.peek(0).clone();
        self.advance();
        token
    }

    fn unexpected_token(&mut self) {
        let found = self.peek(0).clone();
        self.errors.push(Diagnostic::new(
            Stage::Syntax,
            ErrorKind::UnexpectedToken,
            format!("unexpected token {}", found.kind.describe()),
            found.span,
        ));
    }

    /// Skips tokens until a synchronization point (`;`, `}`, or a
    /// statement-starter keyword) so parsing can resume at statement
    /// granularity after an error. Never advances past `EOF`.
    fn synchronize(&mut self) {
        // Consume the offending token itself so we always make progress.
        if !self.is_at_end() {
            let was_semicolon = matches!(self.peek(0).kind, TokenKind::Semicolon);
            self.advance();
            if was_semicolon {
                return;
            }
        }
        while !self.is_at_end() {
            if is_sync_token(&self.peek(0).kind) {
                if matches!(self.peek(0).kind, TokenKind::Semicolon) {
                    self.advance();
                }
                return;
            }
            self.advance();
        }
    }

    fn statement(&mut self) -> Option<Stmt> {
        match &self.peek(0).kind {
            TokenKind::Let | TokenKind::Const => self.var_decl_stmt(),
            TokenKind::Function => self.fun_decl(),
            TokenKind::If => self.if_stmt(),
            TokenKind::While => self.while_stmt(),
            TokenKind::For => self.for_stmt(),
            TokenKind::Return => self.return_stmt(),
            TokenKind::LBrace => self.block().map(|(stmts, span)| Stmt::new(StmtKind::Block(stmts), span)),
            _ => self.expr_stmt(),
        }
    }

    fn var_decl_stmt(&mut self) -> Option<Stmt> {
        let (stmt, _) = self.var_decl_inner(true)?;
        Some(stmt)
    }

    /// Parses `(let|const) Id (= Expr)?`, optionally requiring a trailing
    /// `;` (the `for` loop's init clause parses without one).
    fn var_decl_inner(&mut self, require_semicolon: bool) -> Option<(Stmt, Span)> {
        let start_token = self.advance_clone();
        let kind = match start_token.kind {
            TokenKind::Let => DeclKind::Let,
            TokenKind::Const => DeclKind::Const,
            _ => unreachable!("var_decl_inner only called at 'let'/'const'"),
        };
        let name_token = self.consume(TokenKind::Identifier(String::new()))?;
        let name = match name_token.kind {
            TokenKind::Identifier(name) => name,
            _ => unreachable!(),
        };

        let init = if self.matches(&TokenKind::Eq) { Some(self.expression()?) } else { None };

        if kind == DeclKind::Const && init.is_none() {
            self.errors.push(Diagnostic::new(
                Stage::Syntax,
                ErrorKind::MissingInitializer,
                "'const' declarations require an initializer".to_string(),
                name_token.span,
            ));
        }

        let end_span = init.as_ref().map(|e| e.span).unwrap_or(name_token.span);
        if require_semicolon {
            self.consume(TokenKind::Semicolon);
        }
        let span = start_token.span.merge(end_span);
        Some((Stmt::new(StmtKind::VarDecl { kind, name, init }, span), span))
    }

    fn fun_decl(&mut self) -> Option<Stmt> {
        let start = self.advance_clone(); // 'function'
        let name_token = self.consume(TokenKind::Identifier(String::new()))?;
        let name = match name_token.kind {
            TokenKind::Identifier(name) => name,
            _ => unreachable!(),
        };
        self.consume(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let param = self.consume(TokenKind::Identifier(String::new()))?;
                match param.kind {
                    TokenKind::Identifier(name) => params.push(name),
                    _ => unreachable!(),
                }
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen)?;
        let (body, body_span) = self.block()?;
        let span = start.span.merge(body_span);
        Some(Stmt::new(StmtKind::FunDecl { name, params, body }, span))
    }

    fn if_stmt(&mut self) -> Option<Stmt> {
        let start = self.advance_clone(); // 'if'
        self.consume(TokenKind::LParen)?;
        let cond = self.expression()?;
        self.consume(TokenKind::RParen)?;
        let then_branch = Box::new(self.statement()?);
        let (else_branch, end_span) = if self.matches(&TokenKind::Else) {
            let branch = self.statement()?;
            let span = branch.span;
            (Some(Box::new(branch)), span)
        } else {
            (None, then_branch.span)
        };
        let span = start.span.merge(end_span);
        Some(Stmt::new(StmtKind::IfStmt { cond, then_branch, else_branch }, span))
    }

    fn while_stmt(&mut self) -> Option<Stmt> {
        let start = self.advance_clone(); // 'while'
        self.consume(TokenKind::LParen)?;
        let cond = self.expression()?;
        self.consume(TokenKind::RParen)?;
        let body = Box::new(self.statement()?);
        let span = start.span.merge(body.span);
        Some(Stmt::new(StmtKind::WhileStmt { cond, body }, span))
    }

    fn for_stmt(&mut self) -> Option<Stmt> {
        let start = self.advance_clone(); // 'for'
        self.consume(TokenKind::LParen)?;

        let init = if self.check(&TokenKind::Semicolon) {
            self.advance();
            None
        } else if matches!(self.peek(0).kind, TokenKind::Let | TokenKind::Const) {
            let (stmt, _) = self.var_decl_inner(false)?;
            self.consume(TokenKind::Semicolon);
            Some(Box::new(stmt))
        } else {
            let expr = self.expression()?;
            let span = expr.span;
            self.consume(TokenKind::Semicolon);
            Some(Box::new(Stmt::new(StmtKind::ExprStmt(expr), span)))
        };

        let cond = if self.check(&TokenKind::Semicolon) { None } else { Some(self.expression()?) };
        self.consume(TokenKind::Semicolon)?;

        let update = if self.check(&TokenKind::RParen) { None } else { Some(self.expression()?) };
        self.consume(TokenKind::RParen)?;

        let body = Box::new(self.statement()?);
        let span = start.span.merge(body.span);
        Some(Stmt::new(StmtKind::ForStmt { init, cond, update, body }, span))
    }

    fn return_stmt(&mut self) -> Option<Stmt> {
        let start = self.advance_clone(); // 'return'
        let value = if self.check(&TokenKind::Semicolon) { None } else { Some(self.expression()?) };
        let end_span = value.as_ref().map(|e| e.span).unwrap_or(start.span);
        self.consume(TokenKind::Semicolon);
        let span = start.span.merge(end_span);
        Some(Stmt::new(StmtKind::ReturnStmt { value }, span))
    }

    fn block(&mut self) -> Option<(Vec<Stmt>, Span)> {
        let start = self.consume(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            match self.statement() {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
        }
        let end = self.consume(TokenKind::RBrace);
        let end_span = end.map(|t| t.span).unwrap_or(start.span);
        Some((statements, start.span.merge(end_span)))
    }

    fn expr_stmt(&mut self) -> Option<Stmt> {
        if self.is_at_end() {
            self.unexpected_token();
            return None;
        }
        let expr = self.expression()?;
        let span = expr.span;
        self.consume(TokenKind::Semicolon);
        Some(Stmt::new(StmtKind::ExprStmt(expr), span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, ExprKind};
    use crate::lexer::tokenize;

    fn parse_ok(source: &str) -> Program {
        let (tokens, lex_errors) = tokenize(source);
        assert!(lex_errors.is_empty(), "unexpected lex errors: {:?}", lex_errors);
        let (program, errors) = Parser::parse(&tokens);
        assert!(errors.is_empty(), "unexpected syntax errors: {:?}", errors);
        program
    }

    #[test]
    fn parses_simple_var_decl() {
        let program = parse_ok("let x = 10;");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0].kind {
            StmtKind::VarDecl { kind, name, init } => {
                assert_eq!(*kind, DeclKind::Let);
                assert_eq!(name, "x");
                assert!(matches!(init.as_ref().unwrap().kind, ExprKind::NumberLit(n) if n == 10.0));
            }
            other => panic!("expected VarDecl, got {:?}", other),
        }
    }

    #[test]
    fn const_requires_initializer_but_still_produces_node() {
        let (tokens, _) = tokenize("const pi;");
        let (program, errors) = Parser::parse(&tokens);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::MissingInitializer);
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn parses_function_declaration_with_params() {
        let program = parse_ok("function add(a, b) { return a + b; }");
        match &program.statements[0].kind {
            StmtKind::FunDecl { name, params, body } => {
                assert_eq!(name, "add");
                assert_eq!(params, &vec!["a".to_string(), "b".to_string()]);
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected FunDecl, got {:?}", other),
        }
    }

    #[test]
    fn dangling_else_binds_to_nearest_if() {
        let program = parse_ok("if (true) if (false) x; else y;");
        match &program.statements[0].kind {
            StmtKind::IfStmt { else_branch, then_branch, .. } => {
                assert!(else_branch.is_none());
                match &then_branch.kind {
                    StmtKind::IfStmt { else_branch, .. } => assert!(else_branch.is_some()),
                    other => panic!("expected nested IfStmt, got {:?}", other),
                }
            }
            other => panic!("expected IfStmt, got {:?}", other),
        }
    }

    #[test]
    fn assignment_is_right_associative() {
        let program = parse_ok("x = y = 1;");
        match &program.statements[0].kind {
            StmtKind::ExprStmt(expr) => match &expr.kind {
                ExprKind::Assign { value, .. } => {
                    assert!(matches!(value.kind, ExprKind::Assign { .. }));
                }
                other => panic!("expected Assign, got {:?}", other),
            },
            other => panic!("expected ExprStmt, got {:?}", other),
        }
    }

    #[test]
    fn invalid_assignment_target_is_recorded_but_node_still_built() {
        let (tokens, _) = tokenize("1 = 2;");
        let (program, errors) = Parser::parse(&tokens);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::InvalidAssignmentTarget);
        match &program.statements[0].kind {
            StmtKind::ExprStmt(expr) => assert!(matches!(expr.kind, ExprKind::Assign { .. })),
            other => panic!("expected ExprStmt, got {:?}", other),
        }
    }

    #[test]
    fn missing_semicolon_recovers_at_next_statement() {
        let (tokens, _) = tokenize("let x = 1 let y = 2;");
        let (program, errors) = Parser::parse(&tokens);
        assert!(!errors.is_empty());
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn precedence_climbs_through_all_strata() {
        let program = parse_ok("1 + 2 * 3 == 7 && true;");
        match &program.statements[0].kind {
            StmtKind::ExprStmt(expr) => match &expr.kind {
                ExprKind::Binary { op: BinaryOp::And, .. } => {}
                other => panic!("expected top-level And, got {:?}", other),
            },
            other => panic!("expected ExprStmt, got {:?}", other),
        }
    }

    #[test]
    fn deeply_nested_parens_parse_without_overflow() {
        let mut source = String::new();
        for _ in 0..256 {
            source.push('(');
        }
        source.push('1');
        for _ in 0..256 {
            source.push(')');
        }
        source.push(';');
        let (tokens, lex_errors) = tokenize(&source);
        assert!(lex_errors.is_empty());
        let (program, errors) = Parser::parse(&tokens);
        assert!(errors.is_empty());
        assert_eq!(program.statements.len(), 1);
    }
}
