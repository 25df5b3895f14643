//! Semantic analysis: scope/type checking over the parsed AST.
//!
//! Walks the AST once in source order, threading a [`ScopeTree`] and a
//! function-nesting depth counter. Declares symbols as it encounters them,
//! infers and checks expression types, and emits errors and warnings. A
//! final pass over the completed scope tree adds the warnings that can
//! only be known once every reference has been seen (`UnusedVariable`,
//! `UnusedParameter`, `UncalledFunction`).

use crate::ast::{BinaryOp, DeclKind, Expr, ExprKind, Program, Stmt, StmtKind, UnaryOp};
use crate::diagnostic::{Diagnostic, ErrorKind, Stage, Warning, WarningKind};
use crate::symbol::{Scope, ScopeKind, ScopeTree, Symbol, SymbolKind};
use crate::ty::{Arity, Type};
use joule_base::Span;

/// The result of analyzing a program: the populated scope tree plus every
/// error and warning produced along the way.
pub struct SemanticResult {
    pub scopes: ScopeTree,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Warning>,
}

pub fn analyze(program: &Program) -> SemanticResult {
    let mut analyzer = Analyzer {
        scopes: ScopeTree::new(),
        errors: Vec::new(),
        warnings: Vec::new(),
        function_depth: 0,
    };
    for stmt in &program.statements {
        analyzer.statement(stmt);
    }
    analyzer.collect_post_pass_warnings();
    SemanticResult { scopes: analyzer.scopes, errors: analyzer.errors, warnings: analyzer.warnings }
}

struct Analyzer {
    scopes: ScopeTree,
    errors: Vec<Diagnostic>,
    warnings: Vec<Warning>,
    function_depth: usize,
}

impl Analyzer {
    fn error(&mut self, kind: ErrorKind, message: impl Into<String>, span: Span) {
        self.errors.push(Diagnostic::new(Stage::Semantic, kind, message, span));
    }

    fn warn(&mut self, kind: WarningKind, message: impl Into<String>, span: Span) {
        self.warnings.push(Warning::new(kind, message, span));
    }

    fn declare(&mut self, symbol: Symbol) {
        let name = symbol.name.clone();
        let span = symbol.declared_at;
        match self.scopes.declare(symbol) {
            Ok(outcome) => {
                if outcome.shadows {
                    self.warn(WarningKind::Shadowing(name.clone()), format!("'{}' shadows an outer binding", name), span);
                }
            }
            Err(_) => {
                self.error(ErrorKind::Redeclaration(name.clone()), format!("'{}' is already declared in this scope", name), span);
            }
        }
    }

    fn statement(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::VarDecl { kind, name, init } => self.var_decl(*kind, name, init.as_ref(), stmt.span),
            StmtKind::FunDecl { name, params, body } => self.fun_decl(name, params, body, stmt.span),
            StmtKind::IfStmt { cond, then_branch, else_branch } => {
                self.condition(cond, WarningKind::NonBooleanCondition);
                self.statement(then_branch);
                if let Some(branch) = else_branch {
                    self.statement(branch);
                }
            }
            StmtKind::WhileStmt { cond, body } => {
                self.condition(cond, WarningKind::NonBooleanCondition);
                self.statement(body);
            }
            StmtKind::ForStmt { init, cond, update, body } => self.for_stmt(init, cond, update, body),
            StmtKind::ReturnStmt { value } => {
                if self.function_depth == 0 {
                    self.error(ErrorKind::ReturnOutsideFunction, "'return' used outside of a function", stmt.span);
                }
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            StmtKind::Block(statements) => {
                self.scopes.push(ScopeKind::Block);
                for s in statements {
                    self.statement(s);
                }
                self.scopes.pop();
            }
            StmtKind::ExprStmt(expr) => {
                self.expr(expr);
            }
        }
    }

    fn condition(&mut self, expr: &Expr, kind: WarningKind) {
        let ty = self.expr(expr);
        if !matches!(ty, Type::Boolean | Type::Unknown) {
            self.warn(kind, format!("condition has type {} instead of Boolean", ty), expr.span);
        }
    }

    fn var_decl(&mut self, kind: DeclKind, name: &str, init: Option<&Expr>, span: Span) {
        let init_ty = init.map(|e| self.expr(e));
        let (symbol_kind, ty) = match kind {
            DeclKind::Let => (SymbolKind::Variable, init_ty.unwrap_or(Type::Unknown)),
            DeclKind::Const => (SymbolKind::Constant, init_ty.unwrap_or(Type::Unknown)),
        };
        self.declare(Symbol::new(name, symbol_kind, ty, span));
    }

    fn fun_decl(&mut self, name: &str, params: &[String], body: &[Stmt], span: Span) {
        let arity = Arity::Exact(params.len());
        let fn_type = Type::function(arity, Type::Unknown);
        self.declare(Symbol::new(name, SymbolKind::Function, fn_type, span).with_arity(arity));

        self.scopes.push(ScopeKind::Function);
        for param in params {
            self.declare(Symbol::new(param, SymbolKind::Parameter, Type::Unknown, span));
        }
        self.function_depth += 1;
        for stmt in body {
            self.statement(stmt);
        }
        self.function_depth -= 1;
        self.scopes.pop();
    }

    fn for_stmt(&mut self, init: &Option<Box<Stmt>>, cond: &Option<Expr>, update: &Option<Expr>, body: &Stmt) {
        // A `let`/`const` init clause lives in a fresh block scope wrapping
        // the whole loop, matching C-family scoping.
        self.scopes.push(ScopeKind::Block);
        if let Some(init) = init {
            self.statement(init);
        }
        if let Some(cond) = cond {
            self.condition(cond, WarningKind::NonBooleanCondition);
        }
        if let Some(update) = update {
            self.expr(update);
        }
        self.statement(body);
        self.scopes.pop();
    }

    fn expr(&mut self, expr: &Expr) -> Type {
        match &expr.kind {
            ExprKind::NumberLit(_) => Type::Number,
            ExprKind::StringLit(_) => Type::String,
            ExprKind::BoolLit(_) => Type::Boolean,
            ExprKind::Identifier(name) => self.identifier(name, expr.span),
            ExprKind::Assign { target, value } => self.assign(target, value, expr.span),
            ExprKind::Binary { op, left, right } => self.binary(*op, left, right, expr.span),
            ExprKind::Unary { op, operand } => self.unary(*op, operand),
            ExprKind::Call { callee, args } => self.call(callee, args, expr.span),
            ExprKind::Index { object, index } => self.index(object, index),
            ExprKind::Member { object, .. } => {
                self.expr(object);
                Type::Unknown
            }
        }
    }

    fn identifier(&mut self, name: &str, span: Span) -> Type {
        self.scopes.mark_used(name);
        match self.scopes.resolve(name) {
            Some(symbol) => symbol.ty.clone(),
            None => {
                self.error(
                    ErrorKind::UndeclaredVariable(name.to_string()),
                    format!("'{}' is not declared", name),
                    span,
                );
                Type::Unknown
            }
        }
    }

    fn assign(&mut self, target: &Expr, value: &Expr, span: Span) -> Type {
        let value_ty = self.expr(value);

        let ExprKind::Identifier(name) = &target.kind else {
            // Index/Member targets (or an invalid target the parser already
            // flagged) still need their object subexpressions visited.
            self.expr(target);
            return value_ty;
        };

        self.scopes.mark_used(name);
        let Some(symbol) = self.scopes.resolve(name) else {
            self.error(ErrorKind::UndeclaredVariable(name.clone()), format!("'{}' is not declared", name), target.span);
            return Type::Unknown;
        };

        if matches!(symbol.kind, SymbolKind::Constant | SymbolKind::Builtin) {
            self.error(ErrorKind::AssignToConstant(name.clone()), format!("cannot assign to constant '{}'", name), span);
            return value_ty;
        }

        let current_ty = symbol.ty.clone();
        if !current_ty.is_unknown() && !value_ty.is_unknown() && current_ty != value_ty {
            self.error(
                ErrorKind::TypeMismatch,
                format!("cannot assign {} to '{}' of type {}", value_ty, name, current_ty),
                span,
            );
            return Type::Unknown;
        }

        self.scopes.declare_refine(name, value_ty.clone());
        value_ty
    }

    fn binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, span: Span) -> Type {
        let left_ty = self.expr(left);
        let right_ty = self.expr(right);
        if left_ty.is_unknown() || right_ty.is_unknown() {
            return Type::Unknown;
        }
        match op {
            BinaryOp::Add => match (&left_ty, &right_ty) {
                (Type::Number, Type::Number) => Type::Number,
                (Type::String, _) | (_, Type::String) => Type::String,
                _ => {
                    self.error(ErrorKind::TypeMismatch, format!("cannot add {} and {}", left_ty, right_ty), span);
                    Type::Unknown
                }
            },
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                if left_ty == Type::Number && right_ty == Type::Number {
                    Type::Number
                } else {
                    self.error(
                        ErrorKind::TypeMismatch,
                        format!("arithmetic operator requires Number operands, found {} and {}", left_ty, right_ty),
                        span,
                    );
                    Type::Unknown
                }
            }
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                if left_ty == Type::Number && right_ty == Type::Number {
                    Type::Boolean
                } else {
                    self.error(
                        ErrorKind::TypeMismatch,
                        format!("comparison requires Number operands, found {} and {}", left_ty, right_ty),
                        span,
                    );
                    Type::Unknown
                }
            }
            BinaryOp::EqEq | BinaryOp::NotEq => {
                if left_ty != right_ty {
                    self.warn(
                        WarningKind::EqualityAcrossTypes,
                        format!("comparing {} with {} using '==' or '!='", left_ty, right_ty),
                        span,
                    );
                }
                Type::Boolean
            }
            BinaryOp::And | BinaryOp::Or => Type::Boolean,
        }
    }

    fn unary(&mut self, op: UnaryOp, operand: &Expr) -> Type {
        let ty = self.expr(operand);
        if ty.is_unknown() {
            return Type::Unknown;
        }
        match op {
            UnaryOp::Not => {
                if ty != Type::Boolean {
                    self.error(ErrorKind::TypeMismatch, format!("'!' requires a Boolean operand, found {}", ty), operand.span);
                    return Type::Unknown;
                }
                Type::Boolean
            }
            UnaryOp::Neg | UnaryOp::Plus => {
                if ty != Type::Number {
                    self.error(ErrorKind::TypeMismatch, format!("unary +/- requires a Number operand, found {}", ty), operand.span);
                    return Type::Unknown;
                }
                Type::Number
            }
        }
    }

    fn call(&mut self, callee: &Expr, args: &[Expr], span: Span) -> Type {
        let callee_ty = self.expr(callee);
        let arg_types: Vec<Type> = args.iter().map(|a| self.expr(a)).collect();
        let _ = arg_types;

        if let ExprKind::Identifier(name) = &callee.kind {
            self.scopes.mark_called(name);
        }

        let Type::Function { arity, return_type } = callee_ty else {
            if !matches!(callee_ty, Type::Unknown) {
                self.error(ErrorKind::NotCallable, "callee is not callable".to_string(), callee.span);
            }
            return Type::Unknown;
        };

        if !arity.accepts(args.len()) {
            self.error(
                ErrorKind::ArgumentCountMismatch,
                format!("expected {} argument(s), found {}", describe_arity(arity), args.len()),
                span,
            );
            return Type::Unknown;
        }

        *return_type
    }

    fn index(&mut self, object: &Expr, index: &Expr) -> Type {
        let object_ty = self.expr(object);
        let index_ty = self.expr(index);
        if !matches!(object_ty, Type::String | Type::Unknown) {
            self.error(
                ErrorKind::TypeMismatch,
                format!("cannot index into {}", object_ty),
                object.span,
            );
        }
        if index_ty != Type::Number && !index_ty.is_unknown() {
            self.error(ErrorKind::TypeMismatch, format!("index must be a Number, found {}", index_ty), index.span);
        }
        Type::Unknown
    }

    fn collect_post_pass_warnings(&mut self) {
        let root = self.scopes.root();
        self.walk_scope_for_warnings(root);
    }

    fn walk_scope_for_warnings(&mut self, id: joule_base::arena::Id<Scope>) {
        let (children, reports) = {
            let scope = self.scopes.get(id);
            let reports: Vec<_> = scope
                .symbols()
                .filter_map(|symbol| {
                    if matches!(symbol.kind, SymbolKind::Builtin) {
                        return None;
                    }
                    match symbol.kind {
                        SymbolKind::Variable | SymbolKind::Constant if !symbol.used => {
                            Some((WarningKind::UnusedVariable(symbol.name.clone()), symbol.declared_at, symbol.name.clone()))
                        }
                        SymbolKind::Parameter if !symbol.used => {
                            Some((WarningKind::UnusedParameter(symbol.name.clone()), symbol.declared_at, symbol.name.clone()))
                        }
                        SymbolKind::Function if !symbol.called => {
                            Some((WarningKind::UncalledFunction(symbol.name.clone()), symbol.declared_at, symbol.name.clone()))
                        }
                        _ => None,
                    }
                })
                .collect();
            (scope.children.clone(), reports)
        };
        for (kind, span, name) in reports {
            let message = match &kind {
                WarningKind::UnusedVariable(_) => format!("'{}' is never used", name),
                WarningKind::UnusedParameter(_) => format!("parameter '{}' is never used", name),
                WarningKind::UncalledFunction(_) => format!("function '{}' is never called", name),
                _ => unreachable!(),
            };
            self.warn(kind, message, span);
        }
        for child in children {
            self.walk_scope_for_warnings(child);
        }
    }
}

fn describe_arity(arity: Arity) -> String {
    match arity {
        Arity::Exact(n) => n.to_string(),
        Arity::Any => "any number of".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::Parser;

    fn analyze_source(source: &str) -> SemanticResult {
        let (tokens, _) = tokenize(source);
        let (program, _) = Parser::parse(&tokens);
        analyze(&program)
    }

    #[test]
    fn simple_declarations_type_as_number_with_no_errors() {
        let result = analyze_source("let x = 10; let y = 20; const z = x + y * 2;");
        assert!(result.errors.is_empty());
        assert!(result.warnings.iter().any(|w| matches!(&w.kind, WarningKind::UnusedVariable(n) if n == "z")));
    }

    #[test]
    fn recursive_function_resolves_itself_and_is_uncalled() {
        let result = analyze_source("function f(n) { if (n == 0) { return 1; } else { return n * f(n-1); } }");
        assert!(result.errors.is_empty());
        assert!(result.warnings.iter().any(|w| matches!(&w.kind, WarningKind::UncalledFunction(n) if n == "f")));
    }

    #[test]
    fn undeclared_variable_is_reported_but_declaration_still_happens() {
        let result = analyze_source("let x = undefinida + 5;");
        assert!(result.errors.iter().any(|e| matches!(&e.kind, ErrorKind::UndeclaredVariable(n) if n == "undefinida")));
        assert_eq!(result.scopes.resolve("x").unwrap().ty, Type::Unknown);
    }

    #[test]
    fn redeclaration_in_same_scope_is_an_error() {
        let result = analyze_source("let y = 10; let y = 20;");
        assert!(result.errors.iter().any(|e| matches!(&e.kind, ErrorKind::Redeclaration(n) if n == "y")));
    }

    #[test]
    fn assignment_to_const_is_an_error() {
        let result = analyze_source("let suma = 10 + \"texto\"; const pi = 3.14; pi = 3.1416;");
        assert!(result.errors.iter().any(|e| matches!(&e.kind, ErrorKind::AssignToConstant(n) if n == "pi")));
    }

    #[test]
    fn return_outside_function_is_an_error() {
        let result = analyze_source("return 1;");
        assert!(result.errors.iter().any(|e| e.kind == ErrorKind::ReturnOutsideFunction));
    }

    #[test]
    fn unknown_type_suppresses_cascading_errors() {
        let result = analyze_source("let x = undefinida + undefinida2;");
        let undeclared_count =
            result.errors.iter().filter(|e| matches!(e.kind, ErrorKind::UndeclaredVariable(_))).count();
        assert_eq!(undeclared_count, 2);
        assert!(!result.errors.iter().any(|e| matches!(e.kind, ErrorKind::TypeMismatch)));
    }
}
