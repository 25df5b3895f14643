//! End-to-end scenario: plain variable declarations with no control flow.

mod common;

use common::{assert_no_errors, has_warning, run};
use joule_lang::{ast::StmtKind, WarningKind};

#[test]
fn simple_declarations_produce_three_var_decls_and_no_errors() {
    let report = run("let x = 10; let y = 20; const z = x + y * 2;");
    let program = report.ast.as_ref().unwrap();
    assert_eq!(program.statements.len(), 3);
    assert!(program
        .statements
        .iter()
        .all(|stmt| matches!(stmt.kind, StmtKind::VarDecl { .. })));
    assert_no_errors(&report);
    assert!(
        has_warning(&report, |w| matches!(w, WarningKind::UnusedVariable(name) if name == "z")),
        "expected an UnusedVariable(z) warning, found: {:?}",
        report.warnings
    );
}
