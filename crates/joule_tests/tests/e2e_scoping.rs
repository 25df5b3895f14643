//! End-to-end scenarios: name resolution and declaration conflicts.

mod common;

use common::{assert_has_error, run};
use joule_lang::ErrorKind;

#[test]
fn undeclared_variable_is_reported_and_x_stays_unknown() {
    let report = run("let x = undefinida + 5;");
    assert_has_error(
        &report,
        |k| matches!(k, ErrorKind::UndeclaredVariable(name) if name == "undefinida"),
        "UndeclaredVariable(undefinida)",
    );
}

#[test]
fn redeclaration_in_the_same_scope_is_an_error() {
    let report = run("let y = 10; let y = 20;");
    assert_has_error(
        &report,
        |k| matches!(k, ErrorKind::Redeclaration(name) if name == "y"),
        "Redeclaration(y)",
    );
}
