//! End-to-end scenarios: typing rules for operators and assignment targets.

mod common;

use common::{assert_has_error, run};
use joule_lang::ErrorKind;

#[test]
fn plus_with_string_operand_concatenates_and_const_assignment_fails() {
    let report = run(r#"let suma = 10 + "texto"; const pi = 3.14; pi = 3.1416;"#);
    assert!(
        !report.errors.iter().any(|e| matches!(&e.kind, ErrorKind::TypeMismatch)),
        "the `+` on Number and String should concatenate, not mismatch: {:?}",
        report.errors
    );
    assert_has_error(
        &report,
        |k| matches!(k, ErrorKind::AssignToConstant(name) if name == "pi"),
        "AssignToConstant(pi)",
    );
}

#[test]
fn return_outside_a_function_is_an_error() {
    let report = run("return 1;");
    assert_has_error(&report, |k| matches!(k, ErrorKind::ReturnOutsideFunction), "ReturnOutsideFunction");
}
