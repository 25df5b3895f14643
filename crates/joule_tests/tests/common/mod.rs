//! Shared test harness for the end-to-end suite.
//!
//! Provides small assertion helpers over [`joule_lang::Report`] so
//! individual scenario tests read as a source snippet plus the handful of
//! facts about it that matter, rather than re-deriving the same
//! `report.errors.iter().any(...)` boilerplate each time.

use joule_lang::{analyze, Diagnostic, ErrorKind, Report, Warning, WarningKind};

pub fn run(source: &str) -> Report {
    analyze(source)
}

pub fn assert_no_errors(report: &Report) {
    assert!(report.errors.is_empty(), "expected no errors, found: {:?}", report.errors);
}

pub fn has_error(report: &Report, predicate: impl Fn(&ErrorKind) -> bool) -> bool {
    report.errors.iter().any(|d: &Diagnostic| predicate(&d.kind))
}

pub fn has_warning(report: &Report, predicate: impl Fn(&WarningKind) -> bool) -> bool {
    report.warnings.iter().any(|w: &Warning| predicate(&w.kind))
}

pub fn assert_has_error(report: &Report, predicate: impl Fn(&ErrorKind) -> bool, description: &str) {
    assert!(
        has_error(report, predicate),
        "expected an error matching '{}', found: {:?}",
        description,
        report.errors
    );
}

pub fn assert_has_warning(report: &Report, predicate: impl Fn(&WarningKind) -> bool, description: &str) {
    assert!(
        has_warning(report, predicate),
        "expected a warning matching '{}', found: {:?}",
        description,
        report.warnings
    );
}
