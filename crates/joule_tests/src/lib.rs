//! End-to-end test suite for the Joule analysis pipeline.
//!
//! This crate exists only to run the integration tests under `tests/`. All
//! actual test code lives in `tests/*.rs`, each driving the pipeline
//! through [`joule_lang::analyze`] and asserting on the resulting
//! [`joule_lang::Report`].
