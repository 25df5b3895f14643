//! Joule CLI (`joulec`) — standalone binary.
//!
//! The binary is a thin wrapper around [`joule_cli::run_cli`], handling
//! error display and exit codes. All command logic is implemented in the
//! library crate for testability.
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Error (message printed to stderr, or the analyzed source had
//!   errors)

fn main() {
    if let Err(e) = joule_cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
