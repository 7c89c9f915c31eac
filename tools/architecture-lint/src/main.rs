//! Command-line entry point for the portal layering check.

use std::io::Write;
use std::process::ExitCode;

use architecture_lint::lint_portal;
use camino::{Utf8Path, Utf8PathBuf};

fn default_portal_dir() -> Utf8PathBuf {
    Utf8Path::new(env!("CARGO_MANIFEST_DIR")).join("../../portal")
}

fn main() -> ExitCode {
    let portal_dir = std::env::args()
        .nth(1)
        .map_or_else(default_portal_dir, Utf8PathBuf::from);
    let mut stderr = std::io::stderr().lock();
    match lint_portal(&portal_dir) {
        Ok(()) => {
            let _ = writeln!(stderr, "architecture lint: {portal_dir} is clean");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = write!(stderr, "architecture lint: {error}");
            ExitCode::FAILURE
        }
    }
}
