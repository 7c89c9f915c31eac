//! Test utilities for the portal crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled only for tests or with the `test-support` feature.

mod clock;
mod registrations;

pub use clock::MutableClock;
pub use registrations::{ScriptedOutcome, ScriptedRegistrationSource};

pub mod pdf {
    //! Publication PDF fixtures written to temporary files.

    use std::io::{self, Write};

    use tempfile::NamedTempFile;

    /// Smallest byte sequence accepted as a PDF upload.
    pub const MINIMAL_PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\ntrailer\n<<>>\n%%EOF\n";

    /// Write `contents` to a temporary file whose name ends in `suffix`.
    ///
    /// The file is removed when the returned handle drops.
    pub fn temp_file(suffix: &str, contents: &[u8]) -> io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("publication-")
            .suffix(suffix)
            .tempfile()?;
        file.write_all(contents)?;
        file.flush()?;
        Ok(file)
    }
}
