//! Output format writers.
//!
//! This module provides writers for the supported output formats:
//! - [`write_html`] / [`to_html`] - browsable conversation page (always available)
//! - [`write_json`] / [`to_json`] - JSON array of messages - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines, one message per line - requires `json-output` feature
//!
//! Every `write_*` function renders the whole document in memory first and
//! then hands it to [`write_atomic`], so a failed run never leaves a
//! truncated file behind.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> chatlog::Result<()> {
//! use chatlog::core::output::{to_html, write_html};
//! use chatlog::core::models::OutputConfig;
//! use chatlog::{Message, SourceKind};
//! use chrono::Utc;
//!
//! let messages = vec![
//!     Message::new("Alice", "Hello!", Utc::now(), SourceKind::WhatsApp),
//!     Message::new("Bob", "Hi there!", Utc::now(), SourceKind::WhatsApp),
//! ];
//!
//! let config = OutputConfig::new().with_input_names(["family"]);
//!
//! write_html(&messages, "family.html", &config)?;
//!
//! // Or get the document as a string
//! let html = to_html(&messages, &config);
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ChatlogError, Result};

mod html_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

pub use html_writer::{escape_html, to_html, write_html};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

/// Writes `contents` to `path` through a temporary file in the same
/// directory, renamed over the destination once fully written.
///
/// Any failure is reported as [`ChatlogError::OutputWrite`] and leaves the
/// destination untouched.
pub fn write_atomic(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file =
        NamedTempFile::new_in(dir).map_err(|e| ChatlogError::output_write(path, e))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| ChatlogError::output_write(path, e))?;
    file.persist(path)
        .map_err(|e| ChatlogError::output_write(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.html");

        write_atomic(&path, "<p>hi</p>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>hi</p>");
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.html");
        std::fs::write(&path, "old contents that are longer").unwrap();

        write_atomic(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.html");

        let err = write_atomic(&path, "x").unwrap_err();
        assert!(err.is_output_write());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        write_atomic(dir.path().join("a.json"), "[]").unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
