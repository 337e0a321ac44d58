//! Unified error types for chatlog.
//!
//! This module provides a single [`ChatlogError`] enum that covers every
//! failure the pipeline can report, plus the [`ParseError`] carried by the
//! format parsers.
//!
//! # Error Handling Philosophy
//!
//! - A parse error in any input aborts the whole run; partial conversations
//!   would silently misrepresent the history.
//! - Every error names the file involved and, for parse failures, the
//!   offending line, so the message is actionable on its own.
//! - Nothing is retried: all inputs are local files.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A specialized [`Result`] type for chatlog operations.
///
/// # Example
///
/// ```rust
/// use chatlog::error::Result;
/// use chatlog::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatlogError>;

/// The error type for all chatlog operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatlogError {
    /// An input file could not be parsed.
    ///
    /// Contains the file, line number and line text where available.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An input or style file does not exist.
    #[error("Input file not found: {}", path.display())]
    InputNotFound {
        /// The missing path
        path: PathBuf,
    },

    /// The output destination could not be written.
    #[error("Cannot write output to {}: {source}", path.display())]
    OutputWrite {
        /// The destination path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The requested output format is unknown or not compiled in.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// What kind of format was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// Any other I/O error (e.g. permission denied while reading an input).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatlogError {
    /// Creates an input-not-found error.
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        ChatlogError::InputNotFound { path: path.into() }
    }

    /// Creates an output-write error.
    pub fn output_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ChatlogError::OutputWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatlogError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ChatlogError::Parse(_))
    }

    /// Returns `true` if an input or style file was missing.
    pub fn is_input_not_found(&self) -> bool {
        matches!(self, ChatlogError::InputNotFound { .. })
    }

    /// Returns `true` if the output could not be written.
    pub fn is_output_write(&self) -> bool {
        matches!(self, ChatlogError::OutputWrite { .. })
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatlogError::Io(_))
    }
}

/// A malformed or unrecognized header or timestamp in an input file.
///
/// Parsers work on file contents and do not know the file name; the
/// pipeline attaches it with [`ParseError::in_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Short name of the format being parsed ("WhatsApp", "email")
    pub format: &'static str,
    /// What went wrong
    pub message: String,
    /// The input file, once known
    pub path: Option<PathBuf>,
    /// 1-based line number of the offending line
    pub line_number: Option<usize>,
    /// Text of the offending line
    pub line: Option<String>,
}

impl ParseError {
    /// Creates a parse error without position information.
    pub fn new(format: &'static str, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
            path: None,
            line_number: None,
            line: None,
        }
    }

    /// Creates a parse error pointing at a specific line.
    pub fn at_line(
        format: &'static str,
        message: impl Into<String>,
        line_number: usize,
        line: impl Into<String>,
    ) -> Self {
        Self {
            line_number: Some(line_number),
            line: Some(line.into()),
            ..Self::new(format, message)
        }
    }

    /// Attaches the file the error occurred in.
    #[must_use]
    pub fn in_file(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to parse {} export", self.format)?;
        if let Some(path) = &self.path {
            write!(f, " (file: {})", path.display())?;
        }
        if let Some(n) = self.line_number {
            write!(f, " at line {n}")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(line) = &self.line {
            write!(f, ": {line:?}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
