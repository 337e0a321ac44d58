//! Unified parser trait and input format detection.
//!
//! Input files carry no reliable extension, so the format is detected from
//! content: a leading WhatsApp header line selects the chat parser, a leading
//! RFC 822 style `Name: value` header selects the email parser.
//!
//! # Example
//!
//! ```rust
//! use chatlog::parser::{InputFormat, create_parser};
//! use chatlog::config::PipelineConfig;
//!
//! let content = "1/1/23, 09:00 - Alice: Hi\n1/1/23, 09:01 - Bob: Hello\n";
//! let format = InputFormat::detect(content).unwrap();
//! assert_eq!(format, InputFormat::WhatsApp);
//!
//! let parser = create_parser(format, &PipelineConfig::new());
//! let messages = parser.parse_str(content)?;
//! assert_eq!(messages.len(), 2);
//! # Ok::<(), chatlog::error::ParseError>(())
//! ```

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Message;
use crate::config::PipelineConfig;
use crate::error::{ChatlogError, ParseError};
use crate::parsers::{EmailParser, WhatsAppParser};
use crate::parsing::whatsapp::is_header_candidate;

/// RFC 822 header field: printable ASCII name without spaces or colons.
static EMAIL_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[!-9;-~]+:(?:[ \t]|$)").expect("valid regex"));

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum InputFormat {
    /// WhatsApp chat-log text export
    #[serde(alias = "wa")]
    WhatsApp,

    /// Single MH-style email message
    #[serde(alias = "mail")]
    Email,
}

impl InputFormat {
    /// Detects the format from the first non-blank line of `content`.
    ///
    /// Returns `None` when neither a WhatsApp header nor an email header
    /// opens the file.
    pub fn detect(content: &str) -> Option<InputFormat> {
        let first = content
            .trim_start_matches('\u{feff}')
            .lines()
            .find(|line| !line.trim().is_empty())?;

        if is_header_candidate(first) {
            Some(InputFormat::WhatsApp)
        } else if EMAIL_HEADER.is_match(first) {
            Some(InputFormat::Email)
        } else {
            None
        }
    }

    /// Returns all format names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &["whatsapp", "wa", "email", "mail"]
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::WhatsApp => write!(f, "WhatsApp"),
            InputFormat::Email => write!(f, "email"),
        }
    }
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whatsapp" | "wa" => Ok(InputFormat::WhatsApp),
            "email" | "mail" => Ok(InputFormat::Email),
            _ => Err(format!(
                "Unknown input format: '{}'. Expected one of: {}",
                s,
                InputFormat::all_names().join(", ")
            )),
        }
    }
}

/// A parser turning the text of one input file into message records.
///
/// Implementations are pure: the same content always yields the same
/// records, and nothing is shared between calls.
pub trait Parser: Send + Sync {
    /// Returns the human-readable name of the parser.
    fn name(&self) -> &'static str;

    /// Returns the format this parser handles.
    fn format(&self) -> InputFormat;

    /// Parses the full text of one file.
    fn parse_str(&self, content: &str) -> Result<Vec<Message>, ParseError>;

    /// Reads and parses a file; parse errors name the file.
    fn parse(&self, path: &Path) -> Result<Vec<Message>, ChatlogError> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ChatlogError::input_not_found(path)
            } else {
                ChatlogError::Io(e)
            }
        })?;
        self.parse_str(&content)
            .map_err(|e| ChatlogError::Parse(e.in_file(path)))
    }
}

/// Creates a parser for the given format using the pipeline's settings.
///
/// # Example
///
/// ```rust
/// use chatlog::parser::{InputFormat, create_parser};
/// use chatlog::config::PipelineConfig;
///
/// let parser = create_parser(InputFormat::Email, &PipelineConfig::new());
/// assert_eq!(parser.name(), "email");
/// ```
pub fn create_parser(format: InputFormat, config: &PipelineConfig) -> Box<dyn Parser> {
    match format {
        InputFormat::WhatsApp => Box::new(WhatsAppParser::with_config(config.whatsapp.clone())),
        InputFormat::Email => Box::new(EmailParser::with_config(config.email.clone())),
    }
}
