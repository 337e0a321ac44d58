//! Output format types for the chatlog library.
//!
//! These types carry no CLI dependencies, so library users can pick an
//! output format without pulling in `clap`.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn example() -> chatlog::Result<()> {
//! use chatlog::format::{OutputFormat, write_to_format};
//! use chatlog::core::models::OutputConfig;
//! use chatlog::{Message, SourceKind};
//! use chrono::Utc;
//!
//! let messages = vec![Message::new("Alice", "Hello!", Utc::now(), SourceKind::WhatsApp)];
//!
//! // Write using format enum
//! write_to_format(&messages, "output.html", OutputFormat::Html, &OutputConfig::new())?;
//!
//! // Or use format detection from extension
//! let format = OutputFormat::from_path("output.jsonl");
//! assert_eq!(format, OutputFormat::Jsonl);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Message;
use crate::core::models::OutputConfig;
use crate::error::ChatlogError;

/// Output format for the merged conversation.
///
/// - [`Html`](OutputFormat::Html) - Browsable conversation page (default)
/// - [`Json`](OutputFormat::Json) - Structured array, good for scripts
/// - [`Jsonl`](OutputFormat::Jsonl) - One JSON per line
///
/// # Example
///
/// ```rust
/// use chatlog::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("jsonl").unwrap();
/// assert_eq!(format, OutputFormat::Jsonl);
/// assert_eq!(format.to_string(), "JSONL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// Self-contained HTML page with embedded style sheet
    #[default]
    Html,

    /// JSON array of messages
    Json,

    /// JSON Lines - one JSON object per line
    ///
    /// Also known as NDJSON.
    Jsonl,
}

impl OutputFormat {
    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["html", "json", "jsonl", "ndjson"]
    }

    /// Picks the format from a file path's extension.
    ///
    /// `.json` and `.jsonl`/`.ndjson` select the JSON writers; anything else,
    /// including no extension at all, is HTML.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatlog::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("out.JSON"), OutputFormat::Json);
    /// assert_eq!(OutputFormat::from_path("chat.htm"), OutputFormat::Html);
    /// assert_eq!(OutputFormat::from_path("chat"), OutputFormat::Html);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "json" => OutputFormat::Json,
            "jsonl" | "ndjson" => OutputFormat::Jsonl,
            _ => OutputFormat::Html,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Html => write!(f, "HTML"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Writes messages to a file in the specified format.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_to_format(
    messages: &[Message],
    path: impl AsRef<Path>,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<(), ChatlogError> {
    match format {
        OutputFormat::Html => crate::core::output::write_html(messages, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(messages, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(messages, path, config),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

/// Converts messages to a string in the specified format.
#[allow(unused_variables)]
pub fn to_format_string(
    messages: &[Message],
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<String, ChatlogError> {
    match format {
        OutputFormat::Html => Ok(crate::core::output::to_html(messages, config)),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(messages, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(messages, config),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

#[allow(dead_code)]
fn missing_feature(format: OutputFormat) -> ChatlogError {
    ChatlogError::invalid_format(
        "output",
        format!("Output format {format:?} requires the 'json-output' feature to be enabled"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("html").unwrap(), OutputFormat::Html);
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("jsonl").unwrap(), OutputFormat::Jsonl);
        assert_eq!(OutputFormat::from_str("ndjson").unwrap(), OutputFormat::Jsonl);
        assert_eq!(OutputFormat::from_str("HTML").unwrap(), OutputFormat::Html);
        assert!(OutputFormat::from_str("csv").is_err());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::Html.to_string(), "HTML");
        assert_eq!(OutputFormat::Json.to_string(), "JSON");
        assert_eq!(OutputFormat::Jsonl.to_string(), "JSONL");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path("output.html"), OutputFormat::Html);
        assert_eq!(OutputFormat::from_path("output.json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path("output.jsonl"), OutputFormat::Jsonl);
        assert_eq!(OutputFormat::from_path("output.ndjson"), OutputFormat::Jsonl);
        assert_eq!(OutputFormat::from_path("/path/to/file.JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path("output.txt"), OutputFormat::Html);
        assert_eq!(OutputFormat::from_path("json"), OutputFormat::Html);
    }

    #[test]
    fn test_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Html);
    }

    #[test]
    fn test_to_format_string_html() {
        let html = to_format_string(&[], OutputFormat::Html, &OutputConfig::new()).unwrap();
        assert!(html.contains("speech-wrapper"));
    }

    #[cfg(feature = "json-output")]
    #[test]
    fn test_format_serde() {
        let json = serde_json::to_string(&OutputFormat::Jsonl).unwrap();
        assert_eq!(json, "\"jsonl\"");

        let parsed: OutputFormat = serde_json::from_str("\"html\"").unwrap();
        assert_eq!(parsed, OutputFormat::Html);
    }
}
