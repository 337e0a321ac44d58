//! The ingestion pipeline: input files in, one conversation out.
//!
//! ```text
//! InputFile ─► detect format ─► parse ─┐
//! InputFile ─► detect format ─► parse ─┼─► merge + dedup ─► [collate] ─► render
//! InputFile ─► detect format ─► parse ─┘
//! ```
//!
//! [`process`] and [`render`] work on file contents already in memory and
//! never touch the filesystem. [`read_inputs`] and [`read_style`] do the
//! reading; [`write_atomic`](crate::core::output::write_atomic) does the
//! writing, and only after every earlier stage succeeded.
//!
//! # Example
//!
//! ```rust
//! use chatlog::pipeline::{InputFile, process};
//! use chatlog::config::PipelineConfig;
//!
//! let chat = InputFile::new(
//!     "chat.txt",
//!     "1/1/23, 09:00 - Alice: Hi\n1/1/23, 09:01 - Bob: Hello\n",
//! );
//! let mail = InputFile::new(
//!     "carol.eml",
//!     "From: Carol\nDate: 1/1/23, 08:30\n\nMorning all\n",
//! );
//!
//! let messages = process(&[chat, mail], &PipelineConfig::new())?;
//! let senders: Vec<_> = messages.iter().map(|m| m.sender.as_str()).collect();
//! assert_eq!(senders, ["Carol", "Alice", "Bob"]);
//! # Ok::<(), chatlog::ChatlogError>(())
//! ```

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::Message;
use crate::config::PipelineConfig;
use crate::core::models::{DEFAULT_CSS, OutputConfig};
use crate::core::{collate_consecutive, merge_sources, to_html};
use crate::error::{ChatlogError, ParseError, Result};
use crate::parser::{InputFormat, create_parser};

/// One input file: its name as given by the user and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub content: String,
}

impl InputFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Base name without directory or extension, as shown in rendered output.
    ///
    /// ```rust
    /// use chatlog::pipeline::InputFile;
    ///
    /// assert_eq!(InputFile::new("exports/Family chat.txt", "").display_name(), "Family chat");
    /// ```
    pub fn display_name(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.name)
    }
}

/// Parses one file, detecting its format unless one is forced.
///
/// A blank file yields no messages; any other file whose format cannot be
/// detected is a parse error.
pub fn parse_input(input: &InputFile, config: &PipelineConfig) -> Result<Vec<Message>> {
    let format = match config.input_format {
        Some(format) => format,
        None => match InputFormat::detect(&input.content) {
            Some(format) => format,
            None if input.content.trim_start_matches('\u{feff}').trim().is_empty() => {
                warn!(file = %input.name, "input is empty");
                return Ok(Vec::new());
            }
            None => {
                return Err(ParseError::new(
                    "input",
                    "unrecognized input format: neither a WhatsApp export nor an email message",
                )
                .in_file(&input.name)
                .into());
            }
        },
    };

    let parser = create_parser(format, config);
    let messages = parser
        .parse_str(&input.content)
        .map_err(|e| e.in_file(&input.name))?;

    debug!(
        file = %input.name,
        format = parser.name(),
        messages = messages.len(),
        "parsed input"
    );
    Ok(messages)
}

/// Parses every input, merges them chronologically and optionally collates.
///
/// The first parse error aborts the run.
pub fn process(inputs: &[InputFile], config: &PipelineConfig) -> Result<Vec<Message>> {
    let sources = inputs
        .iter()
        .map(|input| parse_input(input, config))
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_sources(sources, &config.merge);
    if config.collate {
        let collated = collate_consecutive(&merged);
        debug!(before = merged.len(), after = collated.len(), "collated messages");
        Ok(collated)
    } else {
        Ok(merged)
    }
}

/// Rendering configuration for a set of inputs: their display names as
/// headings, the given style sheet, and timestamps shown in the pipeline's
/// WhatsApp offset.
pub fn output_config(inputs: &[InputFile], config: &PipelineConfig, css: &str) -> OutputConfig {
    OutputConfig::new()
        .with_input_names(inputs.iter().map(InputFile::display_name))
        .with_css(css)
        .with_display_offset(config.whatsapp.offset())
}

/// Runs [`process`] and renders the result as an HTML document.
pub fn render(inputs: &[InputFile], config: &PipelineConfig, css: &str) -> Result<String> {
    let messages = process(inputs, config)?;
    Ok(to_html(&messages, &output_config(inputs, config, css)))
}

fn read_text(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ChatlogError::input_not_found(path)
        } else {
            ChatlogError::Io(e)
        }
    })?;
    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Reads input files in the given order, stripping any UTF-8 byte order mark.
pub fn read_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<InputFile>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let content = read_text(path)?;
            Ok(InputFile::new(path.display().to_string(), content))
        })
        .collect()
}

/// Reads a style sheet, or returns the built-in one when no path is given.
pub fn read_style(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => read_text(path),
        None => Ok(DEFAULT_CSS.to_string()),
    }
}
