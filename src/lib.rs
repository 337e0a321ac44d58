//! # Chatlog
//!
//! A Rust library for turning WhatsApp chat exports and email messages into
//! one chronologically ordered, deduplicated conversation view.
//!
//! ## Overview
//!
//! Chatlog reads two kinds of input:
//! - **WhatsApp** - "Export chat" text files (Android and iOS layouts, any
//!   day/month order, 12h or 24h clocks)
//! - **Email** - single MH-style message files (`From:`/`Date:` headers, blank
//!   line, body)
//!
//! The format of each file is detected from its content. All records are
//! merged on one timeline, duplicates from overlapping exports are dropped,
//! and runs of messages from the same sender can optionally be collated into
//! one speech bubble. The result is rendered as a self-contained HTML page,
//! or as JSON / JSON Lines.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatlog::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let inputs = [
//!         InputFile::new("family.txt", "1/1/23, 09:00 - Alice: Hi\n1/1/23, 09:01 - Bob: Hello\n"),
//!         InputFile::new("carol.eml", "From: Carol\nDate: 1/1/23, 08:30\n\nMorning all\n"),
//!     ];
//!
//!     let config = PipelineConfig::new().with_collate(true);
//!     let html = render(&inputs, &config, DEFAULT_CSS)?;
//!     assert!(html.contains("<title>family, carol</title>"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing a single file
//!
//! ```rust
//! use chatlog::parsers::WhatsAppParser;
//!
//! let export = "13/01/18, 01:23 - Fake Name: line1\nline2\n13/01/18, 01:24 - Name Two: hi\n";
//! let parser = WhatsAppParser::new();
//! for msg in parser.messages(export)? {
//!     println!("{}: {}", msg.sender, msg.body);
//! }
//! # Ok::<(), chatlog::error::ParseError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`pipeline`] - [`InputFile`](pipeline::InputFile), [`process`](pipeline::process),
//!   [`render`](pipeline::render), file reading helpers
//! - [`parser`] - [`Parser`](parser::Parser) trait, [`InputFormat`](parser::InputFormat)
//!   detection, [`create_parser`](parser::create_parser)
//! - [`parsers`] - [`WhatsAppParser`](parsers::WhatsAppParser), [`EmailParser`](parsers::EmailParser)
//! - [`parsing`] - Header splitting and date/time interpretation shared by the parsers
//! - [`config`] - Parser, merge and pipeline configuration
//! - [`core`] - Merge, collation and output writers
//! - [`format`] - [`OutputFormat`](format::OutputFormat) selection
//! - [`message`] - [`Message`] record
//! - [`error`] - Unified error types ([`ChatlogError`], [`Result`])
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod message;
pub mod parser;
pub mod parsers;
pub mod parsing;
pub mod pipeline;

// Re-export the main types at the crate root for convenience
pub use error::{ChatlogError, Result};
pub use message::{Message, SourceKind};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatlog::prelude::*;
/// ```
pub mod prelude {
    // Core message type
    pub use crate::message::{Message, SYSTEM_SENDER, SourceKind};

    // Error types
    pub use crate::error::{ChatlogError, ParseError, Result};

    // Parser API
    pub use crate::parser::{InputFormat, Parser, create_parser};
    pub use crate::parsers::{EmailParser, WhatsAppParser};

    // Configuration
    pub use crate::config::{
        DateOrder, DedupMode, EmailConfig, MergeConfig, PipelineConfig, WhatsAppConfig,
    };

    // Processing
    pub use crate::core::merge::merge_sources;
    pub use crate::core::models::{DEFAULT_CSS, OutputConfig};
    pub use crate::core::processor::{ProcessingStats, collate_consecutive};

    // Output
    pub use crate::core::output::{to_html, write_atomic, write_html};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
    pub use crate::format::{OutputFormat, to_format_string, write_to_format};

    // Pipeline
    pub use crate::pipeline::{InputFile, process, read_inputs, read_style, render};
}
