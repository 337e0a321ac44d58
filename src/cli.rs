//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`], [`Dedup`], [`DateOrder`], [`InputFormat`] - value enums
//!   mirroring the library types, converted with `From`
//!
//! # Example
//!
//! ```rust
//! use chatlog::cli::Args;
//! use clap::Parser;
//!
//! let args = Args::parse_from(["chatlog", "-o", "out.html", "-i", "chat.txt", "mail", "-c"]);
//! assert_eq!(args.inputs.len(), 2);
//!
//! let config = args.pipeline_config();
//! assert!(config.collate);
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{EmailConfig, PipelineConfig, WhatsAppConfig};

/// Merge WhatsApp chat exports and email messages into one chronological,
/// deduplicated conversation page.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlog")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatlog -o family.html -i 'WhatsApp Chat with Family.txt'
    chatlog -o family.html -i chat.txt mail/1 mail/2 -c
    chatlog -o history.json -i old.txt new.txt --dedup exhaustive
    chatlog -o chat.html -i us_export.txt --date-order month-first --utc-offset -05:00")]
pub struct Args {
    /// Path to output file
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Input files: WhatsApp exports and/or single email messages
    #[arg(short = 'i', long = "input", value_name = "INPUT", num_args = 1.., required = true)]
    pub inputs: Vec<PathBuf>,

    /// Style sheet to embed instead of the built-in one
    #[arg(short, long, value_name = "STYLE")]
    pub style: Option<PathBuf>,

    /// Combine consecutive messages from the same sender
    #[arg(short, long)]
    pub collate: bool,

    /// How duplicate messages are detected
    #[arg(long, value_enum, default_value_t = Dedup::Adjacent)]
    pub dedup: Dedup,

    /// Preferred date order for ambiguous WhatsApp dates such as 01/02/23
    #[arg(long, value_enum, default_value_t = DateOrder::DayFirst)]
    pub date_order: DateOrder,

    /// UTC offset of timestamps that carry no zone (+HH:MM)
    #[arg(
        long,
        value_name = "OFFSET",
        default_value = "+00:00",
        value_parser = parse_utc_offset,
        allow_hyphen_values = true
    )]
    pub utc_offset: i32,

    /// Output format (default: from the output file extension, else HTML)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Input format (default: detected per file)
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub input_format: InputFormat,

    /// Decode MIME email bodies (transfer encoding, charset, multipart)
    #[arg(long)]
    pub decode_mime: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Builds the pipeline configuration from the parsed arguments.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let config = PipelineConfig::new()
            .with_whatsapp(
                WhatsAppConfig::new()
                    .with_date_order(self.date_order.into())
                    .with_utc_offset_minutes(self.utc_offset),
            )
            .with_email(
                EmailConfig::new()
                    .with_utc_offset_minutes(self.utc_offset)
                    .with_decode_mime(self.decode_mime),
            )
            .with_dedup(self.dedup.into())
            .with_collate(self.collate);

        match Option::<crate::parser::InputFormat>::from(self.input_format) {
            Some(format) => config.with_input_format(format),
            None => config,
        }
    }

    /// The requested output format, or the one implied by the output path.
    pub fn output_format(&self) -> crate::format::OutputFormat {
        self.format
            .map(Into::into)
            .unwrap_or_else(|| crate::format::OutputFormat::from_path(&self.output))
    }
}

/// Parses a UTC offset such as `+02:00`, `-0530`, `+5` or `Z` into minutes.
///
/// # Example
///
/// ```rust
/// use chatlog::cli::parse_utc_offset;
///
/// assert_eq!(parse_utc_offset("+02:00"), Ok(120));
/// assert_eq!(parse_utc_offset("-0530"), Ok(-330));
/// assert!(parse_utc_offset("02:00").is_err());
/// ```
pub fn parse_utc_offset(s: &str) -> Result<i32, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Ok(0);
    }

    let invalid = || format!("Invalid UTC offset: '{s}'. Expected +HH:MM or -HH:MM");
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };

    let (hours, minutes) = match rest.split_once(':') {
        Some(parts) => parts,
        None if rest.len() == 4 && rest.is_ascii() => rest.split_at(2),
        None => (rest, "0"),
    };
    let number = |part: &str| -> Result<i32, String> {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse().map_err(|_| invalid())
    };

    let (hours, minutes) = (number(hours)?, number(minutes)?);
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    Ok(sign * (hours * 60 + minutes))
}

/// Output format options.
///
/// # Example
///
/// ```rust
/// use chatlog::cli::OutputFormat;
///
/// let format = OutputFormat::Jsonl;
/// println!("Format: {}", format); // "JSONL"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Self-contained HTML page (default)
    #[default]
    Html,

    /// JSON array of messages
    Json,

    /// JSON Lines - one JSON object per line
    #[value(alias = "ndjson")]
    Jsonl,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::OutputFormat::from(*self))
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Html => crate::format::OutputFormat::Html,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
        }
    }
}

/// Duplicate detection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dedup {
    /// Drop a message equal to the one just before it
    #[default]
    Adjacent,

    /// Drop a message equal to any earlier one
    Exhaustive,

    /// Keep everything
    Off,
}

impl From<Dedup> for crate::config::DedupMode {
    fn from(dedup: Dedup) -> crate::config::DedupMode {
        match dedup {
            Dedup::Adjacent => crate::config::DedupMode::Adjacent,
            Dedup::Exhaustive => crate::config::DedupMode::Exhaustive,
            Dedup::Off => crate::config::DedupMode::Off,
        }
    }
}

/// Preferred order for ambiguous WhatsApp dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    /// 01/02/23 is 1 February
    #[default]
    DayFirst,

    /// 01/02/23 is 2 January
    MonthFirst,
}

impl From<DateOrder> for crate::config::DateOrder {
    fn from(order: DateOrder) -> crate::config::DateOrder {
        match order {
            DateOrder::DayFirst => crate::config::DateOrder::DayFirst,
            DateOrder::MonthFirst => crate::config::DateOrder::MonthFirst,
        }
    }
}

/// Input format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Detect from each file's content
    #[default]
    Auto,

    /// WhatsApp chat export
    #[value(name = "whatsapp", alias = "wa")]
    WhatsApp,

    /// Single email message
    #[value(alias = "mail")]
    Email,
}

impl From<InputFormat> for Option<crate::parser::InputFormat> {
    fn from(format: InputFormat) -> Option<crate::parser::InputFormat> {
        match format {
            InputFormat::Auto => None,
            InputFormat::WhatsApp => Some(crate::parser::InputFormat::WhatsApp),
            InputFormat::Email => Some(crate::parser::InputFormat::Email),
        }
    }
}
