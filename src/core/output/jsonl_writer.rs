//! JSON Lines (JSONL) output writer.
//!
//! One message per line, in conversation order. Handy for feeding the
//! merged history to line-oriented tools (`jq -c`, `grep`, search indexers).

use std::path::Path;

use super::json_writer::JsonMessage;
use super::write_atomic;
use crate::Message;
use crate::core::models::OutputConfig;
use crate::error::Result;

/// Writes messages to JSONL (JSON Lines) format.
///
/// Each line is a valid JSON object:
/// ```jsonl
/// {"sender":"Alice","body":"Hello","timestamp":"2023-01-01T09:00:00+00:00","source":"whatsapp"}
/// {"sender":"Carol","body":"Morning","timestamp":"2023-01-01T09:01:00+00:00","source":"email"}
/// ```
pub fn write_jsonl(
    messages: &[Message],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let jsonl = to_jsonl(messages, config)?;
    write_atomic(output_path, &jsonl)
}

/// Converts messages to a JSONL string, one line per message.
pub fn to_jsonl(messages: &[Message], config: &OutputConfig) -> Result<String> {
    let mut out = String::new();
    for msg in messages {
        let line = serde_json::to_string(&JsonMessage::from_message(msg, config))?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}
