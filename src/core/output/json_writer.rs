//! JSON output writer.

use std::path::Path;

use serde::Serialize;

use super::write_atomic;
use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::{Message, SourceKind};

/// Message shape shared by the JSON and JSONL writers.
/// The timestamp is RFC 3339 in the configured display offset.
#[derive(Serialize)]
pub(super) struct JsonMessage<'a> {
    sender: &'a str,
    body: &'a str,
    timestamp: String,
    source: SourceKind,
}

impl<'a> JsonMessage<'a> {
    pub(super) fn from_message(msg: &'a Message, config: &OutputConfig) -> Self {
        Self {
            sender: &msg.sender,
            body: &msg.body,
            timestamp: msg
                .timestamp
                .with_timezone(&config.display_offset)
                .to_rfc3339(),
            source: msg.source_kind,
        }
    }
}

/// Writes messages to JSON file as an array.
///
/// # Format
/// ```json
/// [
///   {"sender": "Alice", "body": "Hello", "timestamp": "2023-01-01T09:00:00+00:00", "source": "whatsapp"},
///   {"sender": "Carol", "body": "Morning", "timestamp": "2023-01-01T09:01:00+00:00", "source": "email"}
/// ]
/// ```
pub fn write_json(
    messages: &[Message],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    let json = to_json(messages, config)?;
    write_atomic(output_path, &json)
}

/// Converts messages to JSON string as an array.
///
/// Same format as `write_json`, but returns a String instead of writing to file.
pub fn to_json(messages: &[Message], config: &OutputConfig) -> Result<String> {
    let json_messages: Vec<JsonMessage<'_>> = messages
        .iter()
        .map(|m| JsonMessage::from_message(m, config))
        .collect();

    Ok(serde_json::to_string_pretty(&json_messages)?)
}
