//! HTML conversation writer.
//!
//! Produces a single self-contained page: the style sheet is embedded, every
//! message becomes a speech bubble, and every sender gets a stable
//! `userN` class so the style sheet can colour them apart.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};

use super::write_atomic;
use crate::Message;
use crate::core::models::{DEFAULT_TIMESTAMP_FORMAT, OutputConfig};
use crate::error::Result;
use crate::message::SYSTEM_SENDER;

/// Escapes text for use in HTML element content and attribute values.
///
/// # Example
///
/// ```rust
/// use chatlog::core::output::escape_html;
///
/// assert_eq!(escape_html("<b>Tom & Jerry</b>"), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Numbers senders from 1 in order of first appearance.
/// The system sender gets no number.
fn sender_numbers(messages: &[Message]) -> HashMap<&str, usize> {
    let mut numbers = HashMap::new();
    for msg in messages {
        if msg.sender != SYSTEM_SENDER && !numbers.contains_key(msg.sender.as_str()) {
            let next = numbers.len() + 1;
            numbers.insert(msg.sender.as_str(), next);
        }
    }
    numbers
}

/// Formats a timestamp in the display offset.
/// An invalid layout falls back to the default one.
fn format_timestamp(timestamp: DateTime<Utc>, config: &OutputConfig) -> String {
    let local = timestamp.with_timezone(&config.display_offset);
    let mut out = String::new();
    if write!(out, "{}", local.format(&config.timestamp_format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", local.format(DEFAULT_TIMESTAMP_FORMAT));
    }
    out
}

/// Renders messages as a complete HTML document.
///
/// # Format
/// ```html
/// <div class="bubble">
///   <div class="txt">
///     <p class="name"><span class="user1">Alice</span></p>
///     <div class="message">
///       <p>first line<br>
///       second line<br>
///       <span class="timestamp">2023-01-01 09:00</span></p>
///     </div>
///   </div>
///   <div class="bubble-arrow"></div>
/// </div>
/// ```
///
/// System notices get a `bubble system` container and no name line.
pub fn to_html(messages: &[Message], config: &OutputConfig) -> String {
    let numbers = sender_numbers(messages);
    let mut html = String::with_capacity(config.css.len() + messages.len() * 256);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    let _ = writeln!(
        html,
        "<title>{}</title>",
        escape_html(&config.input_names.join(", "))
    );
    html.push_str("<meta charset=\"utf-8\"/>\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    let _ = writeln!(html, "<style>\n{}\n</style>", config.css);
    html.push_str("</head>\n<body>\n");

    for name in &config.input_names {
        let _ = writeln!(html, "<h1 class=\"input_file\">{}</h1>", escape_html(name));
    }

    html.push_str("<div class=\"speech-wrapper\">\n");
    for msg in messages {
        match numbers.get(msg.sender.as_str()) {
            Some(number) => {
                html.push_str("<div class=\"bubble\">\n<div class=\"txt\">\n");
                let _ = writeln!(
                    html,
                    "<p class=\"name\"><span class=\"user{number}\">{}</span></p>",
                    escape_html(&msg.sender)
                );
            }
            None => html.push_str("<div class=\"bubble system\">\n<div class=\"txt\">\n"),
        }

        html.push_str("<div class=\"message\">\n<p>");
        for line in msg.body.split('\n') {
            html.push_str(&escape_html(line.trim_end_matches('\r')));
            html.push_str("<br>\n");
        }
        let _ = writeln!(
            html,
            "<span class=\"timestamp\">{}</span></p>",
            escape_html(&format_timestamp(msg.timestamp, config))
        );
        html.push_str("</div>\n</div>\n<div class=\"bubble-arrow\"></div>\n</div>\n");
    }
    html.push_str("</div>\n</body>\n</html>\n");

    html
}

/// Renders messages as HTML and writes the document to `output_path`.
pub fn write_html(
    messages: &[Message],
    output_path: impl AsRef<Path>,
    config: &OutputConfig,
) -> Result<()> {
    write_atomic(output_path, &to_html(messages, config))
}
