//! `WhatsApp` TXT export parser.
//!
//! A header line (`<date>, <time> - <sender>: <text>`) starts a message; every
//! following line that is not a header is appended to it with a newline.
//!
//! The day/month order of the dates is decided once per file (see
//! [`resolve_field_order`]) and then applied to every header. The first
//! non-blank line must be a valid header. Later header-like lines whose date
//! does not parse become continuation lines, so no text is ever dropped.
//!
//! Supported layouts:
//! - `13/01/18, 01:23 - Fake Name: text`
//! - `19-02-18 17:02 - human1: Hola`, `19.02.18 17:14 - human2: ...`
//! - `1/15/24, 10:30 AM - Alice: text`
//! - `2016-06-27, 8:04:08 AM: Neil: Hi`
//! - `[1/15/24, 10:30:45 AM] Alice: text`

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, warn};

use crate::config::WhatsAppConfig;
use crate::error::ParseError;
use crate::message::{Message, SourceKind};
use crate::parser::{InputFormat, Parser};
use crate::parsing::whatsapp::{
    FieldOrder, is_header_candidate, parse_whatsapp_timestamp, resolve_field_order, split_header,
};

const FORMAT: &str = "WhatsApp";

/// Parser for WhatsApp TXT exports.
///
/// # Example
///
/// ```rust
/// use chatlog::parsers::WhatsAppParser;
///
/// let parser = WhatsAppParser::new();
/// let content = "1/1/23, 09:00 - Alice: Hi\nthere\n1/1/23, 09:01 - Bob: Hello";
///
/// let messages: Vec<_> = parser.messages(content)?.collect();
/// assert_eq!(messages[0].body, "Hi\nthere");
/// assert_eq!(messages[1].sender, "Bob");
/// # Ok::<(), chatlog::error::ParseError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct WhatsAppParser {
    config: WhatsAppConfig,
}

impl WhatsAppParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: WhatsAppConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &WhatsAppConfig {
        &self.config
    }

    /// Returns a lazy iterator over the messages of `content`, in file order.
    ///
    /// The iterator is `Clone`; a clone taken before iterating restarts the
    /// sequence from the first message.
    pub fn messages<'a>(&self, content: &'a str) -> Result<WhatsAppMessages<'a>, ParseError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let order = resolve_field_order(
            content.lines().filter_map(|l| split_header(l).map(|h| h.date)),
            self.config.date_order,
        );
        let offset = self.config.offset();
        debug!(?order, "locked WhatsApp date order");

        let mut lines = content.lines().enumerate();
        let mut pending = None;
        for (index, line) in lines.by_ref() {
            if line.trim().is_empty() {
                continue;
            }
            let Some(header) = split_header(line) else {
                return Err(ParseError::at_line(
                    FORMAT,
                    "first line is not a WhatsApp message header",
                    index + 1,
                    line,
                ));
            };
            let Some(timestamp) = parse_whatsapp_timestamp(header.date, header.time, order, offset)
            else {
                return Err(ParseError::at_line(
                    FORMAT,
                    "unrecognized date/time in first header",
                    index + 1,
                    line,
                ));
            };
            pending = Some(Header {
                timestamp,
                sender: header.sender,
                body: header.body,
            });
            break;
        }

        Ok(WhatsAppMessages {
            lines,
            pending,
            order,
            offset,
            next_origin: 0,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Header<'a> {
    timestamp: DateTime<Utc>,
    sender: &'a str,
    body: &'a str,
}

/// Lazy sequence of messages from one WhatsApp export.
///
/// Created by [`WhatsAppParser::messages`].
#[derive(Debug, Clone)]
pub struct WhatsAppMessages<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    pending: Option<Header<'a>>,
    order: FieldOrder,
    offset: FixedOffset,
    next_origin: usize,
}

impl WhatsAppMessages<'_> {
    /// The date field order locked for this file.
    pub fn field_order(&self) -> FieldOrder {
        self.order
    }
}

impl Iterator for WhatsAppMessages<'_> {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        let current = self.pending.take()?;
        let mut body = current.body.to_string();

        for (index, line) in self.lines.by_ref() {
            if let Some(header) = split_header(line) {
                if let Some(timestamp) =
                    parse_whatsapp_timestamp(header.date, header.time, self.order, self.offset)
                {
                    self.pending = Some(Header {
                        timestamp,
                        sender: header.sender,
                        body: header.body,
                    });
                    break;
                }
            }
            if is_header_candidate(line) {
                warn!(
                    line_number = index + 1,
                    "header date does not fit the file's date order, keeping line as message text"
                );
            }
            body.push('\n');
            body.push_str(line);
        }

        let trimmed = body.trim_end_matches('\n').len();
        body.truncate(trimmed);

        let origin = self.next_origin;
        self.next_origin += 1;
        Some(
            Message::new(current.sender, body, current.timestamp, SourceKind::WhatsApp)
                .with_origin_order(origin),
        )
    }
}

impl Parser for WhatsAppParser {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn format(&self) -> InputFormat {
        InputFormat::WhatsApp
    }

    fn parse_str(&self, content: &str) -> Result<Vec<Message>, ParseError> {
        Ok(self.messages(content)?.collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DateOrder;
    use crate::message::SYSTEM_SENDER;
    use chrono::TimeZone;

    fn ymd_hms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn parse(content: &str) -> Vec<Message> {
        WhatsAppParser::new().parse_str(content).unwrap()
    }

    #[test]
    fn test_parser_name() {
        let parser = WhatsAppParser::new();
        assert_eq!(Parser::name(&parser), "WhatsApp");
        assert_eq!(parser.format(), InputFormat::WhatsApp);
    }

    #[test]
    fn test_multiline() {
        let messages = parse("13/01/18, 01:23 - Fake Name: line1\nline2\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].timestamp, ymd_hms(2018, 1, 13, 1, 23, 0));
        assert_eq!(messages[0].sender, "Fake Name");
        assert_eq!(messages[0].body, "line1\nline2");
    }

    #[test]
    fn test_two_messages_with_multiline() {
        let messages = parse(
            "13/01/18, 01:23 - Fake Name: line1\nline2\n13/01/18, 01:24 - Name Two: single line\n",
        );
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].body, "line1\nline2");
        assert_eq!(messages[1].sender, "Name Two");
        assert_eq!(messages[1].body, "single line");
        assert_eq!(messages[1].timestamp, ymd_hms(2018, 1, 13, 1, 24, 0));
    }

    #[test]
    fn test_origin_order() {
        let messages = parse(
            "1/1/23, 09:00 - Alice: a\n1/1/23, 09:00 - Bob: b\n1/1/23, 09:00 - Alice: c\n",
        );
        let orders: Vec<usize> = messages.iter().map(|m| m.origin_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert!(messages.iter().all(|m| m.source_kind == SourceKind::WhatsApp));
    }

    #[test]
    fn test_first_line_without_sender() {
        let messages = parse("14/04/18, 22:08 - Nesta conversa, (…)\n14/04/18, 22:08 - Alguém: Olá!\n");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, SYSTEM_SENDER);
        assert!(messages[0].is_system());
        assert_eq!(messages[0].body, "Nesta conversa, (…)");
        assert_eq!(messages[1].sender, "Alguém");
        assert_eq!(messages[1].body, "Olá!");
        assert_eq!(messages[1].timestamp, ymd_hms(2018, 4, 14, 22, 8, 0));
    }

    #[test]
    fn test_other_locale_layouts() {
        let messages = parse(
            "19-02-18 17:02 - Los mensajes y llamadas en este chat ahora están protegidos.\n\
             19-02-18 17:02 - human1: Hola\n\
             19.02.18 17:14 - human2: como estás?\n",
        );
        assert_eq!(messages.len(), 3);
        assert!(messages[0].is_system());
        assert_eq!(messages[1].sender, "human1");
        assert_eq!(messages[2].sender, "human2");
        assert_eq!(messages[2].timestamp, ymd_hms(2018, 2, 19, 17, 14, 0));
    }

    #[test]
    fn test_twelve_hour_iso_date() {
        let messages = parse("2016-06-27, 8:04:08 AM: Neil: Hi\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, "Neil");
        assert_eq!(messages[0].body, "Hi");
        assert_eq!(messages[0].timestamp, ymd_hms(2016, 6, 27, 8, 4, 8));
    }

    #[test]
    fn test_ios_bracketed() {
        let messages = parse("[1/15/24, 10:30:45 AM] Alice: Hello\n[1/15/24, 10:31:00 PM] Bob: Hi\n");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].timestamp, ymd_hms(2024, 1, 15, 10, 30, 45));
        assert_eq!(messages[1].timestamp, ymd_hms(2024, 1, 15, 22, 31, 0));
    }

    #[test]
    fn test_date_order_from_later_line() {
        // 01/02 is ambiguous, 02/13 settles month-first for the whole file
        let messages = parse("01/02/23, 09:00 - Alice: a\n02/13/23, 09:00 - Bob: b\n");
        assert_eq!(messages[0].timestamp, ymd_hms(2023, 1, 2, 9, 0, 0));
        assert_eq!(messages[1].timestamp, ymd_hms(2023, 2, 13, 9, 0, 0));
    }

    #[test]
    fn test_date_order_preference() {
        let parser =
            WhatsAppParser::with_config(WhatsAppConfig::new().with_date_order(DateOrder::MonthFirst));
        let messages = parser.parse_str("01/02/23, 09:00 - Alice: a\n").unwrap();
        assert_eq!(messages[0].timestamp, ymd_hms(2023, 1, 2, 9, 0, 0));

        let messages = parse("01/02/23, 09:00 - Alice: a\n");
        assert_eq!(messages[0].timestamp, ymd_hms(2023, 2, 1, 9, 0, 0));
    }

    #[test]
    fn test_inconsistent_header_becomes_continuation() {
        let messages = parse("13/01/23, 09:00 - Alice: a\n01/13/23, 09:05 - Bob: b\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "a\n01/13/23, 09:05 - Bob: b");
    }

    #[test]
    fn test_date_at_start_of_continuation_line() {
        let messages = parse(
            "13/01/23, 09:00 - Alice: When should we meet?\n\
             14/01/23 10:00 works for me\n\
             13/01/23, 09:05 - Bob: ok\n",
        );
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, "Alice");
        assert_eq!(messages[0].body, "When should we meet?\n14/01/23 10:00 works for me");
        assert_eq!(messages[1].sender, "Bob");
        assert_eq!(messages[1].body, "ok");
    }

    #[test]
    fn test_first_line_not_header() {
        let err = WhatsAppParser::new()
            .parse_str("hello\n1/1/23, 09:00 - Alice: Hi\n")
            .unwrap_err();
        assert_eq!(err.line_number, Some(1));
        assert_eq!(err.line.as_deref(), Some("hello"));
        assert_eq!(err.format, "WhatsApp");
    }

    #[test]
    fn test_first_header_invalid_date() {
        let err = WhatsAppParser::new()
            .parse_str("\n45/45/23, 09:00 - Alice: Hi\n")
            .unwrap_err();
        assert_eq!(err.line_number, Some(2));
    }

    #[test]
    fn test_empty_content() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn test_bom_and_blank_lines() {
        let messages = parse("\u{feff}1/1/23, 09:00 - Alice: Hi\n\nstill me\n\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "Hi\n\nstill me");
    }

    #[test]
    fn test_crlf_line_endings() {
        let messages = parse("1/1/23, 09:00 - Alice: Hi\r\nmore\r\n1/1/23, 09:01 - Bob: Yo\r\n");
        assert_eq!(messages[0].body, "Hi\nmore");
        assert_eq!(messages[1].body, "Yo");
    }

    #[test]
    fn test_iterator_is_restartable() {
        let parser = WhatsAppParser::new();
        let content = "1/1/23, 09:00 - Alice: Hi\n1/1/23, 09:01 - Bob: Hello\n";
        let mut iter = parser.messages(content).unwrap();
        let restart = iter.clone();

        assert_eq!(iter.next().map(|m| m.sender), Some("Alice".to_string()));
        assert_eq!(iter.next().map(|m| m.sender), Some("Bob".to_string()));
        assert!(iter.next().is_none());

        let again: Vec<Message> = restart.collect();
        assert_eq!(again.len(), 2);
        assert_eq!(again[0].sender, "Alice");
    }

    #[test]
    fn test_utc_offset_applied() {
        let parser = WhatsAppParser::with_config(WhatsAppConfig::new().with_utc_offset_minutes(60));
        let messages = parser.parse_str("1/1/23, 09:00 - Alice: Hi\n").unwrap();
        assert_eq!(messages[0].timestamp, ymd_hms(2023, 1, 1, 8, 0, 0));
    }
}
