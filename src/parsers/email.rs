//! Email message parser for MH-style single-message files.
//!
//! The file is a block of `Header: value` lines, a blank line, and the body.
//! Headers are read with [`mailparse`], so folded lines and RFC 2047 encoded
//! words (`=?UTF-8?Q?...?=`) come out decoded.
//!
//! One file yields exactly one message. A missing sender or `Date` header, or
//! a date that cannot be understood, is a [`ParseError`]; no partial record
//! is produced.
//!
//! Not implemented: signature stripping and splitting files that contain
//! several messages (mbox).

use mailparse::{MailHeaderMap, ParsedMail};
use tracing::debug;

use crate::config::EmailConfig;
use crate::error::ParseError;
use crate::message::{Message, SourceKind};
use crate::parser::{InputFormat, Parser};
use crate::parsing::email::parse_email_date;

const FORMAT: &str = "email";

/// Headers accepted as the author, in order of preference.
const SENDER_HEADERS: &[&str] = &["From", "Sender"];

/// Parser for single email messages.
///
/// # Example
///
/// ```rust
/// use chatlog::parsers::EmailParser;
/// use chatlog::parser::Parser;
///
/// let raw = "From: Carol <carol@example.com>\nDate: Sun, 1 Jan 2023 08:30:00 +0000\n\nMorning!\n";
/// let messages = EmailParser::new().parse_str(raw)?;
///
/// assert_eq!(messages.len(), 1);
/// assert_eq!(messages[0].sender, "Carol <carol@example.com>");
/// assert_eq!(messages[0].body, "Morning!");
/// # Ok::<(), chatlog::error::ParseError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmailParser {
    config: EmailConfig,
}

impl EmailParser {
    /// Creates a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with custom configuration.
    pub fn with_config(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &EmailConfig {
        &self.config
    }

    /// Parses one message.
    pub fn parse_message(&self, content: &str) -> Result<Message, ParseError> {
        let content = content
            .strip_prefix('\u{feff}')
            .unwrap_or(content)
            .trim_start_matches(['\r', '\n']);

        let (headers, body_offset) = mailparse::parse_headers(content.as_bytes())
            .map_err(|e| ParseError::new(FORMAT, format!("malformed headers: {e}")))?;

        let sender = SENDER_HEADERS
            .iter()
            .find_map(|name| headers.get_first_value(name))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ParseError::new(FORMAT, "missing From header"))?;

        let date = headers
            .get_first_value("Date")
            .ok_or_else(|| ParseError::new(FORMAT, "missing Date header"))?;

        let timestamp = parse_email_date(&date, self.config.offset()).ok_or_else(|| {
            let (line_number, line) = header_line(content, "Date").unwrap_or((0, ""));
            ParseError::at_line(FORMAT, "unrecognized Date header", line_number, line)
        })?;

        let body = if self.config.decode_mime {
            decoded_body(content)?
        } else {
            content.get(body_offset..).unwrap_or_default().to_string()
        };
        let body = body.trim_end_matches(['\r', '\n']).to_string();

        debug!(%sender, %timestamp, "parsed email message");
        Ok(Message::new(sender, body, timestamp, SourceKind::Email))
    }
}

/// 1-based number and text of the first line holding header `name`.
fn header_line<'a>(content: &'a str, name: &str) -> Option<(usize, &'a str)> {
    content
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .enumerate()
        .find(|(_, line)| {
            line.split_once(':')
                .is_some_and(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        })
        .map(|(index, line)| (index + 1, line))
}

/// Depth-first search for the first leaf part of the given MIME type.
fn find_part<'a>(mail: &'a ParsedMail<'a>, mimetype: &str) -> Option<&'a ParsedMail<'a>> {
    if mail.subparts.is_empty() {
        return (mail.ctype.mimetype == mimetype).then_some(mail);
    }
    mail.subparts.iter().find_map(|part| find_part(part, mimetype))
}

/// Body with transfer encoding and charset decoded, preferring `text/plain`
/// over `text/html`.
fn decoded_body(content: &str) -> Result<String, ParseError> {
    let mail = mailparse::parse_mail(content.as_bytes())
        .map_err(|e| ParseError::new(FORMAT, format!("malformed MIME structure: {e}")))?;

    let part = find_part(&mail, "text/plain")
        .or_else(|| find_part(&mail, "text/html"))
        .unwrap_or(&mail);

    part.get_body()
        .map_err(|e| ParseError::new(FORMAT, format!("cannot decode body: {e}")))
}

impl Parser for EmailParser {
    fn name(&self) -> &'static str {
        FORMAT
    }

    fn format(&self) -> InputFormat {
        InputFormat::Email
    }

    fn parse_str(&self, content: &str) -> Result<Vec<Message>, ParseError> {
        Ok(vec![self.parse_message(content)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const SIMPLE: &str = "From: Carol <carol@example.com>\n\
                          To: Alice <alice@example.com>\n\
                          Subject: Breakfast\n\
                          Date: Sun, 1 Jan 2023 08:30:00 +0000\n\
                          \n\
                          Coffee at nine?\n\
                          \n\
                          -- \n\
                          Carol\n";

    #[test]
    fn test_parser_name() {
        let parser = EmailParser::new();
        assert_eq!(Parser::name(&parser), "email");
        assert_eq!(parser.format(), InputFormat::Email);
    }

    #[test]
    fn test_simple_message() {
        let messages = EmailParser::new().parse_str(SIMPLE).unwrap();
        assert_eq!(messages.len(), 1);
        let msg = &messages[0];
        assert_eq!(msg.sender, "Carol <carol@example.com>");
        assert_eq!(msg.timestamp, Utc.with_ymd_and_hms(2023, 1, 1, 8, 30, 0).unwrap());
        assert_eq!(msg.source_kind, SourceKind::Email);
        assert_eq!(msg.origin_order, 0);
    }

    #[test]
    fn test_body_verbatim() {
        let msg = EmailParser::new().parse_message(SIMPLE).unwrap();
        assert_eq!(msg.body, "Coffee at nine?\n\n-- \nCarol");
    }

    #[test]
    fn test_missing_date() {
        let err = EmailParser::new()
            .parse_str("From: Carol <carol@example.com>\n\nHi\n")
            .unwrap_err();
        assert!(err.message.contains("Date"));
        assert_eq!(err.format, "email");
    }

    #[test]
    fn test_missing_from() {
        let err = EmailParser::new()
            .parse_str("Date: Sun, 1 Jan 2023 08:30:00 +0000\n\nHi\n")
            .unwrap_err();
        assert!(err.message.contains("From"));
    }

    #[test]
    fn test_sender_fallback() {
        let msg = EmailParser::new()
            .parse_message("Sender: list@example.com\nDate: 1/1/23, 08:30\n\nHi\n")
            .unwrap();
        assert_eq!(msg.sender, "list@example.com");
    }

    #[test]
    fn test_unparseable_date_points_at_line() {
        let err = EmailParser::new()
            .parse_str("From: Carol\nSubject: x\nDate: someday\n\nHi\n")
            .unwrap_err();
        assert_eq!(err.line_number, Some(3));
        assert_eq!(err.line.as_deref(), Some("Date: someday"));
    }

    #[test]
    fn test_naive_date() {
        let msg = EmailParser::new()
            .parse_message("From: Carol\nDate: 1/1/23, 08:30\n\nMorning\n")
            .unwrap();
        assert_eq!(msg.timestamp, Utc.with_ymd_and_hms(2023, 1, 1, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_encoded_word_sender() {
        let msg = EmailParser::new()
            .parse_message("From: =?UTF-8?Q?Jos=C3=A9?= <jose@example.com>\nDate: 1/1/23, 08:30\n\nHola\n")
            .unwrap();
        assert_eq!(msg.sender, "José <jose@example.com>");
    }

    #[test]
    fn test_empty_body() {
        let msg = EmailParser::new()
            .parse_message("From: Carol\nDate: 1/1/23, 08:30\n\n")
            .unwrap();
        assert_eq!(msg.body, "");
    }

    #[test]
    fn test_mime_decoding_prefers_plain() {
        let raw = "From: Carol\n\
                   Date: 1/1/23, 08:30\n\
                   MIME-Version: 1.0\n\
                   Content-Type: multipart/alternative; boundary=\"XX\"\n\
                   \n\
                   --XX\n\
                   Content-Type: text/html; charset=utf-8\n\
                   \n\
                   <p>Hello</p>\n\
                   --XX\n\
                   Content-Type: text/plain; charset=utf-8\n\
                   Content-Transfer-Encoding: quoted-printable\n\
                   \n\
                   Caf=C3=A9?\n\
                   --XX--\n";

        let raw_msg = EmailParser::new().parse_message(raw).unwrap();
        assert!(raw_msg.body.contains("--XX"));

        let parser = EmailParser::with_config(EmailConfig::new().with_decode_mime(true));
        let msg = parser.parse_message(raw).unwrap();
        assert_eq!(msg.body, "Café?");
    }
}
