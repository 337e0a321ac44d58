//! Unified message record for all input formats.
//!
//! This module provides [`Message`], the normalized representation of one
//! conversational message. Both parsers convert their native layout into this
//! structure, so the merge, collation and rendering stages never need to know
//! where a message came from.
//!
//! # Overview
//!
//! A message consists of:
//! - `timestamp` - always present, normalized to UTC
//! - `sender` - display name or address
//! - `body` - text content, possibly empty
//! - `source_kind` - originating format ([`SourceKind`])
//! - `origin_order` - position within the originating file
//!
//! # Equality
//!
//! Two messages are equal when their `sender`, `body` and `timestamp`
//! (truncated to the minute) are equal. `source_kind` and `origin_order` do
//! not take part, so the same event seen in a chat export and in an email
//! compares equal.
//!
//! ```
//! use chatlog::{Message, SourceKind};
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2023, 1, 1, 9, 0, 0).unwrap();
//! let a = Message::new("Alice", "Hi", ts, SourceKind::WhatsApp).with_origin_order(0);
//! let b = Message::new("Alice", "Hi", ts, SourceKind::Email).with_origin_order(7);
//! assert_eq!(a, b);
//! ```

use std::hash::{Hash, Hasher};

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Sender used for WhatsApp system notices (encryption banners, membership
/// changes) which have no author.
pub const SYSTEM_SENDER: &str = "";

/// Originating format of a [`Message`].
///
/// Kept on every record so renderers can style messages per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// WhatsApp chat-log text export
    WhatsApp,
    /// Single MH-style email message
    Email,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::WhatsApp => write!(f, "WhatsApp"),
            SourceKind::Email => write!(f, "email"),
        }
    }
}

/// A normalized message from any supported input format.
///
/// Records are created by a parser and never modified afterwards; the merge
/// and collation stages only reorder, drop or combine them into new records.
///
/// # Serialization
///
/// Timestamps are written in RFC 3339, `source_kind` in lowercase:
///
/// ```
/// use chatlog::{Message, SourceKind};
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2023, 1, 1, 9, 0, 0).unwrap();
/// let msg = Message::new("Alice", "Hi", ts, SourceKind::WhatsApp);
/// let json = serde_json::to_string(&msg)?;
/// assert!(json.contains(r#""source_kind":"whatsapp""#));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// When the message was sent, normalized to UTC.
    pub timestamp: DateTime<Utc>,

    /// Display name or address of the author.
    ///
    /// [`SYSTEM_SENDER`] for WhatsApp system notices.
    pub sender: String,

    /// Text content; may contain newlines, may be empty.
    pub body: String,

    /// Format the message was parsed from.
    pub source_kind: SourceKind,

    /// Zero-based position of the message within its source file.
    ///
    /// Only used to break ties between equal timestamps.
    #[serde(default)]
    pub origin_order: usize,
}

impl Message {
    /// Creates a new message with `origin_order` 0.
    pub fn new(
        sender: impl Into<String>,
        body: impl Into<String>,
        timestamp: DateTime<Utc>,
        source_kind: SourceKind,
    ) -> Self {
        Self {
            timestamp,
            sender: sender.into(),
            body: body.into(),
            source_kind,
            origin_order: 0,
        }
    }

    /// Builder method to set the position within the source file.
    #[must_use]
    pub fn with_origin_order(mut self, origin_order: usize) -> Self {
        self.origin_order = origin_order;
        self
    }

    /// Returns the sender.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the originating format.
    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    /// Returns the position within the source file.
    pub fn origin_order(&self) -> usize {
        self.origin_order
    }

    /// Returns `true` for WhatsApp system notices.
    pub fn is_system(&self) -> bool {
        self.sender == SYSTEM_SENDER
    }

    /// Timestamp at the resolution shared by all formats (whole minutes).
    pub fn minute(&self) -> DateTime<Utc> {
        self.timestamp
            .duration_trunc(TimeDelta::minutes(1))
            .unwrap_or(self.timestamp)
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.sender == other.sender && self.body == other.body && self.minute() == other.minute()
    }
}

impl Eq for Message {}

impl Hash for Message {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sender.hash(state);
        self.body.hash(state);
        self.minute().hash(state);
    }
}
