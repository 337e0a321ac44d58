//! Merging per-file message sequences into one chronological sequence.
//!
//! All sequences are concatenated, each record tagged with the position of
//! its file in the input list, then sorted by
//! `(timestamp, file index, origin_order)`. The key is total, so the result
//! does not depend on sort stability or on the order files were parsed in.
//!
//! Duplicates are removed afterwards according to [`DedupMode`]. Equality is
//! [`Message`]'s: same sender, same body, same minute.

use std::collections::HashSet;

use tracing::debug;

use crate::Message;
use crate::config::{DedupMode, MergeConfig};

/// Merges the message sequences of several files.
///
/// `sources[i]` holds the records of the `i`-th input file, in file order.
///
/// # Example
///
/// ```rust
/// use chatlog::core::merge::merge_sources;
/// use chatlog::config::MergeConfig;
/// use chatlog::{Message, SourceKind};
/// use chrono::{TimeZone, Utc};
///
/// let at = |m| Utc.with_ymd_and_hms(2023, 1, 1, 9, m, 0).unwrap();
/// let chat = vec![Message::new("Alice", "Hi", at(5), SourceKind::WhatsApp)];
/// let mail = vec![Message::new("Carol", "Morning", at(0), SourceKind::Email)];
///
/// let merged = merge_sources(vec![chat.clone(), mail, chat], &MergeConfig::new());
/// let senders: Vec<_> = merged.iter().map(|m| m.sender.as_str()).collect();
/// assert_eq!(senders, ["Carol", "Alice"]);
/// ```
pub fn merge_sources(sources: Vec<Vec<Message>>, config: &MergeConfig) -> Vec<Message> {
    let mut tagged: Vec<(usize, Message)> = sources
        .into_iter()
        .enumerate()
        .flat_map(|(file, messages)| messages.into_iter().map(move |m| (file, m)))
        .collect();

    tagged.sort_by(|(file_a, a), (file_b, b)| {
        a.timestamp
            .cmp(&b.timestamp)
            .then(file_a.cmp(file_b))
            .then(a.origin_order.cmp(&b.origin_order))
    });

    let sorted: Vec<Message> = tagged.into_iter().map(|(_, m)| m).collect();
    let total = sorted.len();

    let merged = match config.dedup {
        DedupMode::Adjacent => dedup_adjacent(sorted),
        DedupMode::Exhaustive => dedup_exhaustive(sorted),
        DedupMode::Off => sorted,
    };

    debug!(
        total,
        kept = merged.len(),
        mode = ?config.dedup,
        "merged input sequences"
    );
    merged
}

/// Drops every record equal to the record kept just before it.
pub fn dedup_adjacent(mut messages: Vec<Message>) -> Vec<Message> {
    messages.dedup();
    messages
}

/// Drops every record equal to any earlier kept record.
pub fn dedup_exhaustive(messages: Vec<Message>) -> Vec<Message> {
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(messages.len());
        messages.iter().map(|m| seen.insert(m)).collect()
    };

    messages
        .into_iter()
        .zip(keep)
        .filter_map(|(m, keep)| keep.then_some(m))
        .collect()
}
