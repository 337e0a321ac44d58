//! Permissive `Date:` header parsing.
//!
//! Real-world mail archives contain far more than RFC 2822 dates. Parsing is
//! attempted in this order, first success wins:
//!
//! 1. RFC 2822 (`Mon, 2 Jan 2023 08:30:00 -0800`, named US zones, `GMT`, `UT`)
//! 2. RFC 3339 (`2023-01-02T08:30:00+01:00`)
//! 3. RFC 2822 after replacing a trailing zone abbreviation (`CET`, `BST`, ...)
//! 4. zoned layouts such as `2023-01-02 08:30:00 +0100`
//! 5. zone-less layouts (month-first), interpreted at the configured offset
//! 6. `mailparse`'s own lenient date parser
//!
//! Trailing comments like `(PST)` are ignored.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Zone abbreviations not covered by RFC 2822, with their offsets.
const ZONE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("WET", "+0000"),
    ("WEST", "+0100"),
    ("BST", "+0100"),
    ("IST", "+0530"),
    ("CET", "+0100"),
    ("CEST", "+0200"),
    ("MET", "+0100"),
    ("MEST", "+0200"),
    ("EET", "+0200"),
    ("EEST", "+0300"),
    ("MSK", "+0300"),
    ("HKT", "+0800"),
    ("SGT", "+0800"),
    ("JST", "+0900"),
    ("KST", "+0900"),
    ("AEST", "+1000"),
    ("AEDT", "+1100"),
    ("NZST", "+1200"),
    ("NZDT", "+1300"),
    ("AKST", "-0900"),
    ("AKDT", "-0800"),
    ("HST", "-1000"),
];

const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M %z",
    "%a %b %e %H:%M:%S %Y %z",
    "%d %b %Y %H:%M:%S %z",
];

/// Zone-less layouts, month-first like most mail tooling.
const NAIVE_FORMATS: &[&str] = &[
    "%m/%d/%y, %H:%M",
    "%m/%d/%y, %H:%M:%S",
    "%m/%d/%Y, %H:%M",
    "%m/%d/%Y, %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%y, %I:%M %p",
    "%m/%d/%Y, %I:%M %p",
    "%m/%d/%y %I:%M %p",
    "%m/%d/%Y %I:%M %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
    "%a, %d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M",
    "%a %b %e %H:%M:%S %Y",
];

fn strip_comment(value: &str) -> &str {
    let value = value.trim();
    match (value.ends_with(')'), value.rfind('(')) {
        (true, Some(start)) => value[..start].trim_end(),
        _ => value,
    }
}

/// Replaces a trailing zone abbreviation with its numeric offset.
fn substitute_zone(value: &str) -> Option<String> {
    let (head, zone) = value.rsplit_once(' ')?;
    ZONE_ABBREVIATIONS
        .iter()
        .find(|(name, _)| zone.eq_ignore_ascii_case(name))
        .map(|(_, offset)| format!("{head} {offset}"))
}

/// Parses an email `Date:` value and normalizes it to UTC.
///
/// `offset` is used only for layouts that carry no zone at all.
pub fn parse_email_date(value: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let value = strip_comment(value);
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = substitute_zone(value)
        .and_then(|v| DateTime::parse_from_rfc2822(&v).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = ZONED_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc));
    }

    mailparse::dateparse(value)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
