//! Shared WhatsApp parsing utilities.
//!
//! WhatsApp exports vary by locale and platform. A header line always starts
//! with a numeric date and a time, followed by the sender and the text:
//!
//! - Android: `13/01/18, 01:23 - Fake Name: text`
//! - Android, other locales: `19-02-18 17:02 - human1: Hola`, `19.02.18 17:14 - human2: ...`
//! - 12-hour: `1/15/24, 10:30 AM - Alice: text`
//! - ISO-ish: `2016-06-27, 8:04:08 AM: Neil: Hi`
//! - iOS: `[1/15/24, 10:30:45 AM] Alice: text`
//!
//! Header lines without a `Name:` part are system notices.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use regex::Regex;

use crate::config::DateOrder;
use crate::message::SYSTEM_SENDER;

/// Date, time and remainder of a header line. The time is always followed
/// by `] `, ` - ` or `: `.
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\u{200E}?\[?(?P<date>\d{1,4}[./-]\d{1,2}[./-]\d{1,4}),?\s(?P<time>\d{1,2}:\d{2}(?::\d{2})?(?:\s?[AaPp]\.?\s?[Mm]\.?)?)(?:\]\s|\s-\s|:\s)(?P<rest>.*)$",
    )
    .expect("valid regex")
});

/// `Name: text` split of a header remainder.
static SENDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>[^:]+):(?:\s(?P<body>.*))?$").expect("valid regex"));

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

/// Field order of a numeric date, locked once per file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrder {
    /// `13/01/18`
    DayMonthYear,
    /// `01/13/18`
    MonthDayYear,
    /// `2018-01-13`
    YearMonthDay,
}

impl From<DateOrder> for FieldOrder {
    fn from(order: DateOrder) -> Self {
        match order {
            DateOrder::DayFirst => FieldOrder::DayMonthYear,
            DateOrder::MonthFirst => FieldOrder::MonthDayYear,
        }
    }
}

/// The raw pieces of a header line, before timestamp interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawHeader<'a> {
    pub date: &'a str,
    pub time: &'a str,
    pub sender: &'a str,
    pub body: &'a str,
}

/// Splits a header line into its parts, or `None` for any other line.
///
/// System notices get [`SYSTEM_SENDER`] and the whole remainder as body.
pub fn split_header(line: &str) -> Option<RawHeader<'_>> {
    let caps = HEADER.captures(line)?;
    let date = caps.name("date")?.as_str();
    let time = caps.name("time")?.as_str();
    let rest = caps.name("rest").map_or("", |m| m.as_str());

    let (sender, body) = match SENDER.captures(rest) {
        Some(sc) => (
            sc.name("name").map_or("", |m| m.as_str().trim()),
            sc.name("body").map_or("", |m| m.as_str()),
        ),
        None => (SYSTEM_SENDER, rest),
    };

    Some(RawHeader {
        date,
        time,
        sender,
        body,
    })
}

/// Returns `true` if the line has the shape of a header, regardless of
/// whether its date is valid.
pub fn is_header_candidate(line: &str) -> bool {
    HEADER.is_match(line)
}

fn date_fields(date: &str) -> Option<[&str; 3]> {
    let mut parts = date.split(['/', '.', '-']);
    let fields = [parts.next()?, parts.next()?, parts.next()?];
    parts.next().is_none().then_some(fields)
}

/// Decides the field order for a file from its header dates.
///
/// A four-digit leading field means year-first. Otherwise the first date
/// whose leading field exceeds 12 locks day-first, and the first whose
/// second field exceeds 12 locks month-first. Files where every date is
/// ambiguous use `preference`.
pub fn resolve_field_order<'a>(
    dates: impl IntoIterator<Item = &'a str>,
    preference: DateOrder,
) -> FieldOrder {
    for date in dates {
        let Some([a, b, _]) = date_fields(date) else {
            continue;
        };
        if a.len() == 4 {
            return FieldOrder::YearMonthDay;
        }
        let (Ok(a), Ok(b)) = (a.parse::<u32>(), b.parse::<u32>()) else {
            continue;
        };
        if a > 12 && b <= 12 {
            return FieldOrder::DayMonthYear;
        }
        if b > 12 && a <= 12 {
            return FieldOrder::MonthDayYear;
        }
    }
    preference.into()
}

fn expand_year(field: &str) -> Option<i32> {
    let year: i32 = field.parse().ok()?;
    Some(match field.len() {
        1 | 2 if year < 70 => 2000 + year,
        1 | 2 => 1900 + year,
        _ => year,
    })
}

fn parse_date(date: &str, order: FieldOrder) -> Option<NaiveDate> {
    let [a, b, c] = date_fields(date)?;
    let (y, m, d) = match order {
        FieldOrder::DayMonthYear => (c, b, a),
        FieldOrder::MonthDayYear => (c, a, b),
        FieldOrder::YearMonthDay => (a, b, c),
    };
    NaiveDate::from_ymd_opt(expand_year(y)?, m.parse().ok()?, d.parse().ok()?)
}

/// Canonical `HH:MM[:SS][ AM|PM]` form: dots dropped, any whitespace
/// (including the narrow no-break space iOS uses) turned into one space.
fn normalize_time(time: &str) -> String {
    let mut out: String = time
        .chars()
        .filter(|c| *c != '.')
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect::<String>()
        .to_uppercase();
    for suffix in ["AM", "PM"] {
        if out.ends_with(suffix) && !out.ends_with(&format!(" {suffix}")) {
            out.insert(out.len() - 2, ' ');
        }
    }
    out
}

fn parse_time(time: &str) -> Option<NaiveTime> {
    let time = normalize_time(time);
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(&time, fmt).ok())
}

/// Parses a header's date and time under a locked field order, interpreting
/// the wall-clock time at `offset` and normalizing to UTC.
pub fn parse_whatsapp_timestamp(
    date: &str,
    time: &str,
    order: FieldOrder,
    offset: FixedOffset,
) -> Option<DateTime<Utc>> {
    let naive = parse_date(date, order)?.and_time(parse_time(time)?);
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
