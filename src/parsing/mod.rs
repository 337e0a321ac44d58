//! Shared parsing utilities.
//!
//! Line-level and field-level helpers used by the format parsers in
//! [`crate::parsers`] and by content-based format detection.

pub mod email;
pub mod whatsapp;

pub use email::parse_email_date;
pub use whatsapp::{
    FieldOrder, RawHeader, is_header_candidate, parse_whatsapp_timestamp, resolve_field_order,
    split_header,
};
