//! Input format parsers.
//!
//! Each parser implements the [`Parser`](crate::parser::Parser) trait and
//! turns the full text of one file into message records:
//!
//! - [`WhatsAppParser`] - WhatsApp TXT chat exports, many records per file
//! - [`EmailParser`] - MH-style single email messages, one record per file
//!
//! Use [`create_parser`](crate::parser::create_parser) to pick one from an
//! [`InputFormat`](crate::parser::InputFormat).

mod email;
mod whatsapp;

pub use email::EmailParser;
pub use whatsapp::{WhatsAppMessages, WhatsAppParser};
