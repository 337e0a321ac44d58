//! Core processing logic for chatlog.
//!
//! This module contains:
//! - [`merge`] - Chronological merge of several inputs, with deduplication
//! - [`processor`] - Collation of consecutive same-sender messages and statistics
//! - [`models`] - Rendering configuration
//! - [`output`] - Format writers (HTML, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! use chatlog::core::{
//!     Message, OutputConfig,
//!     merge_sources, collate_consecutive, to_html,
//! };
//! ```

pub mod merge;
pub mod models;
pub mod output;
pub mod processor;

// Re-export main types for convenience
pub use merge::merge_sources;
pub use models::OutputConfig;

// Re-export Message from the crate root
pub use crate::Message;

pub use output::{to_html, write_atomic, write_html};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};

pub use processor::{ProcessingStats, collate_consecutive};
