//! Configuration types for parsers, merging and the pipeline.
//!
//! These are plain builder-style structs without any CLI framework
//! dependencies, so the library can be driven programmatically.
//!
//! # Example
//!
//! ```rust
//! use chatlog::config::{DateOrder, DedupMode, PipelineConfig, WhatsAppConfig};
//!
//! let config = PipelineConfig::new()
//!     .with_whatsapp(WhatsAppConfig::new().with_date_order(DateOrder::MonthFirst))
//!     .with_dedup(DedupMode::Exhaustive)
//!     .with_collate(true);
//! assert!(config.collate);
//! ```

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::InputFormat;

/// Order of the day and month fields in an ambiguous numeric date.
///
/// Only consulted when a file's own header lines cannot disambiguate
/// (no field above 12 in either position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    /// `13/01/18` is 13 January 2018
    #[default]
    DayFirst,
    /// `01/13/18` is 13 January 2018
    MonthFirst,
}

/// How duplicates are detected after the chronological sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupMode {
    /// Drop a message equal to the immediately preceding kept message.
    ///
    /// Single linear pass; duplicates separated by other messages survive.
    #[default]
    Adjacent,
    /// Drop a message equal to any earlier kept message.
    Exhaustive,
    /// Keep every message.
    Off,
}

/// Configuration for WhatsApp export parsing.
///
/// # Example
///
/// ```rust
/// use chatlog::config::{DateOrder, WhatsAppConfig};
///
/// let config = WhatsAppConfig::new()
///     .with_date_order(DateOrder::MonthFirst)
///     .with_utc_offset_minutes(120);
/// assert_eq!(config.offset().local_minus_utc(), 7200);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Preferred order for ambiguous dates (default: day-first)
    pub date_order: DateOrder,

    /// Offset of the exporting device's clock from UTC, in minutes (default: 0)
    pub utc_offset_minutes: i32,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            date_order: DateOrder::DayFirst,
            utc_offset_minutes: 0,
        }
    }
}

impl WhatsAppConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the preferred date order.
    #[must_use]
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    /// Sets the offset used to interpret export times.
    #[must_use]
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// The configured offset; falls back to UTC when out of range.
    pub fn offset(&self) -> FixedOffset {
        offset_from_minutes(self.utc_offset_minutes)
    }
}

/// Configuration for email message parsing.
///
/// # Example
///
/// ```rust
/// use chatlog::config::EmailConfig;
///
/// let config = EmailConfig::new().with_decode_mime(true);
/// assert!(config.decode_mime);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Offset used for `Date` headers that carry no zone, in minutes (default: 0)
    pub utc_offset_minutes: i32,

    /// Decode MIME bodies and prefer the `text/plain` part (default: false)
    pub decode_mime: bool,
}

impl EmailConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the offset used for zone-less dates.
    #[must_use]
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Enables or disables MIME body decoding.
    #[must_use]
    pub fn with_decode_mime(mut self, enabled: bool) -> Self {
        self.decode_mime = enabled;
        self
    }

    /// The configured offset; falls back to UTC when out of range.
    pub fn offset(&self) -> FixedOffset {
        offset_from_minutes(self.utc_offset_minutes)
    }
}

/// Configuration for the merge/dedup stage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Duplicate detection strategy (default: adjacent)
    pub dedup: DedupMode,
}

impl MergeConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duplicate detection strategy.
    #[must_use]
    pub fn with_dedup(mut self, dedup: DedupMode) -> Self {
        self.dedup = dedup;
        self
    }
}

/// Configuration for a whole conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// WhatsApp parser settings
    pub whatsapp: WhatsAppConfig,

    /// Email parser settings
    pub email: EmailConfig,

    /// Merge/dedup settings
    pub merge: MergeConfig,

    /// Combine consecutive messages from the same sender (default: false)
    pub collate: bool,

    /// Force one parser for every input instead of detecting per file
    pub input_format: Option<InputFormat>,
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the WhatsApp parser settings.
    #[must_use]
    pub fn with_whatsapp(mut self, config: WhatsAppConfig) -> Self {
        self.whatsapp = config;
        self
    }

    /// Sets the email parser settings.
    #[must_use]
    pub fn with_email(mut self, config: EmailConfig) -> Self {
        self.email = config;
        self
    }

    /// Sets the duplicate detection strategy.
    #[must_use]
    pub fn with_dedup(mut self, dedup: DedupMode) -> Self {
        self.merge.dedup = dedup;
        self
    }

    /// Enables or disables collation.
    #[must_use]
    pub fn with_collate(mut self, enabled: bool) -> Self {
        self.collate = enabled;
        self
    }

    /// Forces a single input format for every file.
    #[must_use]
    pub fn with_input_format(mut self, format: InputFormat) -> Self {
        self.input_format = Some(format);
        self
    }

    /// Applies one UTC offset to both parsers.
    #[must_use]
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.whatsapp.utc_offset_minutes = minutes;
        self.email.utc_offset_minutes = minutes;
        self
    }
}

fn offset_from_minutes(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_config_default() {
        let config = WhatsAppConfig::default();
        assert_eq!(config.date_order, DateOrder::DayFirst);
        assert_eq!(config.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_offset_out_of_range_falls_back() {
        let config = WhatsAppConfig::new().with_utc_offset_minutes(48 * 60);
        assert_eq!(config.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_negative_offset() {
        let config = EmailConfig::new().with_utc_offset_minutes(-300);
        assert_eq!(config.offset().local_minus_utc(), -18000);
    }

    #[test]
    fn test_pipeline_builder() {
        let config = PipelineConfig::new()
            .with_collate(true)
            .with_dedup(DedupMode::Off)
            .with_utc_offset_minutes(60)
            .with_input_format(InputFormat::Email);

        assert!(config.collate);
        assert_eq!(config.merge.dedup, DedupMode::Off);
        assert_eq!(config.whatsapp.utc_offset_minutes, 60);
        assert_eq!(config.email.utc_offset_minutes, 60);
        assert_eq!(config.input_format, Some(InputFormat::Email));
    }

    #[test]
    fn test_config_serde() {
        let config = MergeConfig::new().with_dedup(DedupMode::Exhaustive);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"dedup":"exhaustive"}"#);

        let order: DateOrder = serde_json::from_str("\"month-first\"").unwrap();
        assert_eq!(order, DateOrder::MonthFirst);
    }
}
