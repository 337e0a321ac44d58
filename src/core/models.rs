//! Rendering configuration shared by the output writers.

use chrono::{FixedOffset, Offset, Utc};

/// Default `strftime` layout for rendered timestamps.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Style sheet embedded in HTML output when no style file is given.
pub const DEFAULT_CSS: &str = include_str!("../../assets/default.css");

/// Configuration for output rendering.
///
/// Controls the document title, style sheet and how timestamps are shown.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Display names of the input files (base names without extension)
    pub input_names: Vec<String>,
    /// CSS embedded in HTML output
    pub css: String,
    /// `strftime` layout for timestamps
    pub timestamp_format: String,
    /// Offset timestamps are shown in
    pub display_offset: FixedOffset,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            input_names: Vec::new(),
            css: DEFAULT_CSS.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            display_offset: Utc.fix(),
        }
    }
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input names shown as title and headings.
    #[must_use]
    pub fn with_input_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the default style sheet.
    #[must_use]
    pub fn with_css(mut self, css: impl Into<String>) -> Self {
        self.css = css.into();
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    #[must_use]
    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }
}
