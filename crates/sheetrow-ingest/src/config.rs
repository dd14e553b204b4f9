//! Ingestion configuration

use chrono::{DateTime, Utc};
use sheetrow_model::DEFAULT_GROUP;

/// Name given to the table of a single-grid payload
pub const DEFAULT_SINGLE_RANGE_NAME: &str = "ImportedSheet";

/// Format used when rendering a document's last-modified stamp
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Ingestion settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Group assigned to every ingested table
    pub default_group: String,
    /// Table name for a payload carrying one bare grid
    pub single_range_name: String,
    /// When set, only sheets with these names are ingested
    pub sheet_filter: Option<Vec<String>>,
    /// strftime format for rendering timestamps
    pub timestamp_format: String,
}

impl IngestConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With group label for ingested tables
    #[inline]
    #[must_use]
    pub fn with_default_group(mut self, group: impl Into<String>) -> Self {
        self.default_group = group.into();
        self
    }

    /// With table name for single-grid payloads
    #[inline]
    #[must_use]
    pub fn with_single_range_name(mut self, name: impl Into<String>) -> Self {
        self.single_range_name = name.into();
        self
    }

    /// Only ingest the named sheets
    #[must_use]
    pub fn with_sheet_filter<I, S>(mut self, sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sheet_filter = Some(sheets.into_iter().map(Into::into).collect());
        self
    }

    /// Whether a sheet passes the filter
    #[must_use]
    pub fn includes(&self, sheet: &str) -> bool {
        self.sheet_filter
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| n == sheet))
    }

    /// Render a timestamp with the configured format
    #[must_use]
    pub fn format_timestamp(&self, at: DateTime<Utc>) -> String {
        at.format(&self.timestamp_format).to_string()
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            default_group: DEFAULT_GROUP.to_string(),
            single_range_name: DEFAULT_SINGLE_RANGE_NAME.to_string(),
            sheet_filter: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}
