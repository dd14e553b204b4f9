//! Payload envelopes
//!
//! A payload arrives as JSON wrapping one or more grids of cells. Each shape
//! the provider can send is an [`EnvelopeFormat`]; the [`EnvelopeRegistry`]
//! tries them in priority order and turns the payload into named ranges of
//! text cells.

use crate::error::{IngestError, Result};
use serde_json::{Map, Value};
use std::fmt;

/// Rows of text cells: row 0 holds column names, row 1 type tags, the rest data
pub type Grid = Vec<Vec<String>>;

/// One source table as delivered by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRange {
    /// Sheet name
    pub name: String,
    /// Cell grid
    pub grid: Grid,
}

impl NamedRange {
    /// Create a named range from any nested sequence of cell texts
    #[must_use]
    pub fn new<R, C, S>(name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            grid: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

/// A parsed payload: one or more named ranges in delivery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPayload {
    /// Ranges in the order the provider listed them
    pub ranges: Vec<NamedRange>,
}

impl RawPayload {
    /// Payload holding the given ranges
    #[inline]
    #[must_use]
    pub fn new(ranges: Vec<NamedRange>) -> Self {
        Self { ranges }
    }

    /// Sheet names in delivery order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.ranges.iter().map(|r| r.name.as_str()).collect()
    }
}

/// A payload shape the provider may send
///
/// Implement this trait to accept new envelope shapes.
pub trait EnvelopeFormat: Send + Sync + 'static {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Whether the JSON root object has this shape
    fn matches(&self, root: &Map<String, Value>) -> bool;

    /// Extract the named ranges
    ///
    /// # Errors
    /// Returns error if a range inside the envelope is malformed
    fn ranges(&self, root: &Map<String, Value>) -> Result<Vec<NamedRange>>;

    /// Priority (higher = tried first when several formats match)
    fn priority(&self) -> i32 {
        0
    }
}

/// Batch envelope: `{"valueRanges": [{"range": "'Sheet'!A1:Z9", "values": [[...]]}]}`
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchEnvelope;

impl EnvelopeFormat for BatchEnvelope {
    fn name(&self) -> &'static str {
        "valueRanges"
    }

    fn matches(&self, root: &Map<String, Value>) -> bool {
        root.contains_key("valueRanges")
    }

    fn ranges(&self, root: &Map<String, Value>) -> Result<Vec<NamedRange>> {
        let entries = root
            .get("valueRanges")
            .and_then(Value::as_array)
            .ok_or_else(|| IngestError::invalid_range("valueRanges", "expected an array of ranges"))?;

        let mut ranges = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let label = format!("#{index}");
            let range = entry
                .get("range")
                .and_then(Value::as_str)
                .ok_or_else(|| IngestError::invalid_range(&label, "missing 'range' name"))?;
            let name = sheet_name(range);

            // The provider omits `values` for an empty sheet.
            let Some(values) = entry.get("values") else {
                tracing::debug!("range '{}' carries no values, skipping", name);
                continue;
            };
            ranges.push(NamedRange {
                grid: grid_from_json(&name, values)?,
                name,
            });
        }
        Ok(ranges)
    }

    fn priority(&self) -> i32 {
        10
    }
}

/// Single-grid envelope: `{"values": [[...]]}`, named by configuration
#[derive(Debug, Clone)]
pub struct SingleGridEnvelope {
    name: String,
}

impl SingleGridEnvelope {
    /// Create envelope format that names its one table `name`
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl EnvelopeFormat for SingleGridEnvelope {
    fn name(&self) -> &'static str {
        "values"
    }

    fn matches(&self, root: &Map<String, Value>) -> bool {
        root.contains_key("values")
    }

    fn ranges(&self, root: &Map<String, Value>) -> Result<Vec<NamedRange>> {
        let values = root
            .get("values")
            .ok_or_else(|| IngestError::invalid_range(&self.name, "missing 'values'"))?;
        Ok(vec![NamedRange {
            name: self.name.clone(),
            grid: grid_from_json(&self.name, values)?,
        }])
    }
}

/// Ordered set of envelope formats
pub struct EnvelopeRegistry {
    formats: Vec<Box<dyn EnvelopeFormat>>,
}

impl fmt::Debug for EnvelopeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeRegistry")
            .field("formats", &self.format_names())
            .finish()
    }
}

impl EnvelopeRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            formats: Vec::new(),
        }
    }

    /// Registry with the batch and single-grid formats
    #[must_use]
    pub fn with_defaults(single_range_name: &str) -> Self {
        let mut registry = Self::new();
        registry.register(BatchEnvelope);
        registry.register(SingleGridEnvelope::new(single_range_name));
        registry
    }

    /// Register a format
    pub fn register<F: EnvelopeFormat>(&mut self, format: F) {
        self.formats.push(Box::new(format));
        // Sort by priority (higher first)
        self.formats.sort_by_key(|f| std::cmp::Reverse(f.priority()));
    }

    /// Names of registered formats, in trial order
    #[must_use]
    pub fn format_names(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.name()).collect()
    }

    /// Parse payload text into named ranges
    ///
    /// # Errors
    /// - `IngestError::MalformedEnvelope` if the text is not JSON
    /// - `IngestError::UnrecognizedEnvelope` if no format matches
    /// - `IngestError::InvalidRange` if a range is malformed
    pub fn parse(&self, payload: &str) -> Result<RawPayload> {
        let value: Value = serde_json::from_str(payload)?;
        self.parse_value(&value)
    }

    /// Parse an already-decoded JSON payload
    ///
    /// # Errors
    /// Same as [`EnvelopeRegistry::parse`], minus JSON syntax errors
    pub fn parse_value(&self, value: &Value) -> Result<RawPayload> {
        let root = value.as_object().ok_or_else(|| self.unrecognized())?;
        let format = self
            .formats
            .iter()
            .find(|f| f.matches(root))
            .ok_or_else(|| self.unrecognized())?;

        tracing::debug!("payload matched '{}' envelope", format.name());
        Ok(RawPayload::new(format.ranges(root)?))
    }

    fn unrecognized(&self) -> IngestError {
        IngestError::UnrecognizedEnvelope {
            expected: self.format_names().join(", "),
        }
    }
}

impl Default for EnvelopeRegistry {
    fn default() -> Self {
        Self::with_defaults(crate::config::DEFAULT_SINGLE_RANGE_NAME)
    }
}

/// Sheet name from an A1 range: `'Enemy Stats'!A1:Z100` → `Enemy Stats`
#[must_use]
pub fn sheet_name(range: &str) -> String {
    range.split('!').next().unwrap_or(range).replace('\'', "")
}

/// Text of one JSON cell
///
/// Strings are taken verbatim, null is empty, other scalars use their JSON text.
#[must_use]
pub fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn grid_from_json(range: &str, values: &Value) -> Result<Grid> {
    let rows = values
        .as_array()
        .ok_or_else(|| IngestError::invalid_range(range, "'values' is not an array of rows"))?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            row.as_array()
                .map(|cells| cells.iter().map(cell_text).collect())
                .ok_or_else(|| {
                    IngestError::invalid_range(range, format!("row {index} is not an array"))
                })
        })
        .collect()
}
