//! The contract generated row types implement

use crate::error::FieldParseError;
use sheetrow_model::RowValues;

/// A typed view of one logical row of one table
///
/// Generated code implements [`set_data`](DataRow::set_data) by reading each
/// schema column out of the raw values and parsing it with
/// [`cell::parse`](crate::cell::parse). Columns absent from `raw` keep the
/// field's default.
pub trait DataRow: Default + Send + Sync + 'static {
    /// Populate fields from a logical row's raw values
    ///
    /// # Errors
    /// Returns [`FieldParseError`] for the first cell that does not parse
    fn set_data(&mut self, raw: &RowValues) -> Result<(), FieldParseError>;

    /// Build a fresh instance from raw values
    ///
    /// # Errors
    /// Propagates [`set_data`](DataRow::set_data) failures
    fn materialize(raw: &RowValues) -> Result<Self, FieldParseError> {
        let mut row = Self::default();
        row.set_data(raw)?;
        Ok(row)
    }
}
