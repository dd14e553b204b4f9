//! Serializable pointers to rows

use crate::cache::MaterializationCache;
use crate::error::Result;
use crate::row::DataRow;
use serde::{Deserialize, Serialize};
use sheetrow_model::DEFAULT_GROUP;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Reference to one row of one table, storable alongside other data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRef {
    /// Group label of the table
    pub group: String,
    /// Table name; empty means "the table bound to the row type"
    pub table: String,
    /// Row id
    pub row_id: String,
}

impl RowRef {
    /// Create reference in the default group
    #[must_use]
    pub fn new(table: impl Into<String>, row_id: impl Into<String>) -> Self {
        Self {
            group: DEFAULT_GROUP.to_string(),
            table: table.into(),
            row_id: row_id.into(),
        }
    }

    /// Set group label
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Whether both the table and the row id are set
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.table.is_empty() && !self.row_id.is_empty()
    }

    /// Materialize the referenced row
    ///
    /// # Errors
    /// Same as [`MaterializationCache::get_in_table`], or
    /// [`MaterializationCache::get`] when no table is named
    pub fn resolve<T: DataRow>(&self, cache: &MaterializationCache) -> Result<Arc<T>> {
        if self.table.is_empty() {
            cache.get::<T>(&self.row_id)
        } else {
            cache.get_in_table::<T>(&self.table, &self.row_id)
        }
    }
}

impl Default for RowRef {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl Display for RowRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.group, self.table, self.row_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell;
    use crate::error::FieldParseError;
    use pretty_assertions::assert_eq;
    use sheetrow_model::{CellValue, Column, Document, Row, RowValues, Table};

    #[derive(Debug, Default)]
    struct Items {
        name: String,
    }

    impl DataRow for Items {
        fn set_data(&mut self, raw: &RowValues) -> std::result::Result<(), FieldParseError> {
            if let Some(value) = raw.get("name") {
                self.name = cell::parse("name", value)?;
            }
            Ok(())
        }
    }

    fn cache() -> MaterializationCache {
        let mut table = Table::new("Items", DEFAULT_GROUP);
        table.schema = vec![Column::new("id", "string"), Column::new("name", "string")];
        let mut row = Row::new("P1");
        row.values.insert("id".into(), CellValue::from("P1"));
        row.values.insert("name".into(), CellValue::from("Potion"));
        table.rows.push(row);

        let mut document = Document::new();
        document.push_table(table);
        let mut cache = MaterializationCache::default();
        cache.init([document]);
        cache
    }

    #[test]
    fn validity() {
        assert!(!RowRef::default().is_valid());
        assert!(!RowRef::new("Items", "").is_valid());
        assert!(RowRef::new("Items", "P1").is_valid());
    }

    #[test]
    fn resolves_named_and_implicit_tables() {
        let cache = cache();
        assert_eq!(RowRef::new("Items", "P1").resolve::<Items>(&cache).unwrap().name, "Potion");
        assert_eq!(RowRef::new("", "P1").resolve::<Items>(&cache).unwrap().name, "Potion");
        assert!(RowRef::new("Items", "P2").resolve::<Items>(&cache).is_err());
    }

    #[test]
    fn serializes_camel_case() {
        let reference = RowRef::new("Items", "P1").with_group("Shop");
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(json, r#"{"group":"Shop","table":"Items","rowId":"P1"}"#);
        assert_eq!(serde_json::from_str::<RowRef>(&json).unwrap(), reference);
        assert_eq!(reference.to_string(), "Shop/Items/P1");
    }
}
