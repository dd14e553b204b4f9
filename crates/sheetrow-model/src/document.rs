//! Document, table and row containers
//!
//! Pure data plus the invariants the pipeline relies on. Serialization is a
//! one-to-one field mapping through serde; there is no schema versioning.

use crate::error::Result;
use crate::field_type::FieldType;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};

/// Group label every document carries
pub const DEFAULT_GROUP: &str = "Default";

/// Reserved delimiter separating the items of a multi-valued cell on the wire
pub const LIST_DELIMITER: char = '|';

/// Raw values of one logical row, keyed by column name in schema order
pub type RowValues = IndexMap<String, CellValue>;

/// Value of one cell of a logical row
///
/// A logical row that spans several physical source rows accumulates one item
/// per physical row. Its wire text joins those items with [`LIST_DELIMITER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Value read from a single physical row
    Single(String),

    /// Values accumulated from a row and its continuation rows, in order
    Multi(Vec<String>),
}

impl CellValue {
    /// Append the value read from a continuation row
    pub fn push(&mut self, item: impl Into<String>) {
        match self {
            Self::Single(first) => {
                let first = std::mem::take(first);
                *self = Self::Multi(vec![first, item.into()]);
            }
            Self::Multi(items) => items.push(item.into()),
        }
    }

    /// Wire text: the single value, or the items joined with `|`
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Single(value) => Cow::Borrowed(value),
            Self::Multi(items) => Cow::Owned(items.join(&LIST_DELIMITER.to_string())),
        }
    }

    /// Items of the cell, split on the reserved delimiter
    ///
    /// A single value holding literal `|` characters splits the same way as
    /// an accumulated one, so list columns read identically from either.
    #[must_use]
    pub fn items(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => value.split(LIST_DELIMITER).collect(),
            Self::Multi(items) => items
                .iter()
                .flat_map(|item| item.split(LIST_DELIMITER))
                .collect(),
        }
    }

    /// Whether the cell accumulated continuation rows
    #[inline]
    #[must_use]
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    /// Whether the wire text is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(value) => value.is_empty(),
            Self::Multi(items) => items.iter().all(String::is_empty) && items.len() <= 1,
        }
    }

    /// Human-readable rendering, items separated by `", "`
    #[must_use]
    pub fn display(&self) -> String {
        self.text().replace(LIST_DELIMITER, ", ")
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for CellValue {
    fn from(items: Vec<String>) -> Self {
        Self::Multi(items)
    }
}

/// Column descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within its table
    pub name: String,
    /// Type tag as authored in the source (case preserved)
    #[serde(rename = "type")]
    pub type_tag: String,
}

impl Column {
    /// Create a column descriptor
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }

    /// Semantic type of the tag
    #[inline]
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        FieldType::from_tag(&self.type_tag)
    }
}

/// One logical record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Row id, the first column's value when the row was opened
    pub id: String,
    /// Raw values by column name
    pub values: RowValues,
}

impl Row {
    /// Create an empty row with the given id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: RowValues::new(),
        }
    }

    /// Raw value stored under a column
    #[inline]
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    /// Wire text stored under a column
    #[inline]
    #[must_use]
    pub fn text(&self, column: &str) -> Option<Cow<'_, str>> {
        self.values.get(column).map(CellValue::text)
    }
}

/// Named dataset with a column schema and rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table name, unique within its document
    pub name: String,
    /// Group label
    pub group: String,
    /// Ordered column descriptors
    pub schema: Vec<Column>,
    /// Logical rows in source order
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table
    #[must_use]
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            schema: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Number of declared columns
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.schema.len()
    }

    /// Column descriptor by name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.schema.iter().find(|c| c.name == name)
    }

    /// Column names in schema order
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.iter().map(|c| c.name.as_str()).collect()
    }

    /// First row opened with the given id
    #[must_use]
    pub fn row(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }
}

/// Full set of tables ingested from one data source snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Tables in ingestion order
    pub tables: Vec<Table>,
    /// Group labels, each listed once
    pub groups: Vec<String>,
    /// When the document was last produced by ingestion
    pub last_modified: Option<DateTime<Utc>>,
}

impl Document {
    /// Create an empty document holding the default group
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            groups: vec![DEFAULT_GROUP.to_string()],
            last_modified: None,
        }
    }

    /// Table by name
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Mutable table by name
    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    /// Table names in document order
    #[must_use]
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Append a table, registering its group
    ///
    /// A table whose name is already present replaces the earlier one in place.
    pub fn push_table(&mut self, table: Table) {
        self.ensure_group(&table.group);
        match self.tables.iter_mut().find(|t| t.name == table.name) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    /// Add a group label if it is not present yet
    pub fn ensure_group(&mut self, group: &str) {
        if !self.groups.iter().any(|g| g == group) {
            self.groups.push(group.to_string());
        }
    }

    /// Tables belonging to a group
    pub fn tables_in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Table> + 'a {
        self.tables.iter().filter(move |t| t.group == group)
    }

    /// Stamp the last-modified time
    #[inline]
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_modified = Some(at);
    }

    /// Whether the document holds no tables
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON produced by [`Document::to_json`]
    ///
    /// # Errors
    /// Returns error if the JSON does not describe a document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
