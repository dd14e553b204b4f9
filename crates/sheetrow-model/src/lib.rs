//! Sheetrow Document Model
//!
//! The in-memory representation every pipeline stage agrees on.
//!
//! # Overview
//!
//! - **Document**: ordered tables, group labels, last-modified stamp
//! - **Table**: a named schema plus the logical rows ingested for it
//! - **Column / FieldType**: a column name and its case-insensitive type tag
//! - **CellValue**: a single cell or a multi-valued cell built from continuation rows
//! - **naming**: the identifier rules shared by code generation and runtime lookup
//!
//! # Example
//!
//! ```rust
//! use sheetrow_model::{CellValue, Column, Document, FieldType, Row, Table};
//!
//! let mut table = Table::new("Enemies", "Default");
//! table.schema.push(Column::new("id", "string"));
//! table.schema.push(Column::new("hp", "int"));
//!
//! let mut row = Row::new("E1");
//! row.values.insert("id".into(), CellValue::from("E1"));
//! row.values.insert("hp".into(), CellValue::from("50"));
//! table.rows.push(row);
//!
//! let mut document = Document::new();
//! document.push_table(table);
//!
//! let enemies = document.table("Enemies").unwrap();
//! assert_eq!(enemies.schema[1].field_type(), FieldType::Int);
//! ```

#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod field_type;
pub mod fingerprint;
pub mod naming;

// Re-exports
pub use document::{CellValue, Column, Document, Row, RowValues, Table, DEFAULT_GROUP, LIST_DELIMITER};
pub use error::{ModelError, Result};
pub use field_type::FieldType;
pub use fingerprint::TableFingerprint;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with documents
    pub use crate::{CellValue, Column, Document, FieldType, Row, RowValues, Table};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
