//! Sheetrow Code Generation
//!
//! Turns a [`Document`](sheetrow_model::Document) into Rust source: one row
//! type per table, a registry binding table names to those types, and the
//! package metadata of the generated crate.
//!
//! # Architecture
//!
//! ```text
//! Document → plan (TableMapping*) → render → SourceUnit* → emit → SourceSink
//! ```
//!
//! # Example
//!
//! ```rust
//! use sheetrow_codegen::{emit, CodeGenerator, GenerateOptions, MemorySink};
//! use sheetrow_model::{Column, Document, Table};
//!
//! let mut table = Table::new("Enemies", "Default");
//! table.schema.push(Column::new("id", "string"));
//! table.schema.push(Column::new("hp", "int"));
//! let mut document = Document::new();
//! document.push_table(table);
//!
//! let units = CodeGenerator::new(GenerateOptions::default()).generate(&document).unwrap();
//! let mut sink = MemorySink::new();
//! emit(&units, &mut sink).unwrap();
//!
//! assert!(sink.get("src/enemies.rs").unwrap().contains("pub hp: i32,"));
//! // package metadata is written once
//! assert_eq!(emit(&units, &mut sink).unwrap().skipped.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod generator;
pub mod mapper;
pub mod options;
pub mod render;
pub mod sink;

// Re-exports for convenience
pub use error::{GenerateError, Result};
pub use generator::{generate, CodeGenerator, SourceUnit, UnitKind, MANIFEST_PATH, REGISTRY_PATH};
pub use mapper::{module_name, rust_type, FieldMapping, TableMapping};
pub use options::GenerateOptions;
pub use sink::{emit, DirectorySink, EmitReport, MemorySink, SkipReason, SourceSink};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for generating row types
    pub use crate::{emit, CodeGenerator, GenerateOptions, SourceSink, SourceUnit};
}
