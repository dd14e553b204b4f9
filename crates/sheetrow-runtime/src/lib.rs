//! Sheetrow Runtime
//!
//! Turns the raw rows of loaded documents into instances of generated row
//! types, on demand or in a pre-warm sweep.
//!
//! # Core Components
//!
//! - [`DataRow`]: the contract every generated row type implements
//! - [`cell`]: scalar, vector, color and list parsers used by generated code
//! - [`RowTypeRegistry`]: explicit table-name to row-type bindings
//! - [`MaterializationCache`]: active documents plus per-document row caches
//! - [`RowRef`]: a serializable pointer to one row
//!
//! # Example
//!
//! ```rust
//! use sheetrow_runtime::{cell, DataRow, FieldParseError, MaterializationCache, RowValues};
//! use sheetrow_ingest::Ingestor;
//!
//! #[derive(Debug, Default)]
//! struct Enemies {
//!     id: String,
//!     hp: i32,
//! }
//!
//! impl DataRow for Enemies {
//!     fn set_data(&mut self, raw: &RowValues) -> Result<(), FieldParseError> {
//!         if let Some(value) = raw.get("id") {
//!             self.id = cell::parse("id", value)?;
//!         }
//!         if let Some(value) = raw.get("hp") {
//!             self.hp = cell::parse("hp", value)?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let payload = r#"{"valueRanges":[{"range":"Enemies!A1:B3",
//!     "values":[["id","hp"],["string","int"],["E1","50"]]}]}"#;
//!
//! let mut cache = MaterializationCache::default();
//! cache.init_from_payloads(&Ingestor::default(), &[payload]).unwrap();
//! assert_eq!(cache.get::<Enemies>("E1").unwrap().hp, 50);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod cell;
pub mod error;
pub mod reference;
pub mod registry;
pub mod row;

// Re-exports for convenience
pub use cache::{
    CacheConfig, CacheStats, DocumentCache, MaterializationCache, PrewarmFailure, PrewarmReport,
    ReloadReport, TableWarmup, DEFAULT_ID_KEYS,
};
pub use cell::{Color, FromCell, Vector2, Vector3};
pub use error::{FieldParseError, LookupError, Result};
pub use reference::RowRef;
pub use registry::{RowBinding, RowTypeRegistry};
pub use row::DataRow;
pub use sheetrow_model::{CellValue, Document, RowValues};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for consuming generated row types
    pub use crate::{Color, DataRow, LookupError, MaterializationCache, RowRef, RowTypeRegistry, Vector2, Vector3};
}
