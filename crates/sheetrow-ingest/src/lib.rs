//! Sheetrow Ingestion
//!
//! The boundary between raw sheet payloads and the document model.
//!
//! # Core Operations
//!
//! - **Envelope parsing**: JSON payload → named ranges of text cells
//! - **Normalization**: named range → [`Table`](sheetrow_model::Table), folding
//!   continuation rows into multi-valued cells
//! - **Ingest**: payload → fresh [`Document`](sheetrow_model::Document)
//!
//! # Architecture
//!
//! ```text
//! payload JSON → EnvelopeRegistry → NamedRange* → normalize_range → Table* → Document
//! ```
//!
//! # Example
//!
//! ```rust
//! use sheetrow_ingest::Ingestor;
//!
//! let payload = r#"{"values": [["id","name","val"],["string","string","int"],
//!                              ["A","x","1"],["","y","2"]]}"#;
//! let document = Ingestor::default().ingest(payload).unwrap();
//!
//! let table = document.table("ImportedSheet").unwrap();
//! assert_eq!(table.rows.len(), 1);
//! assert_eq!(table.rows[0].text("name").as_deref(), Some("x|y"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod ingestor;
pub mod normalize;
pub mod template;

// Re-exports for convenience
pub use config::IngestConfig;
pub use envelope::{EnvelopeFormat, EnvelopeRegistry, Grid, NamedRange, RawPayload};
pub use error::{IngestError, Result};
pub use ingestor::{DocumentSlot, Ingestor};
pub use normalize::normalize_range;
pub use template::{template_grid, template_range};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for ingesting payloads
    pub use crate::{DocumentSlot, IngestConfig, IngestError, Ingestor, NamedRange, RawPayload};
}
