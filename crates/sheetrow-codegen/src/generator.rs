//! Code generator
//!
//! Produces, for a document:
//! - one row-type unit per table (`src/<module>.rs`; reserved modules such as
//!   `lib` get a `_row` suffix)
//! - one registry unit (`src/lib.rs`) binding table names to row types
//! - one package-metadata unit (`Cargo.toml`), written once
//!
//! Output depends only on the document and the options; tables are emitted
//! in document order.

use crate::error::{GenerateError, Result};
use crate::mapper::TableMapping;
use crate::options::GenerateOptions;
use crate::render;
use sheetrow_model::Document;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Relative path of the registry unit
pub const REGISTRY_PATH: &str = "src/lib.rs";

/// Relative path of the package-metadata unit
pub const MANIFEST_PATH: &str = "Cargo.toml";

/// Role of a generated unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    /// Row type for a table
    Row {
        /// Source table name
        table: String,
    },
    /// Registry binding tables to row types
    Registry,
    /// Package metadata
    PackageMetadata,
}

impl UnitKind {
    /// Whether an existing copy must never be overwritten
    #[inline]
    #[must_use]
    pub fn is_write_once(&self) -> bool {
        matches!(self, Self::PackageMetadata)
    }
}

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path relative to the output root
    pub path: PathBuf,
    /// File text
    pub contents: String,
    /// Role of the unit
    pub kind: UnitKind,
}

/// Generates row types from documents
#[derive(Debug, Clone, Default)]
pub struct CodeGenerator {
    options: GenerateOptions,
}

impl CodeGenerator {
    /// Create generator with options
    #[inline]
    #[must_use]
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    /// Generation options
    #[inline]
    #[must_use]
    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Map the tables that pass the filter
    ///
    /// # Errors
    /// - [`GenerateError::EmptyDocument`] if no table passes the filter
    /// - [`GenerateError::NameCollision`] if two tables share a type or module name
    pub fn plan(&self, document: &Document) -> Result<Vec<TableMapping>> {
        if let Some(filter) = &self.options.table_filter {
            for name in filter {
                if document.table(name).is_none() {
                    warn!("Filtered table {} not in document", name);
                }
            }
        }

        let mappings: Vec<TableMapping> = document
            .tables
            .iter()
            .filter(|table| self.options.includes(&table.name))
            .map(TableMapping::of)
            .collect();

        if mappings.is_empty() {
            return Err(GenerateError::EmptyDocument);
        }

        let mut types: HashMap<&str, &str> = HashMap::new();
        let mut modules: HashMap<&str, &str> = HashMap::new();
        for mapping in &mappings {
            let seen = types
                .insert(&mapping.type_name, &mapping.table)
                .map(|first| (first, mapping.type_name.as_str()))
                .or_else(|| {
                    modules
                        .insert(&mapping.module, &mapping.table)
                        .map(|first| (first, mapping.module.as_str()))
                });
            if let Some((first, name)) = seen {
                return Err(GenerateError::NameCollision {
                    type_name: name.to_string(),
                    first: first.to_string(),
                    second: mapping.table.clone(),
                });
            }
        }

        Ok(mappings)
    }

    /// Generate row, registry and package-metadata units
    ///
    /// # Errors
    /// Same as [`plan`](Self::plan)
    pub fn generate(&self, document: &Document) -> Result<Vec<SourceUnit>> {
        let mappings = self.plan(document)?;
        let mut units = Vec::with_capacity(mappings.len() + 2);

        for mapping in &mappings {
            debug!("Generating {} from table {}", mapping.type_name, mapping.table);
            units.push(SourceUnit {
                path: PathBuf::from(format!("src/{}.rs", mapping.module)),
                contents: render::render_row(mapping),
                kind: UnitKind::Row {
                    table: mapping.table.clone(),
                },
            });
        }
        units.push(SourceUnit {
            path: PathBuf::from(REGISTRY_PATH),
            contents: render::render_registry(&mappings),
            kind: UnitKind::Registry,
        });
        units.push(SourceUnit {
            path: PathBuf::from(MANIFEST_PATH),
            contents: render::render_manifest(&self.options),
            kind: UnitKind::PackageMetadata,
        });

        info!(
            "Generated {} row types for {}",
            mappings.len(),
            self.options.crate_name()
        );
        Ok(units)
    }

    /// Generate one file holding every row type and the registry functions
    ///
    /// Meant for build scripts that `include!` the output.
    ///
    /// # Errors
    /// Same as [`plan`](Self::plan)
    pub fn generate_inline(&self, document: &Document) -> Result<String> {
        let mappings = self.plan(document)?;
        info!("Generated {} inline row types", mappings.len());
        Ok(render::render_inline(&mappings))
    }
}

/// Generate units with the given options
///
/// # Errors
/// Same as [`CodeGenerator::plan`]
pub fn generate(document: &Document, options: GenerateOptions) -> Result<Vec<SourceUnit>> {
    CodeGenerator::new(options).generate(document)
}
