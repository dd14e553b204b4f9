//! Explicit table-to-row-type bindings
//!
//! Generated crates expose a `register` function that fills a
//! [`RowTypeRegistry`] with one binding per emitted table. The cache consults
//! it before falling back to matching type names against table names.

use crate::cache::{prewarm_table, DocumentCache, TableWarmup};
use crate::row::DataRow;
use sheetrow_model::Table;
use std::any::{type_name, TypeId};
use std::fmt;

/// Type-erased pre-warm entry point for one row type
pub type PrewarmFn = fn(&DocumentCache, &Table) -> TableWarmup;

/// Binding from a source table name to a generated row type
#[derive(Clone)]
pub struct RowBinding {
    table: String,
    type_id: TypeId,
    type_name: &'static str,
    prewarm: PrewarmFn,
}

impl RowBinding {
    /// Bind `T` to `table`
    #[must_use]
    pub fn of<T: DataRow>(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            prewarm: prewarm_table::<T>,
        }
    }

    /// Source table name
    #[inline]
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Row type identity
    #[inline]
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified row type name
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Materialize every row of `table` into `cache`
    pub fn prewarm(&self, cache: &DocumentCache, table: &Table) -> TableWarmup {
        (self.prewarm)(cache, table)
    }
}

impl fmt::Debug for RowBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowBinding")
            .field("table", &self.table)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Registry of row-type bindings, in registration order
#[derive(Debug, Clone, Default)]
pub struct RowTypeRegistry {
    bindings: Vec<RowBinding>,
}

impl RowTypeRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `T` to `table`, replacing any earlier binding of `T`
    pub fn register<T: DataRow>(&mut self, table: impl Into<String>) {
        let binding = RowBinding::of::<T>(table);
        match self.bindings.iter_mut().find(|b| b.type_id == binding.type_id) {
            Some(existing) => *existing = binding,
            None => self.bindings.push(binding),
        }
    }

    /// Builder form of [`register`](Self::register)
    #[must_use]
    pub fn with<T: DataRow>(mut self, table: impl Into<String>) -> Self {
        self.register::<T>(table);
        self
    }

    /// Table bound to `T`, if registered
    #[must_use]
    pub fn table_for<T: DataRow>(&self) -> Option<&str> {
        let id = TypeId::of::<T>();
        self.bindings
            .iter()
            .find(|b| b.type_id == id)
            .map(RowBinding::table)
    }

    /// All bindings
    #[inline]
    #[must_use]
    pub fn bindings(&self) -> &[RowBinding] {
        &self.bindings
    }

    /// Number of bindings
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
