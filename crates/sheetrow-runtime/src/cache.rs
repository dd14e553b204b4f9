//! Materialization cache for typed rows
//!
//! Holds the active documents in registration order and, per document, a
//! two-level cache: table name to (row type, row id) to the materialized
//! instance. Instances are stored type-erased and handed out as `Arc<T>`, so
//! repeated lookups of the same row return the identical instance.
//!
//! Lookups run in two phases:
//! 1. a cache hit in the first document that holds one
//! 2. otherwise a scan of each document's table for a row whose id column
//!    (any of [`CacheConfig::id_keys`]) equals the requested id
//!
//! The cache is an explicit context object; nothing here is process-global.

use crate::error::{FieldParseError, LookupError, Result};
use crate::registry::RowTypeRegistry;
use crate::row::DataRow;
use dashmap::DashMap;
use sheetrow_ingest::{IngestError, Ingestor};
use sheetrow_model::naming::{matches_table, short_type_name};
use sheetrow_model::{Document, Row, Table, TableFingerprint};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Id-column names tried when scanning for a row
pub const DEFAULT_ID_KEYS: [&str; 3] = ["ID", "id", "Id"];

type Instance = Arc<dyn Any + Send + Sync>;
type EntryKey = (TypeId, String);

/// Lookup and pre-warm settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Column names whose value may identify a row
    pub id_keys: Vec<String>,
    /// Also match the row id taken from the first column
    pub match_row_id: bool,
    /// Pre-warm bound tables on `init` and `reload`
    pub prewarm_on_init: bool,
}

impl CacheConfig {
    /// Create default config
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set candidate id-column names
    #[must_use]
    pub fn with_id_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable first-column id matching
    #[must_use]
    pub fn with_match_row_id(mut self, enabled: bool) -> Self {
        self.match_row_id = enabled;
        self
    }

    /// Enable or disable the pre-warm sweep
    #[must_use]
    pub fn with_prewarm(mut self, enabled: bool) -> Self {
        self.prewarm_on_init = enabled;
        self
    }

    fn identifies(&self, row: &Row, row_id: &str) -> bool {
        (self.match_row_id && row.id == row_id)
            || self
                .id_keys
                .iter()
                .any(|key| row.get(key).is_some_and(|value| value.text() == row_id))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            id_keys: DEFAULT_ID_KEYS.iter().map(ToString::to_string).collect(),
            match_row_id: true,
            prewarm_on_init: true,
        }
    }
}

/// One row that failed to materialize during a pre-warm sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrewarmFailure {
    /// Table name
    pub table: String,
    /// Row id
    pub row_id: String,
    /// Parse failure
    pub error: FieldParseError,
}

/// Outcome of pre-warming one table of one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableWarmup {
    /// Table name
    pub table: String,
    /// Rows materialized
    pub materialized: usize,
    /// Rows that failed to parse
    pub failures: Vec<PrewarmFailure>,
}

/// Outcome of a pre-warm sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrewarmReport {
    /// Documents swept
    pub documents: usize,
    /// Tables warmed
    pub tables: usize,
    /// Rows materialized
    pub materialized: usize,
    /// Rows that failed to parse
    pub failures: Vec<PrewarmFailure>,
}

impl PrewarmReport {
    fn absorb(&mut self, warmup: TableWarmup) {
        self.tables += 1;
        self.materialized += warmup.materialized;
        self.failures.extend(warmup.failures);
    }

    /// Whether every row materialized
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of reloading one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Tables whose cached rows were dropped
    pub invalidated: Vec<String>,
    /// Pre-warm sweep of the reloaded document
    pub prewarm: PrewarmReport,
}

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Active documents
    pub documents: usize,
    /// Cached instances across all documents
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Table scans performed by lookups
    pub scans: u64,
    /// Lookups that found no row
    pub misses: u64,
}

/// One active document and its materialized rows
pub struct DocumentCache {
    document: Document,
    entries: DashMap<String, HashMap<EntryKey, Instance>>,
    fingerprints: HashMap<String, TableFingerprint>,
}

impl DocumentCache {
    /// Wrap a document with an empty cache
    #[must_use]
    pub fn new(document: Document) -> Self {
        let fingerprints = fingerprint_tables(&document);
        Self {
            document,
            entries: DashMap::new(),
            fingerprints,
        }
    }

    /// The cached document
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Instances cached for a table
    #[must_use]
    pub fn cached_rows(&self, table: &str) -> usize {
        self.entries.get(table).map_or(0, |rows| rows.len())
    }

    /// Instances cached across all tables
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().map(|rows| rows.len()).sum()
    }

    /// Whether nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop cached instances of a table
    pub fn invalidate(&self, table: &str) -> bool {
        self.entries.remove(table).is_some()
    }

    /// Drop every cached instance
    pub fn clear(&self) {
        self.entries.clear();
    }

    fn cached(&self, table: &str, type_id: TypeId, row_id: &str) -> Option<Instance> {
        self.entries
            .get(table)
            .and_then(|rows| rows.get(&(type_id, row_id.to_string())).cloned())
    }

    fn contains(&self, table: &str, type_id: TypeId, row_id: &str) -> bool {
        self.entries
            .get(table)
            .is_some_and(|rows| rows.contains_key(&(type_id, row_id.to_string())))
    }

    fn store(&self, table: &str, type_id: TypeId, row_id: &str, instance: Instance) {
        self.entries
            .entry(table.to_string())
            .or_default()
            .insert((type_id, row_id.to_string()), instance);
    }

    /// Swap in a new snapshot, dropping rows of changed or removed tables
    fn replace(&mut self, document: Document) -> Vec<String> {
        let fingerprints = fingerprint_tables(&document);
        let stale: Vec<String> = self
            .document
            .tables
            .iter()
            .map(|table| table.name.clone())
            .filter(|name| match (self.fingerprints.get(name), fingerprints.get(name)) {
                (Some(old), Some(new)) => old != new,
                _ => true,
            })
            .collect();

        for name in &stale {
            self.entries.remove(name);
        }
        self.document = document;
        self.fingerprints = fingerprints;
        stale
    }
}

impl fmt::Debug for DocumentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCache")
            .field("tables", &self.document.table_names())
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

fn fingerprint_tables(document: &Document) -> HashMap<String, TableFingerprint> {
    document
        .tables
        .iter()
        .filter_map(|table| match TableFingerprint::of(table) {
            Ok(fingerprint) => Some((table.name.clone(), fingerprint)),
            Err(e) => {
                warn!("Cannot fingerprint table {}: {}", table.name, e);
                None
            }
        })
        .collect()
}

/// Materialize every row of `table` as `T`, keyed by its row id
///
/// Rows with an empty id and rows already cached are skipped, so the first
/// row carrying a given id wins, the same row a lookup scan would find.
pub(crate) fn prewarm_table<T: DataRow>(cache: &DocumentCache, table: &Table) -> TableWarmup {
    let type_id = TypeId::of::<T>();
    let mut warmup = TableWarmup {
        table: table.name.clone(),
        ..TableWarmup::default()
    };

    for row in &table.rows {
        if row.id.is_empty() || cache.contains(&table.name, type_id, &row.id) {
            continue;
        }
        match T::materialize(&row.values) {
            Ok(instance) => {
                cache.store(&table.name, type_id, &row.id, Arc::new(instance));
                warmup.materialized += 1;
            }
            Err(error) => {
                warn!(table = %table.name, row_id = %row.id, %error, "Pre-warm failed");
                warmup.failures.push(PrewarmFailure {
                    table: table.name.clone(),
                    row_id: row.id.clone(),
                    error,
                });
            }
        }
    }

    warmup
}

/// Typed row lookups over a list of active documents
#[derive(Debug)]
pub struct MaterializationCache {
    registry: RowTypeRegistry,
    config: CacheConfig,
    documents: Vec<DocumentCache>,
    hits: AtomicU64,
    scans: AtomicU64,
    misses: AtomicU64,
}

impl MaterializationCache {
    /// Create cache with default config
    #[inline]
    #[must_use]
    pub fn new(registry: RowTypeRegistry) -> Self {
        Self::with_config(registry, CacheConfig::default())
    }

    /// Create cache with config
    #[must_use]
    pub fn with_config(registry: RowTypeRegistry, config: CacheConfig) -> Self {
        Self {
            registry,
            config,
            documents: Vec::new(),
            hits: AtomicU64::new(0),
            scans: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Row-type bindings
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &RowTypeRegistry {
        &self.registry
    }

    /// Lookup settings
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Replace the active documents and pre-warm them
    ///
    /// Every previously cached instance is dropped and the counters reset.
    pub fn init<I>(&mut self, documents: I) -> PrewarmReport
    where
        I: IntoIterator<Item = Document>,
    {
        self.documents = documents.into_iter().map(DocumentCache::new).collect();
        self.hits.store(0, Ordering::Relaxed);
        self.scans.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);

        info!("Active documents: {}", self.documents.len());

        if self.config.prewarm_on_init {
            self.prewarm()
        } else {
            PrewarmReport {
                documents: self.documents.len(),
                ..PrewarmReport::default()
            }
        }
    }

    /// Ingest every payload, then [`init`](Self::init) with the results
    ///
    /// # Errors
    /// Returns the first ingestion error; the active documents are unchanged
    pub fn init_from_payloads(
        &mut self,
        ingestor: &Ingestor,
        payloads: &[&str],
    ) -> std::result::Result<PrewarmReport, IngestError> {
        let documents = payloads
            .iter()
            .map(|payload| ingestor.ingest(payload))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(self.init(documents))
    }

    /// Materialize every row of every bound table in every document
    pub fn prewarm(&self) -> PrewarmReport {
        let mut report = PrewarmReport {
            documents: self.documents.len(),
            ..PrewarmReport::default()
        };
        for cache in &self.documents {
            self.prewarm_document(cache, &mut report);
        }
        info!(
            "Pre-warmed {} rows across {} tables",
            report.materialized, report.tables
        );
        report
    }

    fn prewarm_document(&self, cache: &DocumentCache, report: &mut PrewarmReport) {
        for binding in self.registry.bindings() {
            if let Some(table) = cache.document.table(binding.table()) {
                report.absorb(binding.prewarm(cache, table));
            }
        }
    }

    /// Replace the document at `index`, keeping cached rows of unchanged tables
    ///
    /// A table is unchanged when its fingerprint matches the previous
    /// snapshot's. An `index` past the end appends the document.
    pub fn reload(&mut self, index: usize, document: Document) -> ReloadReport {
        let invalidated = match self.documents.get_mut(index) {
            Some(cache) => cache.replace(document),
            None => {
                self.documents.push(DocumentCache::new(document));
                Vec::new()
            }
        };
        let index = index.min(self.documents.len() - 1);

        info!(
            "Reloaded document {}: {} tables invalidated",
            index,
            invalidated.len()
        );

        let mut prewarm = PrewarmReport {
            documents: 1,
            ..PrewarmReport::default()
        };
        if self.config.prewarm_on_init {
            self.prewarm_document(&self.documents[index], &mut prewarm);
        }
        ReloadReport {
            invalidated,
            prewarm,
        }
    }

    /// Look up a row of the table bound to `T`
    ///
    /// The table comes from the registry; an unregistered type falls back to
    /// the first loaded table whose generated type name equals `T`'s.
    ///
    /// # Errors
    /// - [`LookupError::UnboundType`] if no table can be bound to `T`
    /// - [`LookupError::NotFound`] if no active document holds the row
    /// - [`LookupError::Parse`] if the row fails to materialize
    pub fn get<T: DataRow>(&self, row_id: &str) -> Result<Arc<T>> {
        let table = self.table_name_for::<T>()?;
        self.get_in_table(&table, row_id)
    }

    /// Look up a row of a named table
    ///
    /// # Errors
    /// - [`LookupError::NotFound`] if no active document holds the row
    /// - [`LookupError::Parse`] if the row fails to materialize
    pub fn get_in_table<T: DataRow>(&self, table: &str, row_id: &str) -> Result<Arc<T>> {
        let type_id = TypeId::of::<T>();

        for cache in &self.documents {
            if let Some(row) = cache
                .cached(table, type_id, row_id)
                .and_then(|instance| instance.downcast::<T>().ok())
            {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(table, row_id, "Cache hit");
                return Ok(row);
            }

            let Some(source) = cache.document.table(table) else {
                continue;
            };
            self.scans.fetch_add(1, Ordering::Relaxed);
            if let Some(raw) = source
                .rows
                .iter()
                .find(|row| self.config.identifies(row, row_id))
            {
                let row = Arc::new(T::materialize(&raw.values)?);
                cache.store(table, type_id, row_id, row.clone());
                debug!(table, row_id, "Materialized on demand");
                return Ok(row);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        warn!(table, row_id, "Row not found in any active document");
        Err(LookupError::not_found(table, row_id))
    }

    /// Look up a row, substituting `T::default()` on any failure
    pub fn get_or_default<T: DataRow>(&self, row_id: &str) -> Arc<T> {
        self.get::<T>(row_id).unwrap_or_else(|error| {
            warn!(row_type = type_name::<T>(), %error, "Using default row");
            Arc::new(T::default())
        })
    }

    /// Table bound to `T`
    ///
    /// # Errors
    /// Returns [`LookupError::UnboundType`] if neither the registry nor any
    /// loaded table name matches
    pub fn table_name_for<T: DataRow>(&self) -> Result<String> {
        if let Some(table) = self.registry.table_for::<T>() {
            return Ok(table.to_string());
        }
        let ident = short_type_name(type_name::<T>());
        self.documents
            .iter()
            .flat_map(|cache| cache.document.tables.iter())
            .find(|table| matches_table(ident, &table.name))
            .map(|table| table.name.clone())
            .ok_or(LookupError::UnboundType {
                type_name: type_name::<T>(),
            })
    }

    /// First active document's table of that name
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.documents
            .iter()
            .find_map(|cache| cache.document.table(name))
    }

    /// Active documents in registration order
    pub fn documents(&self) -> impl Iterator<Item = &Document> + '_ {
        self.documents.iter().map(DocumentCache::document)
    }

    /// Per-document caches in registration order
    #[inline]
    #[must_use]
    pub fn document_caches(&self) -> &[DocumentCache] {
        &self.documents
    }

    /// Drop every cached instance, keeping the documents
    pub fn invalidate_all(&self) {
        for cache in &self.documents {
            cache.clear();
        }
    }

    /// Drop the documents and everything cached for them
    pub fn clear(&mut self) {
        self.documents.clear();
    }

    /// Current counters
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            documents: self.documents.len(),
            entries: self.documents.iter().map(DocumentCache::len).sum(),
            hits: self.hits.load(Ordering::Relaxed),
            scans: self.scans.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for MaterializationCache {
    fn default() -> Self {
        Self::new(RowTypeRegistry::new())
    }
}
