//! Ingestor - main entry point
//!
//! Provides the payload → document pass and a slot that keeps the last good
//! document when a refresh fails.

use crate::config::IngestConfig;
use crate::envelope::{EnvelopeRegistry, RawPayload};
use crate::error::Result;
use crate::normalize::normalize_range;
use chrono::Utc;
use sheetrow_model::{Document, DEFAULT_GROUP};

/// Converts raw payloads into fresh documents
#[derive(Debug)]
pub struct Ingestor {
    config: IngestConfig,
    envelopes: EnvelopeRegistry,
}

impl Ingestor {
    /// Create ingestor with the given configuration
    #[must_use]
    pub fn new(config: IngestConfig) -> Self {
        let envelopes = EnvelopeRegistry::with_defaults(&config.single_range_name);
        Self { config, envelopes }
    }

    /// Create ingestor with a custom envelope registry
    #[must_use]
    pub fn with_envelopes(config: IngestConfig, envelopes: EnvelopeRegistry) -> Self {
        Self { config, envelopes }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingest payload text into a new document
    ///
    /// # Errors
    /// Any envelope error aborts the whole ingest; see [`EnvelopeRegistry::parse`].
    pub fn ingest(&self, payload: &str) -> Result<Document> {
        let raw = self.envelopes.parse(payload)?;
        Ok(self.ingest_payload(&raw))
    }

    /// Normalize already-parsed ranges into a new document
    ///
    /// One table per range that passes the sheet filter and carries a type
    /// row; the document is stamped and always holds the default group.
    #[must_use]
    pub fn ingest_payload(&self, raw: &RawPayload) -> Document {
        let mut document = Document::new();

        for range in &raw.ranges {
            if !self.config.includes(&range.name) {
                tracing::debug!("sheet '{}' not selected, skipping", range.name);
                continue;
            }
            if let Some(table) = normalize_range(range, &self.config.default_group) {
                tracing::debug!(
                    "sheet '{}': {} columns, {} rows",
                    table.name,
                    table.width(),
                    table.rows.len()
                );
                document.push_table(table);
            }
        }

        document.touch(Utc::now());
        document.ensure_group(DEFAULT_GROUP);
        tracing::info!("Tables loaded: {}", document.tables.len());
        document
    }

    /// Sheet names a payload carries, without normalizing it
    ///
    /// # Errors
    /// Same as [`Ingestor::ingest`]
    pub fn available_sheets(&self, payload: &str) -> Result<Vec<String>> {
        let raw = self.envelopes.parse(payload)?;
        Ok(raw.ranges.into_iter().map(|r| r.name).collect())
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new(IngestConfig::default())
    }
}

/// Holds the current document for a data source
///
/// A refresh replaces the document wholesale, and only when ingestion
/// succeeds; a failed refresh leaves the previous document in place.
#[derive(Debug, Default)]
pub struct DocumentSlot {
    ingestor: Ingestor,
    document: Option<Document>,
}

impl DocumentSlot {
    /// Create empty slot
    #[inline]
    #[must_use]
    pub fn new(ingestor: Ingestor) -> Self {
        Self {
            ingestor,
            document: None,
        }
    }

    /// Create slot seeded with a previously saved document
    #[inline]
    #[must_use]
    pub fn with_document(ingestor: Ingestor, document: Document) -> Self {
        Self {
            ingestor,
            document: Some(document),
        }
    }

    /// Re-ingest from payload text
    ///
    /// # Errors
    /// Returns the ingestion error; the held document is unchanged
    pub fn refresh(&mut self, payload: &str) -> Result<&Document> {
        match self.ingestor.ingest(payload) {
            Ok(document) => Ok(&*self.document.insert(document)),
            Err(e) => {
                tracing::error!("Parse Error: {}", e);
                Err(e)
            }
        }
    }

    /// Current document, if any ingest has succeeded
    #[inline]
    #[must_use]
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Take the current document out of the slot
    #[inline]
    pub fn take(&mut self) -> Option<Document> {
        self.document.take()
    }
}
