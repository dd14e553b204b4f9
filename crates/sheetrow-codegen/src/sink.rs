//! Source-unit sinks
//!
//! A sink persists `(relative path, text)` pairs and answers whether a path
//! already exists, which is all [`emit`] needs to honor write-once units.

use crate::error::{GenerateError, Result};
use crate::generator::SourceUnit;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Destination for generated source units
pub trait SourceSink {
    /// Whether a unit already exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Persist `contents` at `path`, replacing any previous contents
    ///
    /// # Errors
    /// Returns the underlying I/O error
    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()>;
}

/// In-memory sink, mostly for tests and previews
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, String>,
}

impl MemorySink {
    /// Create empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents stored at `path`
    #[must_use]
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    /// Stored paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Number of stored files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceSink for MemorySink {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

/// Sink writing under a root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Create sink rooted at `root`
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceSink for DirectorySink {
    fn exists(&self, path: &Path) -> bool {
        self.root.join(path).exists()
    }

    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, contents)
    }
}

/// Why a unit was not written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Write-once unit already present in the sink
    AlreadyExists,
}

/// Outcome of emitting units into a sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Paths written, in unit order
    pub written: Vec<PathBuf>,
    /// Paths skipped, in unit order
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

/// Write units into a sink
///
/// Write-once units (package metadata) are skipped when the sink already
/// holds them; everything else is overwritten.
///
/// # Errors
/// Returns [`GenerateError::Sink`] on the first failed write
pub fn emit<S: SourceSink + ?Sized>(units: &[SourceUnit], sink: &mut S) -> Result<EmitReport> {
    let mut report = EmitReport::default();
    for unit in units {
        if unit.kind.is_write_once() && sink.exists(&unit.path) {
            info!("Skipping {}: already exists", unit.path.display());
            report
                .skipped
                .push((unit.path.clone(), SkipReason::AlreadyExists));
            continue;
        }
        sink.write(&unit.path, &unit.contents)
            .map_err(|e| GenerateError::sink(&unit.path, e))?;
        debug!("Wrote {}", unit.path.display());
        report.written.push(unit.path.clone());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::UnitKind;

    fn unit(path: &str, kind: UnitKind) -> SourceUnit {
        SourceUnit {
            path: PathBuf::from(path),
            contents: format!("// {path}\n"),
            kind,
        }
    }

    #[test]
    fn write_once_units_are_skipped() {
        let units = vec![
            unit("src/lib.rs", UnitKind::Registry),
            unit("Cargo.toml", UnitKind::PackageMetadata),
        ];
        let mut sink = MemorySink::new();
        sink.write(Path::new("Cargo.toml"), "hand edited").unwrap();

        let report = emit(&units, &mut sink).unwrap();
        assert_eq!(report.written, vec![PathBuf::from("src/lib.rs")]);
        assert_eq!(
            report.skipped,
            vec![(PathBuf::from("Cargo.toml"), SkipReason::AlreadyExists)]
        );
        assert_eq!(sink.get("Cargo.toml"), Some("hand edited"));
    }

    #[test]
    fn directory_sink_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        let units = vec![unit("src/items.rs", UnitKind::Row { table: "Items".into() })];

        emit(&units, &mut sink).unwrap();
        let written = fs::read_to_string(dir.path().join("src/items.rs")).unwrap();
        assert_eq!(written, "// src/items.rs\n");
        assert!(sink.exists(Path::new("src/items.rs")));
    }

    #[test]
    fn directory_sink_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("src"), "a file, not a directory").unwrap();
        let mut sink = DirectorySink::new(dir.path());
        let units = vec![unit("src/items.rs", UnitKind::Registry)];

        let err = emit(&units, &mut sink).unwrap_err();
        assert!(matches!(err, GenerateError::Sink { ref path, .. } if path == Path::new("src/items.rs")));
    }
}
