//! Generation options

use sheetrow_model::naming;

/// Default output namespace
pub const DEFAULT_NAMESPACE: &str = naming::FALLBACK_CRATE;

/// Default dependency requirement for the runtime crate
pub const DEFAULT_RUNTIME_DEPENDENCY: &str = "\"0.1\"";

/// Options for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Output namespace; becomes the generated package name
    pub namespace: String,
    /// Right-hand side of the `sheetrow-runtime` dependency line
    pub runtime_dependency: String,
    /// Tables to generate; `None` generates every table
    pub table_filter: Option<Vec<String>>,
}

impl GenerateOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set output namespace
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Depend on a published runtime version
    #[must_use]
    pub fn with_runtime_version(mut self, version: &str) -> Self {
        self.runtime_dependency = format!("{version:?}");
        self
    }

    /// Depend on a runtime crate checked out at `path`
    #[must_use]
    pub fn with_runtime_path(mut self, path: &str) -> Self {
        self.runtime_dependency = format!("{{ path = {path:?} }}");
        self
    }

    /// Restrict generation to the named tables
    #[must_use]
    pub fn with_table_filter<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table_filter = Some(tables.into_iter().map(Into::into).collect());
        self
    }

    /// Whether a table passes the filter
    #[must_use]
    pub fn includes(&self, table: &str) -> bool {
        self.table_filter
            .as_ref()
            .map_or(true, |tables| tables.iter().any(|t| t == table))
    }

    /// Generated package name
    #[must_use]
    pub fn crate_name(&self) -> String {
        naming::crate_name(&self.namespace)
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            runtime_dependency: DEFAULT_RUNTIME_DEPENDENCY.to_string(),
            table_filter: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = GenerateOptions::default();
        assert_eq!(options.crate_name(), "sheetrow-generated");
        assert_eq!(options.runtime_dependency, "\"0.1\"");
        assert!(options.includes("anything"));
    }

    #[test]
    fn filter_and_namespace() {
        let options = GenerateOptions::new()
            .with_namespace("Game.Data")
            .with_table_filter(["Items"]);
        assert_eq!(options.crate_name(), "game-data");
        assert!(options.includes("Items"));
        assert!(!options.includes("Enemies"));
    }

    #[test]
    fn runtime_dependency_forms() {
        let path = GenerateOptions::new().with_runtime_path("../sheetrow-runtime");
        assert_eq!(path.runtime_dependency, r#"{ path = "../sheetrow-runtime" }"#);
        let version = GenerateOptions::new().with_runtime_version("0.2");
        assert_eq!(version.runtime_dependency, "\"0.2\"");
    }
}
