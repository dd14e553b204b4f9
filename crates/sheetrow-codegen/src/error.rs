//! Error types for source generation

use std::path::PathBuf;

/// Errors that stop generation or emission
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Nothing left to generate after the table filter
    #[error("document has no tables to generate")]
    EmptyDocument,

    /// Two tables map to the same row type name
    #[error("tables '{first}' and '{second}' both generate type {type_name}")]
    NameCollision {
        /// Type name both tables produce
        type_name: String,
        /// Earlier table
        first: String,
        /// Later table
        second: String,
    },

    /// A sink failed to persist a unit
    #[error("sink error writing {path}: {source}")]
    Sink {
        /// Relative unit path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    /// Create sink error for path
    pub fn sink(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Sink {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for generation
pub type Result<T> = std::result::Result<T, GenerateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_display() {
        let err = GenerateError::NameCollision {
            type_name: "EnemyStats".into(),
            first: "enemy_stats".into(),
            second: "Enemy Stats".into(),
        };
        assert_eq!(
            err.to_string(),
            "tables 'enemy_stats' and 'Enemy Stats' both generate type EnemyStats"
        );
    }

    #[test]
    fn sink_display() {
        let err = GenerateError::sink(
            "src/items.rs",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "sink error writing src/items.rs: denied");
    }
}
