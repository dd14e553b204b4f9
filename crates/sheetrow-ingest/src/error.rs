//! Error types for ingestion
//!
//! Any of these aborts the whole ingest: no partial document is produced and
//! whatever document the caller held before stays in place.

/// Errors while reading a raw payload
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Payload is not valid JSON
    #[error("malformed payload: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),

    /// Payload is JSON but no known envelope shape matches it
    #[error("unrecognized payload envelope, expected one of: {expected}")]
    UnrecognizedEnvelope {
        /// Envelope formats that were tried
        expected: String,
    },

    /// A range entry exists but its shape is wrong
    #[error("invalid range '{range}': {message}")]
    InvalidRange {
        /// Range name, or its position when unnamed
        range: String,
        /// What was wrong with it
        message: String,
    },
}

impl IngestError {
    /// Create invalid range error
    pub fn invalid_range(range: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRange {
            range: range.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for ingestion
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_range_display() {
        let err = IngestError::invalid_range("Enemies", "row 3 is not an array");
        assert_eq!(err.to_string(), "invalid range 'Enemies': row 3 is not an array");
    }

    #[test]
    fn malformed_envelope_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: IngestError = json_err.into();
        assert!(err.to_string().starts_with("malformed payload"));
    }
}
