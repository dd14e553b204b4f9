//! Error types for the document model

/// Errors raised while persisting or fingerprinting documents
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Document JSON could not be read or written
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Fingerprint text is not a 32-byte hex digest
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(String),
}

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_fingerprint_display() {
        let err = ModelError::InvalidFingerprint("zz".to_string());
        assert_eq!(err.to_string(), "invalid fingerprint: zz");
    }

    #[test]
    fn serialization_error_converts() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ModelError = json_err.into();
        assert!(matches!(err, ModelError::Serialization(_)));
    }
}
