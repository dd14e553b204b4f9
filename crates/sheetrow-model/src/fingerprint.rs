//! Content fingerprints for tables
//!
//! Provides [`TableFingerprint`], a Blake3 digest over a table's serialized
//! schema and rows. Two snapshots of a table with equal fingerprints hold the
//! same data, which is what cache invalidation on reload keys off.

use crate::document::Table;
use crate::error::{ModelError, Result};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 32-byte Blake3 digest of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TableFingerprint([u8; 32]);

impl TableFingerprint {
    /// Wrap raw digest bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Digest bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Fingerprint a table's schema and rows
    ///
    /// The table name and group are part of the digest as well, so a renamed
    /// table never compares equal to its old self.
    ///
    /// # Errors
    /// Returns error if the table cannot be serialized
    pub fn of(table: &Table) -> Result<Self> {
        let json = serde_json::to_vec(table)?;
        Ok(Self::new(*blake3::hash(&json).as_bytes()))
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for TableFingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for TableFingerprint {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| ModelError::InvalidFingerprint(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| ModelError::InvalidFingerprint(format!("{} bytes", b.len())))?;
        Ok(Self(arr))
    }
}
