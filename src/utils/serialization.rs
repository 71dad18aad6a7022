//! Serialization helpers for common formats.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Result type for serialization operations
pub type Result<T> = std::result::Result<T, SerializationError>;

/// JSON serialization helpers
pub mod json {
    use super::*;

    /// Serialize a value to compact JSON bytes
    pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    /// Deserialize from JSON bytes
    pub fn from_bytes<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Check that `bytes` hold exactly one well-formed JSON value
    pub fn validate(bytes: &[u8]) -> Result<()> {
        serde_json::from_slice::<IgnoredAny>(bytes)
            .map(|_| ())
            .map_err(|e| SerializationError::InvalidFormat(e.to_string()))
    }

    /// Length of the validated compact encoding
    pub fn encoded_len(encoded: &[u8]) -> Result<usize> {
        validate(encoded)?;
        Ok(encoded.len())
    }
}

/// String conversion helpers
pub mod string {
    use super::*;

    /// Convert bytes to UTF-8 string
    pub fn from_bytes(bytes: &[u8]) -> Result<&str> {
        Ok(std::str::from_utf8(bytes)?)
    }
}
