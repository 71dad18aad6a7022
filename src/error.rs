//! Error types for aggregate operations.

use crate::utils::SerializationError;
use thiserror::Error;

/// Result type for aggregate operations
pub type AggregateResult<T> = Result<T, AggregateError>;

/// Error types for aggregate operations
///
/// Capacity rejections are not errors: `BoundedBatch::add` reports them as
/// `Admission::Rejected`. Everything here is surfaced to the immediate caller.
#[derive(Error, Debug)]
pub enum AggregateError {
    /// The raw-length strategy was applied to an item with no defined byte length
    #[error("Unsupported type for raw-length sizing: {0}")]
    UnsupportedType(String),

    /// The json-length strategy could not encode the item, or the encoding is not valid JSON
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Unrecognized size kind, bad environment value or unreadable config file
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Item rejected by an empty batch; it can never fit the configured limits
    #[error("Oversized item: {0}")]
    Oversized(String),

    /// Transient sink failure that should be retried
    ///
    /// Examples: network timeouts, temporary service unavailability, rate limits
    #[error("Retryable error: {message}")]
    Retryable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Permanent sink failure
    #[error("Fatal error: {message}")]
    Fatal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AggregateError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, AggregateError::Retryable { .. })
    }

    /// Check if this error is fatal
    pub fn is_fatal(&self) -> bool {
        matches!(self, AggregateError::Fatal { .. })
    }

    /// Check if the item itself is at fault and must not be retried as-is
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            AggregateError::UnsupportedType(_)
                | AggregateError::InvalidPayload(_)
                | AggregateError::Oversized(_)
        )
    }

    /// Short stable name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            AggregateError::UnsupportedType(_) => "unsupported_type",
            AggregateError::InvalidPayload(_) => "invalid_payload",
            AggregateError::InvalidConfiguration(_) => "invalid_configuration",
            AggregateError::Oversized(_) => "oversized",
            AggregateError::Retryable { .. } => "retryable",
            AggregateError::Fatal { .. } => "fatal",
        }
    }

    /// Create a retryable error from a message
    pub fn retryable(message: impl Into<String>) -> Self {
        AggregateError::Retryable {
            message: message.into(),
            source: None,
        }
    }

    /// Create a retryable error with source
    pub fn retryable_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AggregateError::Retryable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a fatal error from a message
    pub fn fatal(message: impl Into<String>) -> Self {
        AggregateError::Fatal {
            message: message.into(),
            source: None,
        }
    }

    /// Create a fatal error with source
    pub fn fatal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AggregateError::Fatal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        AggregateError::InvalidConfiguration(message.into())
    }

    /// Create an invalid payload error
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        AggregateError::InvalidPayload(message.into())
    }
}

/// Failed [`BatchWriter::write`](crate::BatchWriter::write), carrying the item back
///
/// The item was not buffered. Retry it after a retryable error, or report it
/// when the error is permanent.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct WriteError<T> {
    /// Why the item was not buffered
    #[source]
    pub error: AggregateError,
    /// The item passed to `write`
    pub item: T,
}

impl<T> WriteError<T> {
    pub fn new(error: AggregateError, item: T) -> Self {
        Self { error, item }
    }

    /// Split into the error and the item
    pub fn into_parts(self) -> (AggregateError, T) {
        (self.error, self.item)
    }

    pub fn into_item(self) -> T {
        self.item
    }
}

impl<T> From<WriteError<T>> for AggregateError {
    fn from(err: WriteError<T>) -> Self {
        err.error
    }
}

impl From<serde_json::Error> for AggregateError {
    fn from(err: serde_json::Error) -> Self {
        AggregateError::InvalidPayload(err.to_string())
    }
}

impl From<SerializationError> for AggregateError {
    fn from(err: SerializationError) -> Self {
        AggregateError::InvalidPayload(err.to_string())
    }
}
