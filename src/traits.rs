//! Sink trait definitions.
//!
//! A `BatchSink` is the downstream end of a [`BatchWriter`](crate::BatchWriter):
//! it receives one drained batch at a time.

use crate::AggregateResult;
use async_trait::async_trait;

/// Destination for drained batches
///
/// # Example
///
/// ```rust,no_run
/// use batch_aggregate::{AggregateError, AggregateResult, BatchSink, Payload};
/// use async_trait::async_trait;
///
/// pub struct StdoutSink;
///
/// #[async_trait]
/// impl BatchSink for StdoutSink {
///     type Item = Payload;
///
///     async fn write_batch(&mut self, batch: Vec<Payload>) -> AggregateResult<()> {
///         let line = serde_json::to_string(&batch)
///             .map_err(|e| AggregateError::fatal_with_source("encode batch", e))?;
///         println!("{}", line);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait BatchSink: Send {
    /// Item type buffered for this sink
    type Item: Send;

    /// Write one batch, in insertion order
    ///
    /// # Errors
    ///
    /// Return `AggregateError::Retryable` for transient failures; the writer
    /// retries with backoff and keeps the items buffered meanwhile.
    /// Any other error is returned to the writer's caller as-is.
    async fn write_batch(&mut self, batch: Vec<Self::Item>) -> AggregateResult<()>;
}
