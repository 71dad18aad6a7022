//! Batch writer: the drain-and-retry protocol on top of [`BoundedBatch`].
//!
//! The writer handles:
//! - admitting items and draining to the sink when the batch rejects
//! - reporting items that can never fit as `Oversized`
//! - retrying transient sink failures with exponential backoff
//! - metrics and structured logging

use crate::clock::{Clock, SystemClock};
use crate::metrics::AggregateMetrics;
use crate::retry::RetryStrategy;
use crate::size::Measure;
use crate::utils::{Admission, BoundedBatch};
use crate::{AggregateConfig, AggregateError, AggregateResult, BatchSink, WriteError};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Buffers items for a [`BatchSink`] and ships them in bounded batches
pub struct BatchWriter<S, C = SystemClock>
where
    S: BatchSink,
    C: Clock,
{
    batch: BoundedBatch<S::Item, C>,
    sink: S,
    retry: RetryStrategy,
    metrics: AggregateMetrics,
}

impl<S> BatchWriter<S>
where
    S: BatchSink,
    S::Item: Measure + Clone,
{
    /// Create a writer using the system clock
    pub fn new(config: &AggregateConfig, sink: S) -> Self {
        Self::with_clock(config, sink, SystemClock)
    }
}

impl<S, C> BatchWriter<S, C>
where
    S: BatchSink,
    S::Item: Measure + Clone,
    C: Clock,
{
    /// Create a writer with an injected clock
    pub fn with_clock(config: &AggregateConfig, sink: S, clock: C) -> Self {
        info!(
            aggregate = %config.name,
            max_count = config.limits.max_count,
            max_size = config.limits.max_size,
            max_age_ms = ?config.limits.max_age_ms,
            size_kind = %config.limits.size_kind,
            "Initializing batch writer"
        );

        Self {
            batch: BoundedBatch::from_limits_with_clock(&config.limits, clock),
            sink,
            retry: RetryStrategy::from_settings(&config.retry),
            metrics: AggregateMetrics::new(&config.name),
        }
    }

    /// Buffer one item, flushing first if the batch has no room for it
    ///
    /// On failure the item was not buffered and comes back inside the
    /// [`WriteError`], so a failed make-room flush never loses it.
    ///
    /// # Errors
    ///
    /// - measurement errors from the batch (`UnsupportedType`, `InvalidPayload`,
    ///   `InvalidConfiguration`)
    /// - `Oversized` when the item is rejected even by an empty batch
    /// - sink errors from the flush that made room; the earlier items stay buffered
    pub async fn write(&mut self, item: S::Item) -> Result<(), WriteError<S::Item>> {
        let item = match self.admit(item)? {
            None => return Ok(()),
            Some(item) => item,
        };

        if !self.batch.is_empty() {
            if let Err(error) = self.flush().await {
                return Err(WriteError::new(error, item));
            }
        } else if self.batch.is_expired() {
            // an idle window can lapse before anything was buffered
            self.batch.reset();
        } else {
            return Err(self.oversized(item));
        }

        match self.admit(item)? {
            None => Ok(()),
            Some(item) => Err(self.oversized(item)),
        }
    }

    /// Write every buffered item to the sink
    ///
    /// Items stay buffered until the sink accepts them, so a failed flush can
    /// be retried by calling `flush` again. Returns the number of items written.
    pub async fn flush(&mut self) -> AggregateResult<usize> {
        if self.batch.is_empty() {
            return Ok(0);
        }

        let count = self.batch.count();
        let bytes = self.batch.size();
        let start = Instant::now();
        let mut attempt = 0;

        loop {
            match self.sink.write_batch(self.batch.get().to_vec()).await {
                Ok(()) => break,
                Err(e) if e.is_retryable() && self.retry.should_retry(attempt) => {
                    attempt += 1;
                    self.metrics.record_retry();

                    let backoff = self.retry.calculate_backoff(attempt);
                    warn!("Retry attempt {} after {:?} - error: {}", attempt, backoff, e);

                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    error!(
                        aggregate = self.metrics.aggregate(),
                        count, "Failed to write batch: {}", e
                    );
                    self.metrics.record_error(e.kind());
                    return Err(e);
                }
            }
        }

        self.metrics.record_flush(count, bytes, start.elapsed());
        self.batch.reset();
        self.metrics.set_buffered(0, 0);
        debug!(count, bytes, attempts = attempt + 1, "Batch written");

        Ok(count)
    }

    /// Whether the batch is full by count, or holds items past its idle window
    pub fn should_flush(&self) -> bool {
        self.batch.is_full() || (!self.batch.is_empty() && self.batch.is_expired())
    }

    /// Flush only when [`should_flush`](Self::should_flush) says so
    ///
    /// Intended for periodic ticks from the caller's event loop.
    pub async fn flush_if_due(&mut self) -> AggregateResult<usize> {
        if self.should_flush() {
            self.flush().await
        } else {
            Ok(0)
        }
    }

    /// Flush what is left and hand back the sink
    pub async fn close(mut self) -> AggregateResult<S> {
        self.flush().await?;
        info!(aggregate = self.metrics.aggregate(), "Batch writer closed");
        Ok(self.sink)
    }

    /// The underlying batch
    pub fn batch(&self) -> &BoundedBatch<S::Item, C> {
        &self.batch
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn admit(&mut self, item: S::Item) -> Result<Option<S::Item>, WriteError<S::Item>> {
        match self.batch.try_add(item) {
            Ok(Admission::Accepted) => {
                self.metrics.record_accepted();
                self.metrics.set_buffered(self.batch.count(), self.batch.size());
                Ok(None)
            }
            Ok(Admission::Rejected(item)) => {
                // the item was measured a moment ago, so this cannot fail in practice
                if let Ok(Some(limit)) = self.batch.blocking_limit(&item) {
                    self.metrics.record_rejected(limit);
                }
                Ok(Some(item))
            }
            Err((error, item)) => {
                self.metrics.record_error(error.kind());
                Err(WriteError::new(error, item))
            }
        }
    }

    fn oversized(&self, item: S::Item) -> WriteError<S::Item> {
        let error = AggregateError::Oversized(format!(
            "item rejected by an empty batch (max_count={}, max_size={})",
            self.batch.max_count(),
            self.batch.max_size()
        ));
        self.metrics.record_error(error.kind());
        WriteError::new(error, item)
    }
}
