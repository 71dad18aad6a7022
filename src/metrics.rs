//! Metrics and observability for aggregates.

use crate::Limit;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Metrics collector for a batch writer
#[derive(Debug, Clone)]
pub struct AggregateMetrics {
    /// Aggregate name for labeling
    aggregate: String,
}

impl AggregateMetrics {
    /// Create a new metrics collector
    pub fn new(aggregate: impl Into<String>) -> Self {
        Self::register_metrics();

        Self {
            aggregate: aggregate.into(),
        }
    }

    /// Aggregate label attached to every metric
    pub fn aggregate(&self) -> &str {
        &self.aggregate
    }

    /// Register metric descriptions
    fn register_metrics() {
        describe_counter!(
            "aggregate_items_accepted_total",
            "Total number of items admitted into the batch"
        );
        describe_counter!(
            "aggregate_items_rejected_total",
            "Total number of add calls rejected by a batch limit"
        );
        describe_counter!(
            "aggregate_items_failed_total",
            "Total number of items that could not be measured or never fit"
        );
        describe_counter!(
            "aggregate_batches_flushed_total",
            "Total number of batches written to the sink"
        );
        describe_counter!(
            "aggregate_flush_retries_total",
            "Total number of batch write retries"
        );

        describe_histogram!("aggregate_batch_items", "Number of items in each flushed batch");
        describe_histogram!("aggregate_batch_bytes", "Cumulative size of each flushed batch");
        describe_histogram!(
            "aggregate_flush_duration_seconds",
            "Time spent writing a batch, retries included"
        );

        describe_gauge!("aggregate_buffered_items", "Items currently buffered");
        describe_gauge!("aggregate_buffered_bytes", "Bytes currently buffered");
    }

    pub fn record_accepted(&self) {
        counter!("aggregate_items_accepted_total", "aggregate" => self.aggregate.clone())
            .increment(1);
    }

    /// Record a capacity rejection, labelled by the limit that was hit
    pub fn record_rejected(&self, limit: Limit) {
        counter!(
            "aggregate_items_rejected_total",
            "aggregate" => self.aggregate.clone(),
            "reason" => limit.as_str(),
        )
        .increment(1);
    }

    pub fn record_error(&self, error_type: &'static str) {
        counter!(
            "aggregate_items_failed_total",
            "aggregate" => self.aggregate.clone(),
            "error_type" => error_type,
        )
        .increment(1);
    }

    pub fn record_retry(&self) {
        counter!("aggregate_flush_retries_total", "aggregate" => self.aggregate.clone())
            .increment(1);
    }

    /// Record a successfully written batch
    pub fn record_flush(&self, items: usize, bytes: usize, duration: Duration) {
        counter!("aggregate_batches_flushed_total", "aggregate" => self.aggregate.clone())
            .increment(1);
        histogram!("aggregate_batch_items", "aggregate" => self.aggregate.clone())
            .record(items as f64);
        histogram!("aggregate_batch_bytes", "aggregate" => self.aggregate.clone())
            .record(bytes as f64);
        histogram!("aggregate_flush_duration_seconds", "aggregate" => self.aggregate.clone())
            .record(duration.as_secs_f64());
    }

    /// Set the buffered gauges to the batch's current state
    pub fn set_buffered(&self, items: usize, bytes: usize) {
        gauge!("aggregate_buffered_items", "aggregate" => self.aggregate.clone())
            .set(items as f64);
        gauge!("aggregate_buffered_bytes", "aggregate" => self.aggregate.clone())
            .set(bytes as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = AggregateMetrics::new("orders");
        assert_eq!(metrics.aggregate(), "orders");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let metrics = AggregateMetrics::new("orders");
        metrics.record_accepted();
        metrics.record_rejected(Limit::Size);
        metrics.record_error("oversized");
        metrics.record_retry();
        metrics.record_flush(3, 42, Duration::from_millis(5));
        metrics.set_buffered(0, 0);
    }
}
