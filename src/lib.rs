//! # Batch Aggregate
//!
//! Bounded in-memory aggregate for batching items before a downstream write.
//!
//! A [`BoundedBatch`] accumulates raw byte strings, text or JSON-serializable
//! values under three admission limits: a maximum item count, a maximum
//! cumulative size in bytes and, optionally, a maximum idle time since the
//! last accepted item or reset. When a limit is reached `add` hands the item
//! back; the caller drains the batch and retries it.
//!
//! ## Quick Start
//!
//! ```rust
//! use batch_aggregate::{BoundedBatch, Payload, SizeKind};
//! use serde_json::json;
//!
//! let mut batch = BoundedBatch::new(2, 100, SizeKind::JsonLength);
//!
//! for event in [json!({"id": 1}), json!({"id": 2}), json!({"id": 3})] {
//!     let mut item = Payload::from(event);
//!     loop {
//!         match batch.add(item).unwrap().into_rejected() {
//!             None => break,
//!             Some(rejected) if !batch.is_empty() => {
//!                 let shipped = batch.drain();
//!                 assert_eq!(shipped.len(), 2);
//!                 item = rejected;
//!             }
//!             Some(_) => panic!("item can never fit"),
//!         }
//!     }
//! }
//! assert_eq!(batch.count(), 1);
//! ```
//!
//! ## Features
//!
//! - **Size strategies**: raw byte length or compact JSON length, see [`SizeKind`]
//! - **Sliding idle window**: optional age bound driven by an injectable [`Clock`]
//! - **Batch writer**: [`BatchWriter`] runs the drain-and-retry protocol against any [`BatchSink`]
//! - **Configuration**: TOML files and environment overrides via [`AggregateConfig`]
//! - **Observability**: `tracing` logs and `metrics` counters, gauges and histograms

mod clock;
mod config;
mod error;
mod metrics;
mod payload;
mod retry;
mod size;
mod traits;
pub mod utils;
mod writer;

// Re-export public API
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AggregateConfig, LimitSettings, RetrySettings};
pub use error::{AggregateError, AggregateResult, WriteError};
pub use metrics::AggregateMetrics;
pub use payload::Payload;
pub use size::{Json, Measure, SizeKind};
pub use traits::BatchSink;
pub use utils::{Admission, BoundedBatch, Limit};
pub use writer::BatchWriter;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
