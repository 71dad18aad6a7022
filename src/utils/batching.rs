//! Bounded batch: admission and accounting for buffered items.

use crate::clock::{Clock, SystemClock};
use crate::config::LimitSettings;
use crate::size::{Measure, SizeKind};
use crate::{AggregateError, AggregateResult};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Upper bound on the eager allocation made for `max_count`
const MAX_CAPACITY_HINT: usize = 1024;

/// Outcome of [`BoundedBatch::add`]
///
/// A rejection is routine backpressure: the batch is full or its idle window
/// has elapsed. The item is handed back so the caller can drain and retry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission<T> {
    /// Item appended to the batch
    Accepted,
    /// Batch unchanged; the item is returned untouched
    Rejected(T),
}

impl<T> Admission<T> {
    /// Whether the item was appended
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted)
    }

    /// The rejected item, if any
    pub fn into_rejected(self) -> Option<T> {
        match self {
            Admission::Accepted => None,
            Admission::Rejected(item) => Some(item),
        }
    }
}

/// Admission limit that rejected an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limit {
    /// `max_count` reached
    Count,
    /// Cumulative size would exceed `max_size`
    Size,
    /// Idle window elapsed
    Age,
}

impl Limit {
    /// Short stable name, used as a metrics label
    pub fn as_str(&self) -> &'static str {
        match self {
            Limit::Count => "count",
            Limit::Size => "size",
            Limit::Age => "age",
        }
    }
}

enum Verdict {
    Fits { new_size: usize, now: Instant },
    Exceeds(Limit),
}

/// Size strategy as configured; unknown names fail on first use
#[derive(Debug, Clone)]
enum Sizer {
    Known(SizeKind),
    Unrecognized(String),
}

impl Sizer {
    fn from_name(name: &str) -> Self {
        match name.parse() {
            Ok(kind) => Sizer::Known(kind),
            Err(_) => Sizer::Unrecognized(name.to_string()),
        }
    }

    fn measure<T: Measure>(&self, item: &T) -> AggregateResult<usize> {
        match self {
            Sizer::Known(kind) => kind.measure(item),
            Sizer::Unrecognized(name) => Err(AggregateError::config(format!(
                "unknown size kind '{}' (expected raw-length or json-length)",
                name
            ))),
        }
    }
}

/// In-memory buffer that admits items up to a count, a byte size and,
/// optionally, an idle time window
///
/// The window slides: it restarts on every accepted item and on [`reset`](Self::reset),
/// so it measures idle time rather than batch age.
///
/// ```
/// use batch_aggregate::{BoundedBatch, SizeKind};
///
/// let mut batch = BoundedBatch::new(100, 9, SizeKind::RawLength);
/// for word in ["foo", "bar", "baz"] {
///     assert!(batch.add(word.to_string()).unwrap().is_accepted());
/// }
/// assert_eq!(batch.size(), 9);
///
/// let rejected = batch.add("qux".to_string()).unwrap().into_rejected().unwrap();
/// let shipped = batch.drain();
/// assert_eq!(shipped, ["foo", "bar", "baz"]);
/// assert!(batch.add(rejected).unwrap().is_accepted());
/// ```
#[derive(Debug)]
pub struct BoundedBatch<T, C: Clock = SystemClock> {
    items: Vec<T>,
    size: usize,
    max_count: usize,
    max_size: usize,
    max_age: Option<Duration>,
    window_start: Instant,
    sizer: Sizer,
    clock: C,
}

impl<T: Measure> BoundedBatch<T> {
    /// Count and size bounded batch
    pub fn new(max_count: usize, max_size: usize, size_kind: SizeKind) -> Self {
        Self::with_clock(max_count, max_size, None, size_kind, SystemClock)
    }

    /// Count, size and idle-time bounded batch
    pub fn time_bounded(
        max_count: usize,
        max_size: usize,
        max_age: Duration,
        size_kind: SizeKind,
    ) -> Self {
        Self::with_clock(max_count, max_size, Some(max_age), size_kind, SystemClock)
    }

    /// Build from configured limits
    ///
    /// An unrecognized `size_kind` is not rejected here; it surfaces as
    /// `InvalidConfiguration` from [`add`](Self::add).
    pub fn from_limits(limits: &LimitSettings) -> Self {
        Self::from_limits_with_clock(limits, SystemClock)
    }
}

impl<T: Measure, C: Clock> BoundedBatch<T, C> {
    /// Batch with an injected clock
    pub fn with_clock(
        max_count: usize,
        max_size: usize,
        max_age: Option<Duration>,
        size_kind: SizeKind,
        clock: C,
    ) -> Self {
        Self::build(max_count, max_size, max_age, Sizer::Known(size_kind), clock)
    }

    /// Build from configured limits with an injected clock
    pub fn from_limits_with_clock(limits: &LimitSettings, clock: C) -> Self {
        Self::build(
            limits.max_count,
            limits.max_size,
            limits.max_age(),
            Sizer::from_name(&limits.size_kind),
            clock,
        )
    }

    fn build(
        max_count: usize,
        max_size: usize,
        max_age: Option<Duration>,
        sizer: Sizer,
        clock: C,
    ) -> Self {
        let window_start = clock.now();
        Self {
            items: Vec::with_capacity(max_count.min(MAX_CAPACITY_HINT)),
            size: 0,
            max_count,
            max_size,
            max_age,
            window_start,
            sizer,
            clock,
        }
    }

    /// Try to append an item
    ///
    /// Checks run in order and stop at the first failure: count, size
    /// computation, cumulative size, idle window. Nothing is mutated unless the
    /// item is accepted.
    ///
    /// Returns `Ok(Rejected(item))` when a limit is reached. Drain and retry
    /// if the batch was non-empty; otherwise the item can never fit. Returns
    /// `Err` when the item cannot be measured.
    pub fn add(&mut self, item: T) -> AggregateResult<Admission<T>> {
        self.try_add(item).map_err(|(error, _)| error)
    }

    /// Like [`add`](Self::add), but a measurement error hands the item back too
    pub fn try_add(&mut self, item: T) -> Result<Admission<T>, (AggregateError, T)> {
        match self.evaluate(&item) {
            Ok(Verdict::Fits { new_size, now }) => {
                self.items.push(item);
                self.size = new_size;
                if self.max_age.is_some() {
                    self.window_start = now;
                }
                Ok(Admission::Accepted)
            }
            Ok(Verdict::Exceeds(limit)) => {
                trace!(
                    limit = limit.as_str(),
                    count = self.items.len(),
                    size = self.size,
                    "rejected"
                );
                Ok(Admission::Rejected(item))
            }
            Err(error) => Err((error, item)),
        }
    }

    /// The first limit `item` would hit, in the same order `add` checks them
    ///
    /// `Ok(None)` means `add` would accept the item right now.
    pub fn blocking_limit(&self, item: &T) -> AggregateResult<Option<Limit>> {
        Ok(match self.evaluate(item)? {
            Verdict::Fits { .. } => None,
            Verdict::Exceeds(limit) => Some(limit),
        })
    }

    fn evaluate(&self, item: &T) -> AggregateResult<Verdict> {
        if self.items.len() + 1 > self.max_count {
            return Ok(Verdict::Exceeds(Limit::Count));
        }

        let item_size = self.sizer.measure(item)?;

        let new_size = match self.size.checked_add(item_size) {
            Some(total) if total <= self.max_size => total,
            _ => return Ok(Verdict::Exceeds(Limit::Size)),
        };

        let now = self.clock.now();
        if let Some(max_age) = self.max_age {
            if now.saturating_duration_since(self.window_start) > max_age {
                return Ok(Verdict::Exceeds(Limit::Age));
            }
        }

        Ok(Verdict::Fits { new_size, now })
    }

    /// Clear items and counters, restarting the idle window
    pub fn reset(&mut self) {
        debug!(count = self.items.len(), size = self.size, "resetting batch");
        self.items.clear();
        self.clear_counters();
    }

    /// Take all items and reset in one step
    pub fn drain(&mut self) -> Vec<T> {
        debug!(count = self.items.len(), size = self.size, "draining batch");
        let items = std::mem::replace(
            &mut self.items,
            Vec::with_capacity(self.max_count.min(MAX_CAPACITY_HINT)),
        );
        self.clear_counters();
        items
    }

    fn clear_counters(&mut self) {
        self.size = 0;
        if self.max_age.is_some() {
            self.window_start = self.clock.now();
        }
    }

    /// Whether the idle window has elapsed; always false without a time bound
    pub fn is_expired(&self) -> bool {
        self.max_age.is_some_and(|max_age| {
            self.clock.now().saturating_duration_since(self.window_start) > max_age
        })
    }

    /// Configured size strategy, or `None` for an unrecognized name
    pub fn size_kind(&self) -> Option<SizeKind> {
        match self.sizer {
            Sizer::Known(kind) => Some(kind),
            Sizer::Unrecognized(_) => None,
        }
    }
}

impl<T, C: Clock> BoundedBatch<T, C> {
    /// Buffered items in insertion order
    pub fn get(&self) -> &[T] {
        &self.items
    }

    /// Number of buffered items
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Cumulative size of buffered items
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether no further item can be admitted by count
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.max_count
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    pub fn remaining_count(&self) -> usize {
        self.max_count.saturating_sub(self.items.len())
    }

    pub fn remaining_size(&self) -> usize {
        self.max_size.saturating_sub(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::size::Json;
    use crate::Payload;
    use serde_json::json;

    fn words(batch: &BoundedBatch<String, impl Clock>) -> Vec<&str> {
        batch.get().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_new_batch_is_empty() {
        let batch: BoundedBatch<String> = BoundedBatch::new(10, 100, SizeKind::RawLength);
        assert!(batch.is_empty());
        assert_eq!(batch.count(), 0);
        assert_eq!(batch.size(), 0);
        assert!(batch.get().is_empty());
        assert_eq!(batch.size_kind(), Some(SizeKind::RawLength));
        assert!(!batch.is_expired());
    }

    #[test]
    fn test_raw_length_size_boundary() {
        let mut batch = BoundedBatch::new(100, 9, SizeKind::RawLength);

        for word in ["foo", "bar", "baz"] {
            assert!(batch.add(word.to_string()).unwrap().is_accepted());
        }
        assert_eq!(batch.count(), 3);
        assert_eq!(batch.size(), 9);

        let admission = batch.add("qux".to_string()).unwrap();
        assert_eq!(admission, Admission::Rejected("qux".to_string()));
        assert_eq!(batch.count(), 3);
        assert_eq!(batch.size(), 9);
        assert_eq!(words(&batch), ["foo", "bar", "baz"]);
    }

    #[test]
    fn test_item_landing_exactly_on_max_size_is_accepted() {
        let mut batch = BoundedBatch::new(10, 5, SizeKind::RawLength);
        assert!(batch.add(b"ab".to_vec()).unwrap().is_accepted());
        assert!(batch.add(b"cde".to_vec()).unwrap().is_accepted());
        assert_eq!(batch.size(), 5);
        assert_eq!(batch.remaining_size(), 0);
        assert!(!batch.add(b"f".to_vec()).unwrap().is_accepted());
    }

    #[test]
    fn test_count_boundary() {
        let mut batch = BoundedBatch::new(3, 1000, SizeKind::RawLength);
        for i in 0..3 {
            assert!(batch.add(format!("item-{}", i)).unwrap().is_accepted());
        }
        assert!(batch.is_full());
        assert_eq!(batch.remaining_count(), 0);

        let rejected = batch.add("item-3".to_string()).unwrap();
        assert!(!rejected.is_accepted());
        assert_eq!(batch.count(), 3);
    }

    #[test]
    fn test_json_length_scenario() {
        #[derive(serde::Serialize)]
        struct Event {
            id: u32,
            kind: &'static str,
            note: &'static str,
        }

        let event = |id| Json(Event { id, kind: "signup", note: "hello" });
        // {"id":1,"kind":"signup","note":"hello"}
        let encoded_len = serde_json::to_vec(&event(1).0).unwrap().len();
        assert_eq!(encoded_len, 39);

        let mut batch = BoundedBatch::new(2, 100, SizeKind::JsonLength);
        assert!(batch.add(event(1)).unwrap().is_accepted());
        assert!(batch.add(event(2)).unwrap().is_accepted());
        assert_eq!(batch.count(), 2);
        assert_eq!(batch.size(), 78);

        let third = batch.add(event(3)).unwrap();
        assert!(!third.is_accepted());
        assert_eq!(batch.count(), 2);
        assert_eq!(batch.size(), 78);
    }

    #[test]
    fn test_json_objects_of_32_bytes() {
        // {"act":"login12","user":"alice"}
        let object = json!({"user": "alice", "act": "login12"});
        assert_eq!(serde_json::to_vec(&object).unwrap().len(), 32);

        let mut batch = BoundedBatch::new(2, 100, SizeKind::JsonLength);
        assert!(batch.add(object.clone()).unwrap().is_accepted());
        assert!(batch.add(object.clone()).unwrap().is_accepted());
        assert_eq!(batch.count(), 2);
        assert_eq!(batch.size(), 64);

        assert!(matches!(batch.add(object), Ok(Admission::Rejected(_))));
        assert_eq!(batch.count(), 2);
        assert_eq!(batch.size(), 64);
    }

    #[test]
    fn test_unsupported_type_leaves_batch_unchanged() {
        let mut batch = BoundedBatch::new(10, 100, SizeKind::RawLength);
        assert!(batch.add(Payload::from("abc")).unwrap().is_accepted());

        let err = batch.add(Payload::from(json!({"a": 1}))).unwrap_err();
        assert!(matches!(err, AggregateError::UnsupportedType(_)));
        assert_eq!(batch.count(), 1);
        assert_eq!(batch.size(), 3);
        assert_eq!(batch.get(), [Payload::from("abc")]);
    }

    #[test]
    fn test_count_check_precedes_size_computation() {
        let mut batch = BoundedBatch::new(0, 100, SizeKind::RawLength);
        // would be UnsupportedType if it were measured
        assert!(matches!(
            batch.add(Payload::from(json!(1))),
            Ok(Admission::Rejected(_))
        ));
    }

    #[test]
    fn test_oversized_single_item_on_empty_batch() {
        let mut batch = BoundedBatch::new(10, 4, SizeKind::RawLength);
        let rejected = batch.add("too long".to_string()).unwrap();
        assert_eq!(rejected.into_rejected().as_deref(), Some("too long"));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_size_overflow_is_a_rejection() {
        let mut batch = BoundedBatch::new(10, usize::MAX, SizeKind::RawLength);
        batch.size = usize::MAX - 1;
        assert!(!batch.add("ab".to_string()).unwrap().is_accepted());
        assert_eq!(batch.size(), usize::MAX - 1);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut batch = BoundedBatch::new(10, 100, SizeKind::RawLength);
        batch.add("a".to_string()).unwrap();
        batch.add("bb".to_string()).unwrap();

        batch.reset();
        assert_eq!(batch.count(), 0);
        assert_eq!(batch.size(), 0);
        assert!(batch.get().is_empty());
        assert_eq!(batch.max_count(), 10);
        assert_eq!(batch.max_size(), 100);
    }

    #[test]
    fn test_get_is_idempotent() {
        let mut batch = BoundedBatch::new(10, 100, SizeKind::RawLength);
        batch.add("x".to_string()).unwrap();
        batch.add("y".to_string()).unwrap();

        let first = batch.get().to_vec();
        let second = batch.get().to_vec();
        assert_eq!(first, second);
        assert_eq!(first, ["x", "y"]);
    }

    #[test]
    fn test_drain_returns_items_and_resets() {
        let mut batch = BoundedBatch::new(10, 100, SizeKind::RawLength);
        batch.add("one".to_string()).unwrap();
        batch.add("two".to_string()).unwrap();

        let items = batch.drain();
        assert_eq!(items, ["one", "two"]);
        assert!(batch.is_empty());
        assert_eq!(batch.size(), 0);
    }

    #[test]
    fn test_accounting_matches_accepted_items() {
        let mut batch = BoundedBatch::new(50, 200, SizeKind::RawLength);
        let mut expected_count = 0;
        let mut expected_size = 0;

        for i in 0..100 {
            let item = "x".repeat(i % 7 + 1);
            let len = item.len();
            if batch.add(item).unwrap().is_accepted() {
                expected_count += 1;
                expected_size += len;
            }
            assert_eq!(batch.count(), expected_count);
            assert_eq!(batch.size(), expected_size);
            assert_eq!(
                batch.size(),
                batch.get().iter().map(String::len).sum::<usize>()
            );
        }
        assert!(batch.count() <= batch.max_count());
        assert!(batch.size() <= batch.max_size());
    }

    #[test]
    fn test_idle_window_rejects_after_max_age() {
        let clock = ManualClock::new();
        let mut batch = BoundedBatch::with_clock(
            100,
            1000,
            Some(Duration::from_secs(5)),
            SizeKind::RawLength,
            clock.clone(),
        );

        assert!(batch.add("a".to_string()).unwrap().is_accepted());

        clock.advance(Duration::from_secs(6));
        assert!(batch.is_expired());
        let rejected = batch.add("b".to_string()).unwrap();
        assert!(!rejected.is_accepted());
        assert_eq!(batch.count(), 1);
        assert_eq!(batch.size(), 1);
    }

    #[test]
    fn test_idle_window_exactly_max_age_accepts() {
        let clock = ManualClock::new();
        let mut batch = BoundedBatch::with_clock(
            100,
            1000,
            Some(Duration::from_secs(5)),
            SizeKind::RawLength,
            clock.clone(),
        );

        clock.advance(Duration::from_secs(5));
        assert!(!batch.is_expired());
        assert!(batch.add("a".to_string()).unwrap().is_accepted());
    }

    #[test]
    fn test_idle_window_slides_on_accept() {
        let clock = ManualClock::new();
        let mut batch = BoundedBatch::with_clock(
            100,
            1000,
            Some(Duration::from_secs(5)),
            SizeKind::RawLength,
            clock.clone(),
        );

        // steady traffic every 4s never trips a 5s window
        for i in 0..10 {
            clock.advance(Duration::from_secs(4));
            assert!(batch.add(format!("{}", i)).unwrap().is_accepted());
        }
        assert_eq!(batch.count(), 10);
    }

    #[test]
    fn test_reset_restarts_idle_window() {
        let clock = ManualClock::new();
        let mut batch = BoundedBatch::with_clock(
            100,
            1000,
            Some(Duration::from_millis(100)),
            SizeKind::RawLength,
            clock.clone(),
        );

        clock.advance(Duration::from_millis(150));
        let rejected = batch.add("late".to_string()).unwrap().into_rejected().unwrap();

        batch.reset();
        assert!(batch.add(rejected).unwrap().is_accepted());
    }

    #[test]
    fn test_measurement_error_precedes_age_check() {
        let clock = ManualClock::new();
        let mut batch = BoundedBatch::with_clock(
            100,
            1000,
            Some(Duration::from_millis(10)),
            SizeKind::RawLength,
            clock.clone(),
        );
        clock.advance(Duration::from_secs(1));

        // measurement errors win over the elapsed window
        let err = batch.add(Payload::from(json!([]))).unwrap_err();
        assert!(matches!(err, AggregateError::UnsupportedType(_)));
    }

    #[test]
    fn test_without_time_bound_never_expires() {
        let clock = ManualClock::new();
        let mut batch =
            BoundedBatch::with_clock(100, 1000, None, SizeKind::RawLength, clock.clone());
        clock.advance(Duration::from_secs(3600));
        assert!(!batch.is_expired());
        assert!(batch.add("a".to_string()).unwrap().is_accepted());
    }

    #[test]
    fn test_unrecognized_size_kind_fails_lazily() {
        let limits = LimitSettings {
            max_count: 10,
            max_size: 100,
            max_age_ms: None,
            size_kind: "xml".to_string(),
        };
        let mut batch: BoundedBatch<String> = BoundedBatch::from_limits(&limits);
        assert_eq!(batch.size_kind(), None);

        let err = batch.add("a".to_string()).unwrap_err();
        assert!(matches!(err, AggregateError::InvalidConfiguration(_)));
        assert!(batch.is_empty());
    }

    #[test]
    fn test_from_limits() {
        let limits = LimitSettings {
            max_count: 2,
            max_size: 64,
            max_age_ms: Some(250),
            size_kind: "json-length".to_string(),
        };
        let batch: BoundedBatch<Payload> = BoundedBatch::from_limits(&limits);
        assert_eq!(batch.max_count(), 2);
        assert_eq!(batch.max_size(), 64);
        assert_eq!(batch.max_age(), Some(Duration::from_millis(250)));
        assert_eq!(batch.size_kind(), Some(SizeKind::JsonLength));
    }

    #[test]
    fn test_time_bounded_constructor() {
        let mut batch = BoundedBatch::time_bounded(
            10,
            100,
            Duration::from_secs(60),
            SizeKind::RawLength,
        );
        assert_eq!(batch.max_age(), Some(Duration::from_secs(60)));
        assert!(batch.add(vec![1u8, 2, 3]).unwrap().is_accepted());
        assert_eq!(batch.size(), 3);
    }

    #[test]
    fn test_blocking_limit_follows_check_order() {
        let clock = ManualClock::new();
        let mut batch = BoundedBatch::with_clock(
            2,
            5,
            Some(Duration::from_secs(1)),
            SizeKind::RawLength,
            clock.clone(),
        );
        batch.add("abc".to_string()).unwrap();
        clock.advance(Duration::from_secs(2));

        // both the size limit and the idle window are exceeded; size is checked first
        assert_eq!(batch.blocking_limit(&"xyz".to_string()).unwrap(), Some(Limit::Size));
        assert_eq!(batch.blocking_limit(&"x".to_string()).unwrap(), Some(Limit::Age));

        batch.reset();
        assert_eq!(batch.blocking_limit(&"x".to_string()).unwrap(), None);
        assert_eq!(Limit::Size.as_str(), "size");
    }

    #[test]
    fn test_blocking_limit_count_first() {
        let mut batch = BoundedBatch::new(1, 100, SizeKind::RawLength);
        batch.add("a".to_string()).unwrap();
        assert_eq!(batch.blocking_limit(&"b".repeat(500)).unwrap(), Some(Limit::Count));
    }

    #[test]
    fn test_try_add_returns_item_with_error() {
        let mut batch = BoundedBatch::new(10, 100, SizeKind::RawLength);
        let item = Payload::from(json!({"keep": "me"}));

        let (err, returned) = batch.try_add(item.clone()).unwrap_err();
        assert!(matches!(err, AggregateError::UnsupportedType(_)));
        assert_eq!(returned, item);
        assert!(batch.is_empty());

        assert!(batch.try_add(Payload::from("ok")).unwrap().is_accepted());
    }

    #[test]
    fn test_drain_logs_counts_before_clearing() {
        use std::io;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut batch = BoundedBatch::new(10, 100, SizeKind::RawLength);
            batch.add("foo".to_string()).unwrap();
            batch.add("bar".to_string()).unwrap();
            assert_eq!(batch.drain(), ["foo", "bar"]);
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("draining batch"), "{}", output);
        assert!(output.contains("count=2"), "{}", output);
        assert!(output.contains("size=6"), "{}", output);
    }
}
