//! Pluggable consumers for timer events.
//!
//! A registry forwards every stop and lap to its [`MetricsSink`], which lets a
//! host feed timings into whatever backend it already runs (a Prometheus
//! histogram, a log line, a test recorder) without this crate depending on it.
//!
//! Sinks are installed per registry through
//! [`MetricsRegistryBuilder::sink`](crate::MetricsRegistryBuilder::sink);
//! there is no process-wide sink.
//!
//! ```
//! use lapwatch::{MetricsRegistry, MetricsSink, TimerEvent};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! #[derive(Default)]
//! struct StopCounter {
//!     stops: AtomicU64,
//! }
//!
//! impl MetricsSink for StopCounter {
//!     fn on_stop(&self, _event: &TimerEvent) {
//!         self.stops.fetch_add(1, Ordering::Relaxed);
//!     }
//! }
//!
//! let counter = Arc::new(StopCounter::default());
//! let mut registry = MetricsRegistry::builder().sink(counter.clone()).build();
//! registry.start("load");
//! registry.stop("load").unwrap();
//! assert_eq!(counter.stops.load(Ordering::Relaxed), 1);
//! ```

use crate::types::TimerEvent;

/// Receives timer events from a registry.
///
/// Called synchronously from `stop` and `lap`, so implementations should
/// return quickly. The `Send + Sync` bounds let a registry move across
/// threads or sit behind a [`SharedRegistry`](crate::SharedRegistry).
pub trait MetricsSink: Send + Sync {
    /// Called after each successful stop with the timer's final figures.
    fn on_stop(&self, event: &TimerEvent);

    /// Called after each lap with the seconds since the previous lap.
    fn on_lap(&self, _name: &str, _elapsed: f64) {}
}

/// Default sink; events are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl MetricsSink for NoOpSink {
    fn on_stop(&self, _event: &TimerEvent) {}
}
