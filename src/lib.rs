// src/lib.rs
//! Named timers that measure wall-clock duration and process memory growth,
//! with one-line human reports and ordered JSON export.
//!
//! ```
//! use lapwatch::{MetricsRegistry, format_bytes, format_seconds};
//!
//! let mut registry = MetricsRegistry::new();
//! let seconds = registry.measure("build", || {
//!     let _buffer = vec![0u8; 64 * 1024];
//! })?;
//! assert_eq!(seconds, registry.duration("build")?);
//! println!("{}", registry.report_all()?);
//!
//! assert_eq!(format_bytes(1024, 0), "1 KB");
//! assert_eq!(format_seconds(0.25, 3), "250 ms");
//! # Ok::<(), lapwatch::MetricsError>(())
//! ```
pub use error::MetricsError;
pub use format::{
    ByteUnit, DEFAULT_BYTE_PRECISION, DEFAULT_SECONDS_PRECISION, format_bytes, format_seconds,
};
pub use metrics::{MetricsSink, NoOpSink};
pub use process::{ProcessMemory, SystemClock};
pub use registry::{DEFAULT_TIMER, MetricsRegistry, MetricsRegistryBuilder};
pub use shared::SharedRegistry;
pub use timers::TimerScope;
pub use traits::{Clock, MemoryProbe, MemorySample};
pub use types::{FormatOptions, MetricsExport, Snapshot, Timer, TimerEvent, TimerStats};

mod error;
pub mod format;
pub mod metrics;
mod process;
mod registry;
mod shared;
mod timers;
mod traits;
mod types;
