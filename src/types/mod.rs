//! Data model for timers and their exported figures.

mod export;
mod options;
mod stats;
mod timer;

pub use export::MetricsExport;
pub use options::FormatOptions;
pub use stats::{TimerEvent, TimerStats};
pub use timer::{Snapshot, Timer};
