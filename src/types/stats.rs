//! Raw per-timer figures shared by exports and sinks.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unformatted duration and memory figures for one timer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimerStats {
    /// Elapsed seconds
    pub duration: f64,
    /// Resident memory growth in bytes, never negative
    pub memory: u64,
    /// Peak resident memory in bytes
    pub peak: u64,
}

impl Display for TimerStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}, used {} (peak {})", self.duration, self.memory, self.peak)
    }
}

/// Passed to [`crate::MetricsSink::on_stop`] after a timer stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerEvent {
    pub name: String,
    pub stats: TimerStats,
}
