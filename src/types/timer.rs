//! The per-name timer record and its accounting rules.

use crate::traits::MemorySample;

/// Time and memory captured together at a start or stop call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    /// Clock reading in seconds
    pub time: f64,
    /// Process memory at that instant
    pub memory: MemorySample,
}

impl Snapshot {
    pub fn new(time: f64, memory: MemorySample) -> Self {
        Self { time, memory }
    }
}

/// State of one named timer.
///
/// The end snapshot is recorded as a unit, so end time, end memory and end
/// peak are either all present (stopped) or all absent (running).
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    start: Snapshot,
    end: Option<Snapshot>,
    last_lap: Option<f64>,
}

impl Timer {
    pub(crate) fn started(start: Snapshot) -> Self {
        Self {
            start,
            end: None,
            last_lap: None,
        }
    }

    /// Record the end snapshot, replacing any earlier one.
    pub(crate) fn stop(&mut self, end: Snapshot) {
        self.end = Some(end);
    }

    /// Seconds since the previous lap, or since start for the first lap.
    pub(crate) fn lap(&mut self, now: f64) -> f64 {
        let reference = self.last_lap.unwrap_or(self.start.time);
        self.last_lap = Some(now);
        (now - reference).max(0.0)
    }

    /// Elapsed seconds; `now` is only consulted while the timer is running.
    pub(crate) fn duration_with(&self, now: impl FnOnce() -> f64) -> f64 {
        let end = self.end.map_or_else(now, |end| end.time);
        (end - self.start.time).max(0.0)
    }

    /// Resident growth in bytes, clamped at zero.
    pub(crate) fn memory_delta_with(&self, resident: impl FnOnce() -> u64) -> u64 {
        let end = self.end.map_or_else(resident, |end| end.memory.resident);
        end.saturating_sub(self.start.memory.resident)
    }

    /// Stored end peak once stopped, otherwise a live reading.
    pub(crate) fn peak_with(&self, peak: impl FnOnce() -> u64) -> u64 {
        self.end.map_or_else(peak, |end| end.memory.peak)
    }

    pub fn is_running(&self) -> bool {
        self.end.is_none()
    }

    pub fn start_time(&self) -> f64 {
        self.start.time
    }

    pub fn end_time(&self) -> Option<f64> {
        self.end.map(|end| end.time)
    }

    pub fn start_memory(&self) -> u64 {
        self.start.memory.resident
    }

    pub fn end_memory(&self) -> Option<u64> {
        self.end.map(|end| end.memory.resident)
    }

    pub fn start_peak(&self) -> u64 {
        self.start.memory.peak
    }

    pub fn end_peak(&self) -> Option<u64> {
        self.end.map(|end| end.memory.peak)
    }

    pub fn last_lap_time(&self) -> Option<f64> {
        self.last_lap
    }
}
