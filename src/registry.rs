use itertools::Itertools;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::MetricsError;
use crate::metrics::{MetricsSink, NoOpSink};
use crate::process::{ProcessMemory, SystemClock};
use crate::timers::TimerScope;
use crate::traits::{Clock, MemoryProbe};
use crate::types::{FormatOptions, MetricsExport, Snapshot, Timer, TimerEvent, TimerStats};

use tracing::{debug, warn};

/// Name for callers that only ever need one anonymous timer.
pub const DEFAULT_TIMER: &str = "default";

/// Named timers measuring elapsed time and memory growth.
///
/// Each instance is independent state owned by whoever constructs it. Mutating
/// operations take `&mut self`; wrap the registry in a
/// [`SharedRegistry`](crate::SharedRegistry) to use it from several threads.
///
/// Queries on a running timer substitute live readings for the missing end
/// snapshot, so progress can be inspected without stopping.
///
/// ```
/// use lapwatch::MetricsRegistry;
///
/// let mut registry = MetricsRegistry::new();
/// registry.start("parse");
/// let lap = registry.lap("parse").unwrap();
/// registry.stop("parse").unwrap();
/// assert!(registry.duration("parse").unwrap() >= lap);
/// assert!(registry.report("parse").unwrap().starts_with("[parse] "));
/// ```
pub struct MetricsRegistry {
    timers: HashMap<String, Timer>,
    order: Vec<String>,
    clock: Arc<dyn Clock>,
    memory: Arc<dyn MemoryProbe>,
    sink: Arc<dyn MetricsSink>,
    format: FormatOptions,
}

impl MetricsRegistry {
    /// A registry on the system clock and process memory counters.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> MetricsRegistryBuilder {
        MetricsRegistryBuilder::new()
    }

    /// Create or reset the named timer from the current time and memory.
    ///
    /// Restarting keeps the timer's position in [`timers`](Self::timers).
    pub fn start(&mut self, name: &str) {
        let snapshot = self.snapshot();
        debug!(event = "Timer", phase = "Start", name = name, time = snapshot.time);
        match self.timers.get_mut(name) {
            Some(timer) => *timer = Timer::started(snapshot),
            None => {
                self.timers.insert(name.to_string(), Timer::started(snapshot));
                self.order.push(name.to_string());
            }
        }
    }

    /// Record the end snapshot. A second stop overwrites the first.
    pub fn stop(&mut self, name: &str) -> Result<(), MetricsError> {
        let snapshot = self.snapshot();
        let timer = self
            .timers
            .get_mut(name)
            .ok_or_else(|| MetricsError::NotStarted(name.to_string()))?;
        if !timer.is_running() {
            warn!(
                event = "Timer",
                phase = "Stop",
                name = name,
                "timer already stopped, overwriting end snapshot"
            );
        }
        timer.stop(snapshot);

        let stats = self.stats(name)?;
        debug!(
            event = "Timer",
            phase = "Stop",
            name = name,
            duration = stats.duration,
            memory = stats.memory,
            peak = stats.peak
        );
        self.sink.on_stop(&TimerEvent {
            name: name.to_string(),
            stats,
        });
        Ok(())
    }

    /// Seconds since the previous lap, or since start for the first one.
    pub fn lap(&mut self, name: &str) -> Result<f64, MetricsError> {
        let now = self.clock.now();
        let timer = self
            .timers
            .get_mut(name)
            .ok_or_else(|| MetricsError::NotStarted(name.to_string()))?;
        let elapsed = timer.lap(now);
        debug!(event = "Timer", phase = "Lap", name = name, elapsed = elapsed);
        self.sink.on_lap(name, elapsed);
        Ok(elapsed)
    }

    /// Start, run `f` to completion, stop, and return the duration in seconds.
    ///
    /// If `f` panics the panic propagates and the timer is left running.
    pub fn measure<F: FnOnce()>(&mut self, name: &str, f: F) -> Result<f64, MetricsError> {
        self.start(name);
        f();
        self.stop(name)?;
        debug!(event = "Timer", phase = "Measure", name = name);
        self.duration(name)
    }

    /// Like [`measure`](Self::measure) for fallible work.
    ///
    /// An `Err` from `f` is returned as-is and the timer is left running.
    pub fn try_measure<T, E, F>(&mut self, name: &str, f: F) -> Result<(T, f64), E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<MetricsError>,
    {
        self.start(name);
        let value = f()?;
        self.stop(name)?;
        debug!(event = "Timer", phase = "Measure", name = name);
        Ok((value, self.duration(name)?))
    }

    /// Start the named timer and stop it when the returned guard drops.
    pub fn scoped(&mut self, name: &str) -> TimerScope<'_> {
        self.start(name);
        TimerScope::new(self, name)
    }

    /// Remove one timer. Removing an unknown name is a no-op.
    pub fn reset(&mut self, name: &str) {
        if self.timers.remove(name).is_some() {
            self.order.retain(|existing| existing != name);
            debug!(event = "Timer", phase = "Reset", name = name);
        }
    }

    /// Remove every timer.
    pub fn reset_all(&mut self) {
        debug!(event = "Timer", phase = "Reset", count = self.timers.len());
        self.timers.clear();
        self.order.clear();
    }

    /// Registered names in the order they were first started.
    pub fn timers(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn timer(&self, name: &str) -> Option<&Timer> {
        self.timers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.timers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn is_running(&self, name: &str) -> Result<bool, MetricsError> {
        Ok(self.started(name)?.is_running())
    }

    /// Elapsed seconds, measured against now while the timer is running.
    pub fn duration(&self, name: &str) -> Result<f64, MetricsError> {
        let timer = self.started(name)?;
        Ok(timer.duration_with(|| self.clock.now()))
    }

    /// Resident memory growth in bytes, never negative.
    pub fn memory_usage(&self, name: &str) -> Result<u64, MetricsError> {
        let timer = self.started(name)?;
        Ok(timer.memory_delta_with(|| self.memory.resident()))
    }

    pub fn memory_usage_formatted(&self, name: &str) -> Result<String, MetricsError> {
        Ok(self.format.bytes(self.memory_usage(name)?))
    }

    /// The stored end peak once stopped; a fresh process reading while running.
    ///
    /// The start snapshot's peak is never used here.
    pub fn peak_memory_usage(&self, name: &str) -> Result<u64, MetricsError> {
        let timer = self.started(name)?;
        Ok(timer.peak_with(|| self.memory.peak()))
    }

    pub fn peak_memory_usage_formatted(&self, name: &str) -> Result<String, MetricsError> {
        Ok(self.format.bytes(self.peak_memory_usage(name)?))
    }

    /// Raw duration, memory and peak for one timer.
    pub fn stats(&self, name: &str) -> Result<TimerStats, MetricsError> {
        Ok(TimerStats {
            duration: self.duration(name)?,
            memory: self.memory_usage(name)?,
            peak: self.peak_memory_usage(name)?,
        })
    }

    /// `"[name] 1.5 s, used 2 KB (peak 8 MB)"`.
    pub fn report(&self, name: &str) -> Result<String, MetricsError> {
        self.render_report(name, true)
    }

    /// Same shape as [`report`](Self::report) with raw seconds and bytes.
    pub fn report_raw(&self, name: &str) -> Result<String, MetricsError> {
        self.render_report(name, false)
    }

    /// One formatted report line per timer, in registry order.
    pub fn report_all(&self) -> Result<String, MetricsError> {
        self.render_all(true)
    }

    pub fn report_all_raw(&self) -> Result<String, MetricsError> {
        self.render_all(false)
    }

    /// Raw figures for every timer, in registry order.
    pub fn to_array(&self) -> MetricsExport {
        let mut export = MetricsExport::with_capacity(self.order.len());
        for name in &self.order {
            match self.stats(name) {
                Ok(stats) => export.push(name.clone(), stats),
                Err(err) => warn!(
                    event = "Timer",
                    phase = "Export",
                    name = name.as_str(),
                    error = %err,
                    "ordered timer has no record, left out of export"
                ),
            }
        }
        export
    }

    /// [`to_array`](Self::to_array) as a compact JSON object.
    pub fn to_json(&self) -> Result<String, MetricsError> {
        Ok(serde_json::to_string(&self.to_array())?)
    }

    pub fn to_json_pretty(&self) -> Result<String, MetricsError> {
        Ok(serde_json::to_string_pretty(&self.to_array())?)
    }

    pub fn format_options(&self) -> FormatOptions {
        self.format
    }

    pub fn set_format_options(&mut self, format: FormatOptions) {
        self.format = format;
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.clock.now(), self.memory.sample())
    }

    fn started(&self, name: &str) -> Result<&Timer, MetricsError> {
        self.timers
            .get(name)
            .ok_or_else(|| MetricsError::NotStarted(name.to_string()))
    }

    fn render_report(&self, name: &str, formatted: bool) -> Result<String, MetricsError> {
        if !self.contains(name) {
            return Err(MetricsError::NotFound(name.to_string()));
        }
        let stats = self.stats(name)?;
        if formatted {
            Ok(format!(
                "[{name}] {}, used {} (peak {})",
                self.format.seconds(stats.duration),
                self.format.bytes(stats.memory),
                self.format.bytes(stats.peak)
            ))
        } else {
            Ok(format!("[{name}] {stats}"))
        }
    }

    fn render_all(&self, formatted: bool) -> Result<String, MetricsError> {
        self.order
            .iter()
            .map(|name| self.render_report(name, formatted))
            .process_results(|mut lines| lines.join("\n"))
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for MetricsRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MetricsRegistry")
            .field("timers", &self.order)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Assembles a [`MetricsRegistry`] from its time, memory and event plumbing.
///
/// Anything not set falls back to [`SystemClock`], [`ProcessMemory`],
/// [`NoOpSink`] and [`FormatOptions::default`].
#[derive(Default)]
pub struct MetricsRegistryBuilder {
    clock: Option<Arc<dyn Clock>>,
    memory: Option<Arc<dyn MemoryProbe>>,
    sink: Option<Arc<dyn MetricsSink>>,
    format: FormatOptions,
}

impl MetricsRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn memory_probe(mut self, memory: impl MemoryProbe + 'static) -> Self {
        self.memory = Some(Arc::new(memory));
        self
    }

    pub fn sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn format_options(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    pub fn build(self) -> MetricsRegistry {
        MetricsRegistry {
            timers: HashMap::new(),
            order: Vec::new(),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock::new())),
            memory: self.memory.unwrap_or_else(|| Arc::new(ProcessMemory::new())),
            sink: self.sink.unwrap_or_else(|| Arc::new(NoOpSink)),
            format: self.format,
        }
    }
}

#[cfg(test)]
mod tests;
