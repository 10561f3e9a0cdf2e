use std::sync::{Arc, Mutex};

use super::*;
use crate::metrics::tests::RecordingSink;
use crate::traits::MemorySample;


const MIB: u64 = 1024 * 1024;

/// Clock that only moves when told to.
#[derive(Clone, Default)]
struct ManualClock(Arc<Mutex<f64>>);

impl ManualClock {
    fn at(seconds: f64) -> Self {
        Self(Arc::new(Mutex::new(seconds)))
    }

    fn set(&self, seconds: f64) {
        *self.0.lock().unwrap() = seconds;
    }

    fn advance(&self, seconds: f64) {
        *self.0.lock().unwrap() += seconds;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.0.lock().unwrap()
    }
}

/// Memory probe returning whatever was last set.
#[derive(Clone, Default)]
struct FixedMemory(Arc<Mutex<MemorySample>>);

impl FixedMemory {
    fn with(resident: u64, peak: u64) -> Self {
        let probe = Self::default();
        probe.set(resident, peak);
        probe
    }

    fn set(&self, resident: u64, peak: u64) {
        *self.0.lock().unwrap() = MemorySample { resident, peak };
    }
}

impl MemoryProbe for FixedMemory {
    fn resident(&self) -> u64 {
        self.0.lock().unwrap().resident
    }

    fn peak(&self) -> u64 {
        self.0.lock().unwrap().peak
    }
}

struct Harness {
    registry: MetricsRegistry,
    clock: ManualClock,
    memory: FixedMemory,
    sink: Arc<RecordingSink>,
}

fn harness() -> Harness {
    let clock = ManualClock::at(0.0);
    let memory = FixedMemory::with(0, 0);
    let sink = Arc::new(RecordingSink::default());
    let registry = MetricsRegistry::builder()
        .clock(clock.clone())
        .memory_probe(memory.clone())
        .sink(sink.clone())
        .build();
    Harness {
        registry,
        clock,
        memory,
        sink,
    }
}

/// Two stopped timers with exactly known figures.
///
/// `load`: 1.5 s, 2 KB growth, 8 MB peak.
/// `parse`: 0.25 s, memory shrank (clamped to 0), 8 MB peak.
fn populated() -> Harness {
    let mut h = harness();

    h.clock.set(10.0);
    h.memory.set(1024, 2048);
    h.registry.start("load");
    h.clock.set(11.5);
    h.memory.set(3072, 8 * MIB);
    h.registry.stop("load").unwrap();

    h.clock.set(20.0);
    h.memory.set(4096, 8 * MIB);
    h.registry.start("parse");
    h.clock.set(20.25);
    h.memory.set(1024, 8 * MIB);
    h.registry.stop("parse").unwrap();

    h
}

#[test]
fn test_builder_defaults() {
    let registry = MetricsRegistry::builder().build();
    assert!(registry.is_empty());
    assert_eq!(registry.format_options(), FormatOptions::default());
    assert_eq!(MetricsRegistry::default().len(), 0);
}

#[test]
fn test_debug_lists_timer_names() {
    let mut h = harness();
    h.registry.start("alpha");
    let rendered = format!("{:?}", h.registry);
    assert!(rendered.contains("MetricsRegistry"));
    assert!(rendered.contains("alpha"));
}

#[test]
fn test_instances_are_independent() {
    let mut first = MetricsRegistry::new();
    let second = MetricsRegistry::new();
    first.start(DEFAULT_TIMER);
    assert!(first.contains(DEFAULT_TIMER));
    assert!(!second.contains(DEFAULT_TIMER));
}
