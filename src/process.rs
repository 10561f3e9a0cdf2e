//! Default clock and memory sources backed by the running process.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::debug;

use crate::traits::{Clock, MemoryProbe, MemorySample};

#[cfg(target_os = "linux")]
const PROC_STATUS: &str = "/proc/self/status";

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
static STATUS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?P<key>VmRSS|VmHWM):\s+(?P<value>\d+)\s*(?P<unit>[kKmMgG]?B)?\s*$")
        .expect("static status pattern must compile")
});

/// Monotonic clock measuring seconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Memory readings for the current process.
///
/// On Linux these come from `VmRSS` and `VmHWM` in `/proc/self/status`. On
/// other platforms the resident size comes from `memory-stats`, and on other
/// unixes the peak from `getrusage(RUSAGE_SELF)`. Where the platform keeps no
/// peak, the highest resident size observed so far stands in for it.
/// Unreadable counters read as zero.
#[derive(Debug, Default)]
pub struct ProcessMemory {
    high_water: AtomicU64,
}

impl ProcessMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryProbe for ProcessMemory {
    fn resident(&self) -> u64 {
        self.sample().resident
    }

    fn peak(&self) -> u64 {
        self.sample().peak
    }

    fn sample(&self) -> MemorySample {
        let reported = read_platform().unwrap_or_default();
        let observed = self
            .high_water
            .fetch_max(reported.resident, Ordering::Relaxed)
            .max(reported.resident);
        MemorySample {
            resident: reported.resident,
            peak: reported.peak.max(observed),
        }
    }
}

#[cfg(target_os = "linux")]
fn read_platform() -> Option<MemorySample> {
    match std::fs::read_to_string(PROC_STATUS) {
        Ok(text) => Some(parse_status(&text)),
        Err(err) => {
            debug!(event = "Memory", phase = "Probe", path = PROC_STATUS, error = %err);
            None
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn read_platform() -> Option<MemorySample> {
    let Some(stats) = memory_stats::memory_stats() else {
        debug!(event = "Memory", phase = "Probe", "process memory unavailable on this platform");
        return None;
    };
    let resident = stats.physical_mem as u64;
    Some(MemorySample {
        resident,
        peak: max_rss().unwrap_or(resident).max(resident),
    })
}

#[cfg(all(unix, not(target_os = "linux")))]
fn max_rss() -> Option<u64> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    // SAFETY: getrusage writes only into the struct it is handed.
    if unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) } != 0 {
        debug!(event = "Memory", phase = "Probe", "getrusage failed");
        return None;
    }
    // SAFETY: a zero return means the struct was filled in.
    let max_rss = u64::try_from(unsafe { usage.assume_init() }.ru_maxrss).ok()?;
    // Darwin reports bytes, the BSDs kilobytes.
    if cfg!(any(target_os = "macos", target_os = "ios")) {
        Some(max_rss)
    } else {
        Some(max_rss.saturating_mul(1024))
    }
}

#[cfg(all(not(unix), not(target_os = "linux")))]
fn max_rss() -> Option<u64> {
    None
}

/// Extract resident and peak bytes from `/proc/<pid>/status` text.
///
/// The kernel reports both in kB; a missing peak falls back to the resident value.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) fn parse_status(text: &str) -> MemorySample {
    let mut resident = None;
    let mut peak = None;
    for caps in STATUS_LINE.captures_iter(text) {
        let Ok(value) = caps["value"].parse::<u64>() else {
            continue;
        };
        let bytes = value.saturating_mul(unit_multiplier(caps.name("unit").map(|m| m.as_str())));
        match &caps["key"] {
            "VmRSS" => resident = Some(bytes),
            "VmHWM" => peak = Some(bytes),
            _ => {}
        }
    }
    let resident = resident.unwrap_or(0);
    MemorySample {
        resident,
        peak: peak.unwrap_or(resident).max(resident),
    }
}

fn unit_multiplier(unit: Option<&str>) -> u64 {
    match unit.map(|u| u.to_ascii_lowercase()) {
        Some(u) if u == "kb" => 1024,
        Some(u) if u == "mb" => 1024 * 1024,
        Some(u) if u == "gb" => 1024 * 1024 * 1024,
        _ => 1,
    }
}
