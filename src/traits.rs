/// A point-in-time reading of process memory, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemorySample {
    /// Resident memory currently held by the process
    pub resident: u64,
    /// Highest resident watermark observed so far
    pub peak: u64,
}

/// Source of timestamps for a registry.
///
/// Readings are seconds as `f64` from an arbitrary fixed origin; only
/// differences between two readings are meaningful.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Source of process memory readings for a registry.
pub trait MemoryProbe: Send + Sync {
    /// Current resident memory in bytes
    fn resident(&self) -> u64;

    /// Peak resident memory in bytes
    fn peak(&self) -> u64;

    /// Both readings at once, resident first
    fn sample(&self) -> MemorySample {
        MemorySample {
            resident: self.resident(),
            peak: self.peak(),
        }
    }
}
