//! Scope-bound timers.
//!
//! [`TimerScope`] stops its timer when dropped, so the end snapshot is always
//! recorded, even if the measured code returns early or panics.

use crate::error::MetricsError;
use crate::registry::MetricsRegistry;

/// RAII guard returned by [`MetricsRegistry::scoped`].
///
/// # Example
///
/// ```rust
/// use lapwatch::MetricsRegistry;
///
/// let mut registry = MetricsRegistry::new();
/// {
///     let _scope = registry.scoped("phase");
///     // ... work being measured ...
/// } // timer is stopped here
/// assert!(!registry.is_running("phase").unwrap());
/// ```
pub struct TimerScope<'a> {
    registry: &'a mut MetricsRegistry,
    name: String,
    stopped: bool,
}

impl<'a> TimerScope<'a> {
    pub(crate) fn new(registry: &'a mut MetricsRegistry, name: &str) -> Self {
        Self {
            registry,
            name: name.to_string(),
            stopped: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// See [`MetricsRegistry::lap`].
    pub fn lap(&mut self) -> Result<f64, MetricsError> {
        self.registry.lap(&self.name)
    }

    /// Seconds since the scope was opened.
    pub fn elapsed(&self) -> Result<f64, MetricsError> {
        self.registry.duration(&self.name)
    }

    /// Stop now and return the total duration in seconds.
    pub fn finish(mut self) -> Result<f64, MetricsError> {
        self.stopped = true;
        self.registry.stop(&self.name)?;
        self.registry.duration(&self.name)
    }
}

impl Drop for TimerScope<'_> {
    fn drop(&mut self) {
        if !self.stopped {
            // The timer may have been reset from inside the scope; nothing to stop then.
            let _ = self.registry.stop(&self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_scope_stops_on_drop() {
        let mut registry = MetricsRegistry::new();
        {
            let _scope = registry.scoped("phase");
            thread::sleep(Duration::from_millis(10));
        }
        assert!(!registry.is_running("phase").unwrap());
        assert!(registry.duration("phase").unwrap() >= 0.01);
    }

    #[test]
    fn test_scope_finish_returns_duration() {
        let mut registry = MetricsRegistry::new();
        let scope = registry.scoped("phase");
        assert_eq!(scope.name(), "phase");
        thread::sleep(Duration::from_millis(5));
        let total = scope.finish().unwrap();
        assert!(total >= 0.005);
        assert_eq!(registry.duration("phase").unwrap(), total);
    }

    #[test]
    fn test_scope_laps_and_elapsed() {
        let mut registry = MetricsRegistry::new();
        let mut scope = registry.scoped("phase");
        thread::sleep(Duration::from_millis(5));
        let lap = scope.lap().unwrap();
        assert!(lap > 0.0);
        assert!(scope.elapsed().unwrap() >= lap);
    }

    #[test]
    fn test_scope_stops_when_unwinding() {
        let mut registry = MetricsRegistry::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = registry.scoped("boom");
            panic!("measured code failed");
        }));
        assert!(result.is_err());
        assert!(!registry.is_running("boom").unwrap());
    }
}
