//! A cloneable, lock-guarded registry handle for multi-threaded hosts.

use std::sync::{Arc, Mutex};

use crate::error::MetricsError;
use crate::registry::MetricsRegistry;

/// Thread-safe handle to one [`MetricsRegistry`]. Cloning shares the registry.
///
/// Every call takes the lock for its duration; use [`with`](Self::with) to run
/// several operations under a single acquisition.
#[derive(Clone, Debug, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<MetricsRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: MetricsRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Run `f` with exclusive access to the registry.
    pub fn with<R>(&self, f: impl FnOnce(&mut MetricsRegistry) -> R) -> Result<R, MetricsError> {
        let mut guard = self.inner.lock()?;
        Ok(f(&mut guard))
    }

    pub fn start(&self, name: &str) -> Result<(), MetricsError> {
        self.with(|registry| registry.start(name))
    }

    pub fn stop(&self, name: &str) -> Result<(), MetricsError> {
        self.with(|registry| registry.stop(name))?
    }

    pub fn lap(&self, name: &str) -> Result<f64, MetricsError> {
        self.with(|registry| registry.lap(name))?
    }

    pub fn duration(&self, name: &str) -> Result<f64, MetricsError> {
        self.with(|registry| registry.duration(name))?
    }

    pub fn timers(&self) -> Result<Vec<String>, MetricsError> {
        self.with(|registry| registry.timers().into_iter().map(str::to_string).collect())
    }

    pub fn report_all(&self) -> Result<String, MetricsError> {
        self.with(|registry| registry.report_all())?
    }

    pub fn to_json(&self) -> Result<String, MetricsError> {
        self.with(|registry| registry.to_json())?
    }
}

impl From<MetricsRegistry> for SharedRegistry {
    fn from(registry: MetricsRegistry) -> Self {
        Self::new(registry)
    }
}
