use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MetricsError {
    #[error("Timer '{0}' has not been started.")]
    NotStarted(String),

    #[error("Timer '{0}' not found.")]
    NotFound(String),

    #[error("failed to serialize metrics: {0}")]
    Serialization(String),

    #[error("Poisoned lock error: {0}")]
    PoisonedLock(String),
}

impl MetricsError {
    /// The timer name carried by the usage-error variants.
    pub fn timer_name(&self) -> Option<&str> {
        match self {
            MetricsError::NotStarted(name) | MetricsError::NotFound(name) => Some(name),
            MetricsError::Serialization(_) | MetricsError::PoisonedLock(_) => None,
        }
    }
}

impl From<serde_json::Error> for MetricsError {
    fn from(err: serde_json::Error) -> Self {
        MetricsError::Serialization(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MetricsError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        MetricsError::PoisonedLock(err.to_string())
    }
}
