//! Formatting configuration for human-readable reports.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::format::{
    DEFAULT_BYTE_PRECISION, DEFAULT_SECONDS_PRECISION, format_bytes, format_seconds,
};

/// Decimal precision used when a registry renders formatted values.
///
/// Missing fields fall back to their defaults when deserialized, so a host can
/// embed this in its own configuration and set only what it cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FormatOptions {
    /// Digits after the decimal point for byte quantities
    pub byte_precision: u32,
    /// Digits after the decimal point for durations
    pub seconds_precision: u32,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            byte_precision: DEFAULT_BYTE_PRECISION,
            seconds_precision: DEFAULT_SECONDS_PRECISION,
        }
    }
}

impl FormatOptions {
    pub fn bytes(&self, bytes: u64) -> String {
        format_bytes(bytes, self.byte_precision)
    }

    pub fn seconds(&self, seconds: f64) -> String {
        format_seconds(seconds, self.seconds_precision)
    }
}
