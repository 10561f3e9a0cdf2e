//! Human-readable rendering of byte counts and durations.
//!
//! Both helpers are pure: they round to the requested number of decimal
//! digits (half away from zero) and print the shortest decimal form of the
//! result, so `1024` bytes at any precision renders as `1 KB` and `1536`
//! bytes at precision 2 renders as `1.5 KB`.

use strum::{AsRefStr, Display, EnumCount, EnumIter, FromRepr};

/// Decimal digits used by [`format_bytes`] when the caller has no preference.
pub const DEFAULT_BYTE_PRECISION: u32 = 2;

/// Decimal digits used by [`format_seconds`] when the caller has no preference.
pub const DEFAULT_SECONDS_PRECISION: u32 = 3;

/// Beyond this many digits an `f64` has nothing left to show.
const MAX_PRECISION: u32 = 15;

const KIBI: u64 = 1024;

/// Units used by [`format_bytes`], one step per power of 1024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, EnumCount, FromRepr)]
#[repr(u8)]
pub enum ByteUnit {
    #[strum(serialize = "B")]
    Bytes = 0,
    #[strum(serialize = "KB")]
    Kilobytes = 1,
    #[strum(serialize = "MB")]
    Megabytes = 2,
    #[strum(serialize = "GB")]
    Gigabytes = 3,
    #[strum(serialize = "TB")]
    Terabytes = 4,
}

impl ByteUnit {
    /// The largest unit whose magnitude does not exceed `bytes`, capped at TB.
    pub fn for_bytes(bytes: u64) -> Self {
        let mut power = 0u8;
        let mut scaled = bytes;
        while scaled >= KIBI && usize::from(power) + 1 < ByteUnit::COUNT {
            scaled /= KIBI;
            power += 1;
        }
        ByteUnit::from_repr(power).unwrap_or(ByteUnit::Terabytes)
    }

    /// Number of bytes in one of this unit.
    pub fn divisor(self) -> f64 {
        (KIBI as f64).powi(self as i32)
    }
}

/// Render a byte count as e.g. `"1.5 KB"`.
///
/// Zero is always `"0 B"`, regardless of `precision`.
pub fn format_bytes(bytes: u64, precision: u32) -> String {
    if bytes == 0 {
        return format!("0 {}", ByteUnit::Bytes);
    }
    let unit = ByteUnit::for_bytes(bytes);
    let value = round_to(bytes as f64 / unit.divisor(), precision);
    format!("{value} {unit}")
}

/// Render a duration in seconds as milliseconds below one second, seconds otherwise.
///
/// There is no minutes or hours form; an hour renders as `"3600 s"`.
/// Negative values and NaN clamp to `"0 ms"`, so `-inf` does too, while
/// `+inf` is passed through as `"inf s"`.
pub fn format_seconds(seconds: f64, precision: u32) -> String {
    let seconds = if seconds.is_nan() { 0.0 } else { seconds.max(0.0) };
    if seconds < 1.0 {
        format!("{} ms", round_to(seconds * 1000.0, precision))
    } else {
        format!("{} s", round_to(seconds, precision))
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(MAX_PRECISION) as i32);
    // Adding 0.0 folds a negative zero produced by rounding into positive zero.
    (value * factor).round() / factor + 0.0
}
