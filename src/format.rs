//! Bracketed `[MM:SS.mmm - MM:SS.mmm]` interval strings consumed by clients.

use std::fmt;

/// Minute / second / millisecond breakdown of a seconds value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub minutes: u64,
    pub seconds: u64,
    pub millis: u64,
}

impl TimeParts {
    /// Splits with floor division and modulo; milliseconds are truncated.
    /// Negative or non-finite input is treated as zero.
    pub fn from_seconds(value: f64) -> Self {
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        Self {
            minutes: (value / 60.0).floor() as u64,
            seconds: (value % 60.0).floor() as u64,
            millis: ((value % 1.0) * 1000.0) as u64,
        }
    }
}

impl fmt::Display for TimeParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}.{:03}", self.minutes, self.seconds, self.millis)
    }
}

/// Renders `[MM:SS.mmm - MM:SS.mmm]` for an interval in seconds.
pub fn format_interval(start: f64, end: f64) -> String {
    format!(
        "[{} - {}]",
        TimeParts::from_seconds(start),
        TimeParts::from_seconds(end)
    )
}
