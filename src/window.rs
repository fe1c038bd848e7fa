//! Report window and cutoff computation.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// How far back a report looks from the moment it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    duration: Duration,
}

impl ReportWindow {
    /// One week, the cadence the report is named after.
    pub const DEFAULT_HOURS: u64 = 168;

    /// Upper bound accepted from configuration, roughly a century.
    pub const MAX_HOURS: u64 = 876_000;

    /// Windows longer than [`Self::MAX_HOURS`] are clamped to it.
    pub fn from_hours(hours: u64) -> Self {
        Self {
            duration: Duration::hours(hours.min(Self::MAX_HOURS) as i64),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The oldest moment included in a report generated at `now`.
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.duration
    }

    /// Cutoff as an RFC 3339 UTC string with millisecond precision, e.g.
    /// `2024-01-01T00:00:00.000Z`.
    ///
    /// Records are selected by comparing their `submitted_at` string against
    /// this value lexically, so the format has to match what producers store.
    pub fn cutoff_at(&self, now: DateTime<Utc>) -> String {
        self.start(now).to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl Default for ReportWindow {
    fn default() -> Self {
        Self::from_hours(Self::DEFAULT_HOURS)
    }
}
